use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StorageError;
use crate::tweet::Tweet;

/// On-disk form of one tweet, keyed by identifier in the store file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoredTweet {
    pub text: String,
}

/// JSON store for one topic or stream.
///
/// Each run merges its tweets into whatever a previous run persisted:
/// existing entries are kept, new identifiers are added, and an identifier
/// collision keeps the incoming text. The file is rewritten in full on
/// every store. Concurrent runs against the same name are unsupported.
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    /// Create a storage unit backed by `<name>.json`.
    pub fn new(name: &str) -> Self {
        Self {
            path: PathBuf::from(format!("{name}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merge `tweets` into the store file and rewrite it.
    pub fn store(&self, tweets: &[Tweet]) -> Result<(), StorageError> {
        let mut merged = self.load()?;
        for tweet in tweets {
            merged.insert(
                tweet.identifier.clone(),
                StoredTweet {
                    text: tweet.text.clone(),
                },
            );
        }

        info!(
            "opening {} to write {} tweets",
            self.path.display(),
            tweets.len()
        );
        let contents = serde_json::to_string_pretty(&merged).map_err(|e| StorageError::Parse {
            path: self.path.clone(),
            source: e,
        })?;
        fs::write(&self.path, contents).map_err(|e| StorageError::Write {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Load the persisted mapping, or an empty one if no file exists yet.
    pub fn load(&self) -> Result<IndexMap<String, StoredTweet>, StorageError> {
        if !self.path.is_file() {
            return Ok(IndexMap::new());
        }

        info!("loading tweets from previous session");
        let contents = fs::read_to_string(&self.path).map_err(|e| StorageError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&contents).map_err(|e| StorageError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn storage(dir: &tempfile::TempDir, name: &str) -> JsonStorage {
        JsonStorage::new(dir.path().join(name).to_str().unwrap())
    }

    #[test]
    fn store_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir, "sports");
        storage
            .store(&[Tweet::new("1", "first"), Tweet::new("2", "second")])
            .unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["1"].text, "first");
        assert_eq!(loaded["2"].text, "second");
    }

    #[test]
    fn store_preserves_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir, "sports");
        storage.store(&[Tweet::new("1", "first")]).unwrap();
        storage.store(&[Tweet::new("2", "second")]).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["1"].text, "first");
    }

    #[test]
    fn conflicting_identifier_keeps_latest_text() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir, "sports");
        storage.store(&[Tweet::new("1", "old")]).unwrap();
        storage
            .store(&[Tweet::new("1", "new"), Tweet::new("1", "newer")])
            .unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["1"].text, "newer");
    }

    #[test]
    fn two_merges_equal_one_merged_batch() {
        let dir = tempfile::tempdir().unwrap();
        let a = [Tweet::new("1", "a1"), Tweet::new("2", "a2")];
        let b = [Tweet::new("2", "b2"), Tweet::new("3", "b3")];

        let sequential = storage(&dir, "sequential");
        sequential.store(&a).unwrap();
        sequential.store(&b).unwrap();

        let combined: Vec<_> = a.iter().chain(b.iter()).cloned().collect();
        let single = storage(&dir, "single");
        single.store(&combined).unwrap();

        assert_eq!(sequential.load().unwrap(), single.load().unwrap());
    }

    #[test]
    fn empty_merge_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir, "sports");
        storage.store(&[Tweet::new("1", "first")]).unwrap();
        let before = storage.load().unwrap();

        storage.store(&[]).unwrap();
        assert_eq!(storage.load().unwrap(), before);
    }

    #[test]
    fn round_trips_unicode_and_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir, "unicode");
        let tweets = [
            Tweet::new("1", "víspera de año nuevo \u{1f389}"),
            Tweet::new("2", ""),
            Tweet::new("3", "line\nbreak \"quoted\""),
        ];
        storage.store(&tweets).unwrap();

        let loaded = storage.load().unwrap();
        for tweet in &tweets {
            assert_eq!(loaded[&tweet.identifier].text, tweet.text);
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir, "nothing");
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir, "corrupt");
        std::fs::write(storage.path(), "not json").unwrap();
        assert!(matches!(
            storage.load(),
            Err(StorageError::Parse { .. })
        ));
    }
}
