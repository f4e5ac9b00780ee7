mod credentials;
mod error;
mod storage;
mod topics;
mod tweet;

pub use credentials::Credentials;
pub use error::{ConfigError, StorageError};
pub use storage::{JsonStorage, StoredTweet};
pub use topics::{load_topics, Topic};
pub use tweet::Tweet;

/// Language used to filter tweets on both the streaming and search APIs.
pub const LANG: &str = "en";
