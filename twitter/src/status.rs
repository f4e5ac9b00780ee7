use serde::Deserialize;
use tweet_datasets_common::Tweet;

/// One raw status object from the API. Only the fields this system keeps
/// are decoded; everything else in the payload is ignored. All fields are
/// optional because the streaming feed interleaves control events that
/// carry none of them.
#[derive(Deserialize, Debug, Clone)]
pub struct Status {
    pub id: Option<u64>,
    pub id_str: Option<String>,
    pub text: Option<String>,
}

impl Status {
    /// Reduce to a stored record. A status without text is not a
    /// content-bearing record and yields `None`, as does one without any
    /// id. The string id is preferred over the numeric one.
    pub fn record(&self) -> Option<Tweet> {
        let text = self.text.as_deref()?;
        let identifier = self
            .id_str
            .clone()
            .or_else(|| self.id.map(|id| id.to_string()))?;
        Some(Tweet::new(identifier, text))
    }
}
