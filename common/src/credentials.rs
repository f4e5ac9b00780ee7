use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Twitter API credentials, one `key value` pair per line in the
/// credentials file. Keys are case-insensitive; unrecognized keys are
/// ignored. Any key missing from the file stays unset, and the API client
/// refuses to authenticate until all four are present.
///
/// Go to <http://dev.twitter.com/apps/new> to create an app and get values
/// for these credentials.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub oauth_token: Option<String>,
    pub oauth_token_secret: Option<String>,
}

impl Credentials {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        Ok(Self::parse(&contents))
    }

    fn parse(contents: &str) -> Self {
        let mut credentials = Self::default();
        for line in contents.lines() {
            let mut fields = line.split_whitespace();
            let (Some(key), Some(value)) = (fields.next(), fields.next()) else {
                continue;
            };
            let value = Some(value.to_string());
            match key.to_lowercase().as_str() {
                "consumer_key" => credentials.consumer_key = value,
                "consumer_secret" => credentials.consumer_secret = value,
                "oauth_token" => credentials.oauth_token = value,
                "oauth_token_secret" => credentials.oauth_token_secret = value,
                _ => (),
            }
        }
        credentials
    }
}
