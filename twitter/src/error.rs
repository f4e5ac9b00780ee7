use thiserror::Error;

#[derive(Error, Debug)]
pub enum TwitterError {
    #[error("missing credential {0} in credentials file")]
    MissingCredential(&'static str),

    #[error("unable to fetch {endpoint}: {msg}")]
    Fetch { endpoint: &'static str, msg: String },

    #[error("unable to parse response from {endpoint}: {msg}")]
    Parse { endpoint: &'static str, msg: String },

    #[error("lost connection to streaming API: {msg}")]
    Stream { msg: String },

    #[error("malformed pagination cursor: {cursor}")]
    Cursor { cursor: String },

    #[error("unable to sign request: {0}")]
    Sign(String),
}
