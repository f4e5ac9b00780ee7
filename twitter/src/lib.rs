mod client;
mod error;
mod oauth;
mod search;
mod status;
mod stream;

pub use client::TwitterClient;
pub use error::TwitterError;
pub use search::{SearchRequest, TopicMiner};
pub use status::Status;
pub use stream::{MissingTextPolicy, StreamMiner};

use async_trait::async_trait;
use tweet_datasets_common::Tweet;

/// A source of tweets that can be driven to one finite batch.
///
/// The streaming and search collectors share this capability but differ in
/// termination and failure policy: stream mining is interruptible and keeps
/// partial results, search mining is one-shot and fails as a whole.
#[async_trait]
pub trait Miner {
    async fn collect(&self) -> Result<Vec<Tweet>, TwitterError>;
}
