use std::fmt::Display;
use std::future::Future;

use async_trait::async_trait;
use futures::{pin_mut, Stream, StreamExt};
use tracing::{debug, info};
use tweet_datasets_common::{Tweet, LANG};

use crate::client::{TwitterClient, STREAM_URL};
use crate::error::TwitterError;
use crate::status::Status;
use crate::Miner;

/// The whole-world bounding box; the remote API does the filtering.
const ALL_LOCATIONS: &str = "-180,-90,180,90";

/// What to do with a streamed status that carries no text.
///
/// `EndStream` reproduces the original behavior: a content-less status is
/// taken as an end-of-stream signal and collection finalizes with whatever
/// was gathered so far, even though live feeds interleave control events
/// with content. `Skip` drops the status and keeps consuming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingTextPolicy {
    #[default]
    EndStream,
    Skip,
}

/// Retrieve tweets from the streaming API until the limit is reached, the
/// feed ends, or an interrupt from the keyboard is received (^C).
pub struct StreamMiner<'a> {
    client: TwitterClient<'a>,
    limit: Option<usize>,
    missing_text: MissingTextPolicy,
}

impl<'a> StreamMiner<'a> {
    /// `limit` bounds the number of tweets collected; zero or a negative
    /// number means no limit.
    pub fn new(client: TwitterClient<'a>, limit: i64) -> Self {
        Self {
            client,
            limit: usize::try_from(limit).ok().filter(|l| *l > 0),
            missing_text: MissingTextPolicy::default(),
        }
    }

    pub fn missing_text(mut self, policy: MissingTextPolicy) -> Self {
        self.missing_text = policy;
        self
    }
}

#[async_trait]
impl Miner for StreamMiner<'_> {
    /// Interruption is observed at the consumption point and is a normal
    /// completion path: everything collected so far is returned.
    async fn collect(&self) -> Result<Vec<Tweet>, TwitterError> {
        info!("retrieving statuses from the streaming API");
        let response = self.client.open_stream(LANG, ALL_LOCATIONS).await?;
        let statuses = statuses(response.bytes_stream());
        drain(statuses, self.limit, self.missing_text, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
    }
}

/// Split a chunked response body into newline-delimited statuses.
/// Keep-alive blank lines are dropped.
fn statuses<B, C, E>(body: B) -> impl Stream<Item = Result<Status, TwitterError>>
where
    B: Stream<Item = Result<C, E>> + Unpin,
    C: AsRef<[u8]>,
    E: Display,
{
    futures::stream::unfold(
        (body, Vec::new(), false),
        |(mut body, mut buf, mut done)| async move {
            loop {
                if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = buf.drain(..=pos).collect();
                    let line = String::from_utf8_lossy(&line);
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let status =
                        serde_json::from_str::<Status>(line).map_err(|e| TwitterError::Parse {
                            endpoint: STREAM_URL,
                            msg: e.to_string(),
                        });
                    return Some((status, (body, buf, done)));
                }

                if done {
                    return None;
                }
                match body.next().await {
                    Some(Ok(chunk)) => buf.extend_from_slice(chunk.as_ref()),
                    Some(Err(e)) => {
                        buf.clear();
                        return Some((
                            Err(TwitterError::Stream { msg: e.to_string() }),
                            (body, buf, true),
                        ));
                    }
                    None => {
                        done = true;
                        // Flush a trailing line that never got its newline.
                        if !buf.is_empty() {
                            buf.push(b'\n');
                        }
                    }
                }
            }
        },
    )
}

async fn drain(
    statuses: impl Stream<Item = Result<Status, TwitterError>>,
    limit: Option<usize>,
    missing_text: MissingTextPolicy,
    cancel: impl Future<Output = ()>,
) -> Result<Vec<Tweet>, TwitterError> {
    pin_mut!(statuses);
    pin_mut!(cancel);
    let mut tweets = Vec::new();
    loop {
        let status = tokio::select! {
            _ = &mut cancel => {
                info!("interrupted");
                break;
            }
            next = statuses.next() => match next {
                Some(status) => status?,
                None => break,
            },
        };

        match status.record() {
            Some(tweet) => {
                debug!("status {} received", tweets.len() + 1);
                tweets.push(tweet);
                if Some(tweets.len()) == limit {
                    break;
                }
            }
            None if missing_text == MissingTextPolicy::Skip => continue,
            None => break,
        }
    }
    info!("retrieved a total of {} statuses", tweets.len());
    Ok(tweets)
}
