use async_trait::async_trait;
use futures::TryStreamExt;
use page_turner::prelude::*;
use serde::Deserialize;
use tracing::info;
use tweet_datasets_common::{Tweet, LANG};

use crate::client::TwitterClient;
use crate::error::TwitterError;
use crate::status::Status;
use crate::Miner;

const PAGE_SIZE: u32 = 100;

/// Parameters of one search request. A fresh request carries the query,
/// language, and page size; follow-up requests carry exactly whatever the
/// continuation cursor said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    params: Vec<(String, String)>,
}

impl SearchRequest {
    pub fn new(query: &str, lang: &str, page_size: u32) -> Self {
        Self {
            params: vec![
                ("q".to_string(), query.to_string()),
                ("lang".to_string(), lang.to_string()),
                ("count".to_string(), page_size.to_string()),
            ],
        }
    }

    pub(crate) fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct SearchResponse {
    statuses: Vec<Status>,
    search_metadata: Option<SearchMetadata>,
}

#[derive(Deserialize, Debug)]
struct SearchMetadata {
    next_results: Option<String>,
}

impl SearchResponse {
    fn tweets(&self) -> Vec<Tweet> {
        self.statuses.iter().filter_map(Status::record).collect()
    }

    /// The request for the next page, if the response says one exists.
    fn next_request(&self) -> Result<Option<SearchRequest>, TwitterError> {
        self.search_metadata
            .as_ref()
            .and_then(|meta| meta.next_results.as_deref())
            .map(|cursor| decode_cursor(cursor).map(|params| SearchRequest { params }))
            .transpose()
    }
}

/// Decode a continuation cursor into the next request's parameters.
///
/// The cursor is treated as an opaque URL-query-string-like blob, e.g.
/// `?max_id=313519052523986943&q=NCAA&include_entities=1`. Nothing beyond
/// that shape is assumed, and this is the only place that decodes it.
fn decode_cursor(cursor: &str) -> Result<Vec<(String, String)>, TwitterError> {
    cursor
        .trim_start_matches('?')
        .split('&')
        .map(|pair| {
            let malformed = || TwitterError::Cursor {
                cursor: cursor.to_string(),
            };
            let (key, value) = pair.split_once('=').ok_or_else(malformed)?;
            let value = urlencoding::decode(value).map_err(|_| malformed())?;
            Ok((key.to_string(), value.into_owned()))
        })
        .collect()
}

impl PageTurner<SearchRequest> for TwitterClient<'_> {
    type PageItems = Vec<Tweet>;
    type PageError = TwitterError;

    async fn turn_page(&self, request: SearchRequest) -> TurnedPageResult<Self, SearchRequest> {
        let response = self.search_page(request.params()).await?;
        let tweets = response.tweets();
        match response.next_request()? {
            Some(next) => Ok(TurnedPage::next(tweets, next)),
            None => Ok(TurnedPage::last(tweets)),
        }
    }
}

/// Retrieve all the tweets of a topic: every page of every query, in
/// configuration order, duplicates retained. Any transport or decode
/// failure fails the whole collection.
pub struct TopicMiner<'a> {
    client: TwitterClient<'a>,
    queries: Vec<String>,
}

impl<'a> TopicMiner<'a> {
    pub fn new(client: TwitterClient<'a>, queries: Vec<String>) -> Self {
        Self { client, queries }
    }
}

#[async_trait]
impl Miner for TopicMiner<'_> {
    async fn collect(&self) -> Result<Vec<Tweet>, TwitterError> {
        let mut all_tweets = Vec::new();
        for query in &self.queries {
            info!("retrieving statuses with query {query}");
            let request = SearchRequest::new(query, LANG, PAGE_SIZE);
            let tweets: Vec<Tweet> = self.client.pages(request).items().try_collect().await?;
            info!("retrieved {} statuses with query {query}", tweets.len());
            all_tweets.extend(tweets);
        }
        info!("retrieved a total of {} statuses", all_tweets.len());
        Ok(all_tweets)
    }
}
