use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response};
use tracing::{debug, info};
use tweet_datasets_common::Credentials;

use crate::error::TwitterError;
use crate::oauth::{self, OauthKeys};
use crate::search::SearchResponse;

pub(crate) static SEARCH_URL: &str = "https://api.twitter.com/1.1/search/tweets.json";
pub(crate) static STREAM_URL: &str = "https://stream.twitter.com/1.1/statuses/filter.json";

/// Authenticated access to the search and streaming endpoints.
pub struct TwitterClient<'a> {
    client: &'a Client,
    keys: OauthKeys,
}

impl<'a> TwitterClient<'a> {
    /// Create a new TwitterClient. Fails if any of the four credentials
    /// is missing.
    pub fn new(
        client: &'a Client,
        credentials: &Credentials,
    ) -> Result<TwitterClient<'a>, TwitterError> {
        info!("creating an API connection");
        let keys = OauthKeys::try_from(credentials)?;
        Ok(Self { client, keys })
    }

    /// Fetch one page of search results.
    pub(crate) async fn search_page(
        &self,
        params: &[(String, String)],
    ) -> Result<SearchResponse, TwitterError> {
        let resp = self.get(SEARCH_URL, params).await?;
        resp.json().await.map_err(|e| TwitterError::Parse {
            endpoint: SEARCH_URL,
            msg: e.to_string(),
        })
    }

    /// Open the filtered statuses stream. The response body is a chunked,
    /// effectively infinite sequence of newline-delimited statuses.
    pub(crate) async fn open_stream(
        &self,
        language: &str,
        locations: &str,
    ) -> Result<Response, TwitterError> {
        let params = [
            ("language".to_string(), language.to_string()),
            ("locations".to_string(), locations.to_string()),
        ];
        self.get(STREAM_URL, &params).await
    }

    async fn get(
        &self,
        url: &'static str,
        params: &[(String, String)],
    ) -> Result<Response, TwitterError> {
        let auth = oauth::authorization_header(&self.keys, "GET", url, params)?;
        debug!("GET {url}");
        self.client
            .get(url)
            .query(params)
            .header(AUTHORIZATION, auth)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| TwitterError::Fetch {
                endpoint: url,
                msg: e.to_string(),
            })
    }
}
