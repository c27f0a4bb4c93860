//! HTTP client for the dictionary endpoint.

use std::time::Duration;

use crate::FetchError;

/// The base URL of the dictionary site.
const BASE_URL: &str = "https://tw.dictionary.yahoo.com";
/// The relative path of the lookup page.
const QUERY_PATH: &str = "/dictionary";
/// The query parameter carrying the word or phrase.
const QUERY_WORD_PARAM: &str = "p";
/// The site only emits "did you mean" markup when the request carries a
/// recognizable browser user-agent, so we present ourselves as one.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// A client for the Yahoo Taiwan dictionary lookup page.
///
/// Issues exactly one GET per [`Client::fetch`] call; there are no
/// retries and no caching.
#[derive(Debug)]
pub struct Client {
    base_url: String,
    client: reqwest::Client,
}

impl Client {
    /// Attempts to construct a `Client` with default settings: the
    /// browser-like user-agent and a 30-second timeout.
    pub fn try_new() -> Result<Client, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(FetchError::BuildClient)?;

        Ok(Self::with_client(client))
    }

    /// Constructs a `Client` around a pre-configured `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Client {
        let base_url = String::from(BASE_URL);

        Client { base_url, client }
    }

    /// Fetches the result page for `query` and returns the raw HTML body.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Transport`] on DNS, connection, or timeout
    ///   failures, or when the body cannot be read.
    /// - [`FetchError::BadStatus`] when the server answers with a
    ///   non-success status code.
    pub async fn fetch(&self, query: &str) -> Result<String, FetchError> {
        let url = format!("{base_url}{QUERY_PATH}", base_url = self.base_url);
        tracing::info!(url = %url, query, "Fetching dictionary page");

        let response = self
            .client
            .get(url)
            .query(&[(QUERY_WORD_PARAM, query)])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status));
        }

        let body = response.text().await.map_err(FetchError::Transport)?;
        tracing::info!(bytes = body.len(), "Received HTML");

        Ok(body)
    }
}
