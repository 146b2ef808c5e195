//! HTTP fetcher for the api.weather.gov observation endpoint.
//!
//! A fetch is a single GET with no retries. Every failure is logged here and
//! handed back as a `FetchError`; nothing panics.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;

/// Media type requested from api.weather.gov.
const ACCEPT_GEO_JSON: &str = "application/geo+json";

/// Identifying User-Agent; api.weather.gov rejects anonymous clients.
const USER_AGENT: &str = "(weathergov.WeatherGov)";

/// Errors from a single fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("bad response status {0}")]
    Status(u16),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of decoded observation documents.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET `url` and decode the body as JSON.
    async fn fetch(&self, url: &str) -> Result<Value, FetchError>;
}

/// `Fetch` implementation backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = client_builder().build()?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            log::debug!("Bad request response: {}", status);
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        decode_body(&body)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        log::debug!("Making request to {} to retrieve current weather data", url);

        let result = self.get(url).await;
        if let Err(FetchError::Transport(e)) = &result {
            log::error!(
                "Exception raised while attempting to get weather data: {:?}",
                e
            );
        }
        result
    }
}

fn client_builder() -> reqwest::ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GEO_JSON));

    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
}

/// Decode a response body as JSON, logging the payload on failure.
pub fn decode_body(body: &[u8]) -> Result<Value, FetchError> {
    let text = String::from_utf8_lossy(body);
    log::debug!("Loading the following data as JSON: {}", text);

    serde_json::from_slice(body).map_err(|e| {
        log::debug!("Error loading JSON: {}", e);
        log::debug!("String that failed to load: {}", text);
        FetchError::Decode(e)
    })
}
