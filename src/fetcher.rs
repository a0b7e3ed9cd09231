//! Entry page fetching
//!
//! One GET per entry, no retries. Every failure mode is returned as a
//! [`FetchError`] so the batch driver can record it and move on.

use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::HttpConfig;
use crate::wiki_url::EntryName;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request timed out after {timeout_secs}s ({url})")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("HTTP status {status} ({url})")]
    Status { url: String, status: u16 },

    #[error("network error: {message} ({url})")]
    Network { url: String, message: String },

    #[error("failed to read response body: {message} ({url})")]
    Body { url: String, message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// A successfully fetched entry page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// HTTP client bound to one wiki host
#[derive(Debug, Clone)]
pub struct EntryFetcher {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl EntryFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Page URL for an entry on this fetcher's host
    pub fn url_for(&self, name: &EntryName) -> String {
        name.url(&self.base_url)
    }

    /// Fetch the page for `name`
    pub async fn fetch(&self, name: &EntryName) -> Result<FetchedPage, FetchError> {
        let url = self.url_for(name);
        self.fetch_url(&url).await
    }

    /// Single GET against an already-built URL
    async fn fetch_url(&self, url: &str) -> Result<FetchedPage, FetchError> {
        debug!("Fetching entry page: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!("Non-success status {} for {}", status, url);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error(url)
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(FetchedPage {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    fn classify(&self, url: &str, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            return self.timeout_error(url);
        }
        if let Some(status) = error.status() {
            return FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            };
        }
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }

    fn timeout_error(&self, url: &str) -> FetchError {
        FetchError::Timeout {
            url: url.to_string(),
            timeout_secs: self.timeout_secs,
        }
    }
}
