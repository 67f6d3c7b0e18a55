//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with user agent and timeouts
//! - Attaching credential headers to every request
//! - Requesting raw JSON instead of rendered pages
//! - Error classification
//!
//! The fetcher never retries and never looks at the body.

use crate::config::HttpConfig;
use crate::credentials::CredentialProvider;
use crate::{FetchError, FetchResult};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A successful HTTP response
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code (always 2xx)
    pub status: u16,

    /// Raw response body
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues GET requests on behalf of the crawler
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl Fetcher {
    pub fn new(client: Client, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Fetches a URL with the given query parameters
    ///
    /// # Error Classification
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | HTTP 401 / 403 | `Unauthorized` (fatal) |
    /// | Other non-2xx | `Status` |
    /// | Timeout | `Timeout` |
    /// | Connection refused | `Connect` |
    /// | Body read failure, other | `Transport` |
    /// | Credential provider failure | `Credentials` (fatal) |
    pub async fn fetch(&self, url: &Url, params: &[(&str, String)]) -> FetchResult<FetchResponse> {
        let headers = self.credentials.auth_headers()?;
        let url_str = url.as_str();

        let response = self
            .client
            .get(url.clone())
            .query(params)
            .headers(headers)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| classify_transport_error(url_str, &e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized {
                url: url_str.to_string(),
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url_str.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(url_str, &e))?;

        tracing::trace!("Fetched {} ({} bytes)", url_str, body.len());

        Ok(FetchResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Maps a reqwest failure onto the fetch error taxonomy
fn classify_transport_error(url: &str, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
