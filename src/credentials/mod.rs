//! Credential providers for platform requests
//!
//! Acquiring and renewing session tokens happens outside this crate. The
//! crawler only asks a provider for the headers to attach to each request
//! and never mutates the session itself.

use crate::config::CredentialsConfig;
use crate::{FetchError, FetchResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Supplies authentication headers for every request
pub trait CredentialProvider: Send + Sync {
    /// Returns the headers to attach to the next request
    ///
    /// An error here is fatal for the whole crawl.
    fn auth_headers(&self) -> FetchResult<HeaderMap>;
}

/// Sends requests without any credentials
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CredentialProvider for Anonymous {
    fn auth_headers(&self) -> FetchResult<HeaderMap> {
        Ok(HeaderMap::new())
    }
}

/// Attaches a fixed set of headers, typically a session cookie
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    headers: HeaderMap,
}

impl StaticCredentials {
    /// Builds a provider from name/value pairs
    ///
    /// # Returns
    ///
    /// * `Ok(StaticCredentials)` - All names and values are valid header text
    /// * `Err(FetchError::Credentials)` - A name or value cannot be sent
    pub fn new<I, K, V>(pairs: I) -> FetchResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            let name = HeaderName::from_bytes(name.as_ref().as_bytes()).map_err(|e| {
                FetchError::Credentials(format!("invalid header name '{}': {}", name.as_ref(), e))
            })?;
            let mut value = HeaderValue::from_str(value.as_ref()).map_err(|e| {
                FetchError::Credentials(format!("invalid value for header '{}': {}", name, e))
            })?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }
        Ok(Self { headers })
    }

    /// Builds a provider from the `[credentials]` configuration section
    pub fn from_config(config: &CredentialsConfig) -> FetchResult<Self> {
        Self::new(&config.headers)
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl CredentialProvider for StaticCredentials {
    fn auth_headers(&self) -> FetchResult<HeaderMap> {
        Ok(self.headers.clone())
    }
}
