//! Endpoint URL construction
//!
//! Configured base URLs are parsed once; per-request URLs and the links
//! embedded in match records are derived from them by appending path
//! segments, so identifiers are always percent-encoded.

use crate::config::EndpointConfig;
use crate::model::Category;
use crate::ConfigError;
use url::Url;

/// Parsed platform endpoints
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub landing: Url,
    pub feed: Url,
    social_base: Url,
    profile_base: Url,
    stream_base: Url,
}

impl Endpoints {
    /// Parses every configured endpoint
    ///
    /// # Returns
    ///
    /// * `Ok(Endpoints)` - All endpoints are usable base URLs
    /// * `Err(ConfigError::InvalidUrl)` - An endpoint failed to parse or cannot carry a path
    pub fn from_config(config: &EndpointConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            landing: parse_endpoint("landing_url", &config.landing_url)?,
            feed: parse_endpoint("feed_base", &config.feed_base)?,
            social_base: parse_endpoint("social_base", &config.social_base)?,
            profile_base: parse_endpoint("profile_base", &config.profile_base)?,
            stream_base: parse_endpoint("stream_base", &config.stream_base)?,
        })
    }

    /// Query parameters for one feed page
    pub fn feed_params(category: Category, page: u64, page_size: u32) -> Vec<(&'static str, String)> {
        vec![
            ("tag", category.feed_tag().to_string()),
            ("pageCount", page.to_string()),
            ("pageSize", page_size.to_string()),
        ]
    }

    /// URL of a stream's top-gifters list: `{social_base}/{stream_id}/topGifters`
    pub fn social_url(&self, stream_id: &str) -> Url {
        with_segments(&self.social_base, &[stream_id, "topGifters"])
    }

    /// Query parameters for a stream's top-gifters list
    pub fn social_params(page_size: u32, enable_viewers: bool) -> Vec<(&'static str, String)> {
        vec![
            ("pageCount", "0".to_string()),
            ("pageSize", page_size.to_string()),
            ("enableViewers", enable_viewers.to_string()),
        ]
    }

    /// Public profile link for an account
    pub fn profile_link(&self, account_id: &str) -> String {
        with_segments(&self.profile_base, &[account_id]).into()
    }

    /// Public link for a live stream
    pub fn stream_link(&self, stream_id: &str) -> String {
        with_segments(&self.stream_base, &[stream_id]).into()
    }
}

fn parse_endpoint(name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' cannot be used as a base URL",
            name, value
        )));
    }

    Ok(url)
}

/// Appends path segments to a base URL, ignoring a trailing slash on the base
fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
