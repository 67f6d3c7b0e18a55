//! Gifter-Radar: live-stream presence search
//!
//! This crate crawls a livestreaming platform's live feeds and reports every
//! currently-live stream in which one of a set of target accounts appears as
//! a gifter or a viewer.

pub mod config;
pub mod crawler;
pub mod credentials;
pub mod model;
pub mod output;

use thiserror::Error;

/// Main error type for Gifter-Radar operations
#[derive(Debug, Error)]
pub enum RadarError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Target list is empty")]
    EmptyTargets,

    #[error("Stream budget must be at least 1")]
    ZeroBudget,
}

/// Transport and status failures from a single HTTP round-trip
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Authentication rejected (HTTP {status}) for {url}")]
    Unauthorized { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Credential provider failed: {0}")]
    Credentials(String),
}

impl FetchError {
    /// Returns true if retrying other requests in the same session is pointless
    ///
    /// Rejected authentication and a broken credential provider affect every
    /// subsequent request, so they end the crawl instead of skipping one item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::Credentials(_))
    }
}

/// Malformed or unexpectedly shaped payloads
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload has no `{0}` fragment")]
    MissingFragment(&'static str),

    #[error("Fragment length mismatch: {streams} streams vs {profiles} profiles")]
    LengthMismatch { streams: usize, profiles: usize },

    #[error("Stream {stream} has no profile for broadcaster {broadcaster}")]
    MissingProfile { stream: String, broadcaster: String },

    #[error("Unexpected payload shape: {0}")]
    Shape(String),
}

/// Why a search stopped before visiting every category
#[derive(Debug, Error)]
pub enum AbortReason {
    #[error("search was cancelled")]
    Cancelled,

    #[error(transparent)]
    Fatal(FetchError),
}

/// Errors returned by a presence search
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid search parameters: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "Search aborted after {} streams ({} matches kept): {reason}",
        .partial.searched_streams_count,
        .partial.total_found
    )]
    Aborted {
        partial: Box<model::SearchReport>,
        #[source]
        reason: AbortReason,
    },
}

impl SearchError {
    /// Returns the report collected before the search stopped, if any
    pub fn partial_report(&self) -> Option<&model::SearchReport> {
        match self {
            Self::Aborted { partial, .. } => Some(partial),
            Self::Config(_) => None,
        }
    }
}

/// Result type alias for Gifter-Radar operations
pub type Result<T> = std::result::Result<T, RadarError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for payload decoding
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{search, Crawler, SearchRequest};
pub use model::{Category, Credits, MatchRecord, Role, SearchReport, TargetSet};
