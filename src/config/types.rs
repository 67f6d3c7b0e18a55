use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Main configuration structure for Gifter-Radar
///
/// Every section falls back to its defaults, so an empty file is a valid
/// configuration pointing at the production endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub pacing: PacingConfig,
    pub http: HttpConfig,
    pub endpoints: EndpointConfig,
    pub credentials: CredentialsConfig,
    pub output: OutputConfig,
}

/// Default search parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of streams inspected per category
    #[serde(rename = "stream-budget")]
    pub stream_budget: u32,

    /// Streams requested per feed page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Gifters requested per stream
    #[serde(rename = "social-page-size")]
    pub social_page_size: u32,

    /// Whether viewers are requested alongside gifters
    #[serde(rename = "enable-viewers")]
    pub enable_viewers: bool,

    /// Categories searched when the caller names none (all when empty)
    pub categories: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            stream_budget: 50,
            page_size: 50,
            social_page_size: 100,
            enable_viewers: true,
            categories: Vec::new(),
        }
    }
}

/// Request pacing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Minimum time between two consecutive requests (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Take a longer pause every this many streams within a category
    #[serde(rename = "burst-every")]
    pub burst_every: u32,

    /// Length of the longer pause (milliseconds)
    #[serde(rename = "burst-pause-ms")]
    pub burst_pause_ms: u64,

    /// Pause after the warmup request, as a multiple of the request delay
    #[serde(rename = "warmup-pause-factor")]
    pub warmup_pause_factor: u32,
}

impl PacingConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn burst_pause(&self) -> Duration {
        Duration::from_millis(self.burst_pause_ms)
    }

    pub fn warmup_pause(&self) -> Duration {
        self.request_delay() * self.warmup_pause_factor
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 500,
            burst_every: 25,
            burst_pause_ms: 2000,
            warmup_pause_factor: 2,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36"
                .to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Platform endpoint locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Page requested once before crawling to establish a session
    #[serde(rename = "landing-url")]
    pub landing_url: String,

    /// Live feed endpoint, queried with `tag`, `pageCount` and `pageSize`
    #[serde(rename = "feed-base")]
    pub feed_base: String,

    /// Stream social endpoint, extended with `/{streamId}/topGifters`
    #[serde(rename = "social-base")]
    pub social_base: String,

    /// Prefix for account profile links
    #[serde(rename = "profile-base")]
    pub profile_base: String,

    /// Prefix for stream links
    #[serde(rename = "stream-base")]
    pub stream_base: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            landing_url: "https://tango.me/live/recommended".to_string(),
            feed_base: "https://gateway.tango.me/proxycador/api/live/feeds/v1/byTags".to_string(),
            social_base: "https://gateway.tango.me/proxycador/api/public/v1/live/stream/social/v1"
                .to_string(),
            profile_base: "https://tango.me/profile/".to_string(),
            stream_base: "https://tango.me/stream/".to_string(),
        }
    }
}

/// Static headers handed to the credential provider
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub headers: BTreeMap<String, String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the JSON search reports
    #[serde(rename = "results-dir")]
    pub results_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: "./results".to_string(),
        }
    }
}
