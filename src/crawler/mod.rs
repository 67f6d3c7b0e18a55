//! Crawler module for live feed traversal and participant matching
//!
//! This module contains the core search logic, including:
//! - HTTP fetching with credential headers and failure classification
//! - Feed page and social list decoding
//! - Request pacing
//! - Match aggregation and overall crawl coordination

mod aggregator;
mod coordinator;
mod endpoints;
mod fetcher;
mod pacer;
mod parser;
mod social;

pub use aggregator::MatchAggregator;
pub use coordinator::{CancelHandle, CrawlProgress, Crawler, SearchRequest};
pub use endpoints::Endpoints;
pub use fetcher::{build_http_client, FetchResponse, Fetcher};
pub use pacer::{Clock, Pacer, SystemClock, VirtualClock};
pub use parser::parse_feed_page;
pub use social::{parse_social_list, SocialList};

use crate::config::Config;
use crate::credentials::CredentialProvider;
use crate::model::SearchReport;
use crate::RadarError;
use std::sync::Arc;

/// Runs a complete presence search
///
/// This is the main entry point for a one-off search. It will:
/// 1. Validate the configuration and search parameters
/// 2. Build the HTTP client
/// 3. Warm up the session
/// 4. Walk each category's feed pages within the stream budget
/// 5. Collect every target found in the streams' social lists
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `credentials` - Supplies authentication headers
/// * `target_ids` - Accounts to look for
/// * `stream_budget` - Streams inspected per category
/// * `categories` - Category names; `None` falls back to the configured list, then to all
///
/// # Returns
///
/// * `Ok(SearchReport)` - Search completed
/// * `Err(RadarError)` - Invalid parameters, or the search was aborted
pub async fn search<S: AsRef<str>>(
    config: Config,
    credentials: Arc<dyn CredentialProvider>,
    target_ids: &[S],
    stream_budget: u32,
    categories: Option<&[String]>,
) -> Result<SearchReport, RadarError> {
    let categories = categories.unwrap_or(&config.search.categories);
    let request = SearchRequest::new(target_ids, stream_budget, Some(categories))?;

    let crawler = Crawler::new(config.clone(), credentials)?;
    Ok(crawler.search(&request).await?)
}
