//! Crawler coordinator - main search orchestration logic
//!
//! This module contains the crawl loop that drives a presence search:
//! - Warming up the session with a throwaway landing request
//! - Walking categories and feed pages in order
//! - Inspecting each stream's social list within the per-category budget
//! - Pacing every request and honouring cancellation between requests
//! - Finalizing the report, including after an early stop

use crate::config::Config;
use crate::credentials::CredentialProvider;
use crate::crawler::aggregator::MatchAggregator;
use crate::crawler::endpoints::Endpoints;
use crate::crawler::fetcher::{build_http_client, FetchResponse, Fetcher};
use crate::crawler::pacer::{Clock, Pacer, SystemClock};
use crate::crawler::parser::parse_feed_page;
use crate::crawler::social::{parse_social_list, SocialList};
use crate::model::{Category, SearchReport, StreamRef, TargetSet};
use crate::{AbortReason, ConfigError, ConfigResult, FetchError, SearchError};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Validated parameters of one presence search
#[derive(Debug, Clone)]
pub struct SearchRequest {
    targets: TargetSet,
    stream_budget: u32,
    categories: Vec<Category>,
}

impl SearchRequest {
    /// Builds a search request
    ///
    /// # Arguments
    ///
    /// * `target_ids` - Accounts to look for
    /// * `stream_budget` - Streams inspected per category
    /// * `categories` - Category names in search order; `None` or empty means all
    ///
    /// # Returns
    ///
    /// * `Ok(SearchRequest)` - Parameters are usable
    /// * `Err(ConfigError)` - No targets, a zero budget, or an unknown category
    pub fn new<S, C>(target_ids: &[S], stream_budget: u32, categories: Option<&[C]>) -> ConfigResult<Self>
    where
        S: AsRef<str>,
        C: AsRef<str>,
    {
        let targets = TargetSet::new(target_ids);
        if targets.is_empty() {
            return Err(ConfigError::EmptyTargets);
        }

        if stream_budget == 0 {
            return Err(ConfigError::ZeroBudget);
        }

        Ok(Self {
            targets,
            stream_budget,
            categories: Category::parse_selection(categories)?,
        })
    }

    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    pub fn stream_budget(&self) -> u32 {
        self.stream_budget
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

/// Cooperative cancellation flag shared with a running search
///
/// The crawler checks it between network calls, so a cancelled search stops
/// after the request currently in flight.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clears the flag so the crawler can run another search
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

/// Counters describing how a crawl went
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlProgress {
    /// Streams inspected, including those whose social list was skipped
    pub streams_searched: u64,
    /// Streams whose social list could not be fetched or decoded
    pub streams_skipped: u64,
    /// Feed pages decoded successfully
    pub pages_fetched: u64,
    /// Feed pages that could not be fetched or decoded
    pub pages_skipped: u64,
    /// Time spent waiting on the pacer
    pub paused: Duration,
}

/// Main crawler structure
pub struct Crawler {
    config: Arc<Config>,
    fetcher: Fetcher,
    endpoints: Endpoints,
    clock: Arc<dyn Clock>,
    cancel: CancelHandle,
}

impl Crawler {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `credentials` - Supplies authentication headers for every request
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run searches
    /// * `Err(RadarError)` - Invalid configuration or HTTP client failure
    pub fn new(config: Config, credentials: Arc<dyn CredentialProvider>) -> crate::Result<Self> {
        config.validate()?;
        let endpoints = Endpoints::from_config(&config.endpoints)?;
        let client = build_http_client(&config.http)?;

        Ok(Self {
            config: Arc::new(config),
            fetcher: Fetcher::new(client, credentials),
            endpoints,
            clock: Arc::new(SystemClock),
            cancel: CancelHandle::default(),
        })
    }

    /// Replaces the clock used for pacing
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns a handle that cancels searches run by this crawler
    ///
    /// A cancel issued while no search is running stops the next one. The
    /// flag is cleared once a search has stopped because of it.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Runs one presence search
    ///
    /// Pages and streams that fail to fetch or decode are skipped. The
    /// search only stops early when it is cancelled or the platform rejects
    /// the credentials; the report gathered so far is then returned inside
    /// `SearchError::Aborted`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gifter_radar::config::Config;
    /// use gifter_radar::credentials::Anonymous;
    /// use gifter_radar::crawler::{Crawler, SearchRequest};
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let crawler = Crawler::new(Config::default(), Arc::new(Anonymous))?;
    /// let request = SearchRequest::new(&["account-id"], 100, Some(&["Popular"][..]))?;
    /// let report = crawler.search(&request).await?;
    /// println!("{} matches", report.total_found);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchReport, SearchError> {
        let started_at = Utc::now();
        tracing::info!(
            "Starting search for {} targets in {} categories ({} streams each)",
            request.targets().len(),
            request.categories().len(),
            request.stream_budget()
        );

        let mut run = CrawlRun::new(self, request);
        let outcome = run.execute().await;
        let (report, progress) = run.finish(started_at);

        tracing::info!(
            "Search finished: {} matches in {} streams ({} pages read, {} pages and {} streams skipped, {:.1}s paused)",
            report.total_found,
            report.searched_streams_count,
            progress.pages_fetched,
            progress.pages_skipped,
            progress.streams_skipped,
            progress.paused.as_secs_f64()
        );

        if matches!(outcome, Err(AbortReason::Cancelled)) {
            self.cancel.reset();
        }

        match outcome {
            Ok(()) => Ok(report),
            Err(reason) => {
                tracing::error!("Search aborted: {}", reason);
                Err(SearchError::Aborted {
                    partial: Box::new(report),
                    reason,
                })
            }
        }
    }
}

/// State of one search; counters live here rather than on the crawler
struct CrawlRun<'a> {
    crawler: &'a Crawler,
    request: &'a SearchRequest,
    pacer: Pacer,
    aggregator: MatchAggregator,
    progress: CrawlProgress,
    categories_searched: Vec<Category>,
}

impl<'a> CrawlRun<'a> {
    fn new(crawler: &'a Crawler, request: &'a SearchRequest) -> Self {
        Self {
            crawler,
            request,
            pacer: Pacer::new(&crawler.config.pacing, crawler.clock.clone()),
            aggregator: MatchAggregator::new(request.targets().clone(), crawler.endpoints.clone()),
            progress: CrawlProgress::default(),
            categories_searched: Vec::new(),
        }
    }

    async fn execute(&mut self) -> Result<(), AbortReason> {
        self.warmup().await;

        let request = self.request;
        for &category in request.categories() {
            self.check_cancelled()?;
            self.categories_searched.push(category);
            self.crawl_category(category).await?;
        }

        Ok(())
    }

    /// Requests the landing page once to establish session context; failures are ignored
    async fn warmup(&mut self) {
        let crawler = self.crawler;
        let landing = &crawler.endpoints.landing;
        tracing::debug!("Warming up session at {}", landing);

        match self.paced_fetch(landing, &[]).await {
            Ok(_) => tracing::debug!("Warmup request succeeded"),
            Err(e) => tracing::debug!("Warmup request failed (ignored): {}", e),
        }

        self.pacer.pause(crawler.config.pacing.warmup_pause()).await;
    }

    async fn crawl_category(&mut self, category: Category) -> Result<(), AbortReason> {
        let budget = u64::from(self.request.stream_budget());
        let page_size = self.crawler.config.search.page_size;
        let pages = pages_for_budget(budget, page_size);

        // The budget applies per category
        let mut processed: u64 = 0;

        tracing::info!(
            "Searching category \"{}\" ({} pages of {})",
            category,
            pages,
            page_size
        );

        'pages: for page in 0..pages {
            self.check_cancelled()?;
            if processed >= budget {
                break;
            }

            let streams = self.fetch_page(category, page).await?;
            if streams.is_empty() {
                continue;
            }

            for stream in streams {
                self.check_cancelled()?;
                if processed >= budget {
                    break 'pages;
                }

                processed += 1;
                self.pacer.stream_checkpoint(processed).await;
                tracing::info!(
                    "Stream {} of {} in {}: {} found so far",
                    processed,
                    budget,
                    category,
                    self.aggregator.total_found()
                );

                self.inspect_stream(&stream).await?;
                self.progress.streams_searched += 1;
            }
        }

        tracing::info!("Category \"{}\" done: {} streams inspected", category, processed);
        Ok(())
    }

    /// Fetches and parses one feed page; a bad page yields no streams
    async fn fetch_page(&mut self, category: Category, page: u64) -> Result<Vec<StreamRef>, AbortReason> {
        let crawler = self.crawler;
        let page_size = crawler.config.search.page_size;
        let params = Endpoints::feed_params(category, page, page_size);

        tracing::debug!("Fetching {} page {}", category, page + 1);
        let response = match self.paced_fetch(&crawler.endpoints.feed, &params).await {
            Ok(response) => response,
            Err(e) if e.is_fatal() => return Err(AbortReason::Fatal(e)),
            Err(e) => {
                tracing::warn!("Skipping {} page {}: {}", category, page + 1, e);
                self.progress.pages_skipped += 1;
                return Ok(Vec::new());
            }
        };

        match parse_feed_page(&response.body, category, page_size as usize) {
            Ok(streams) => {
                tracing::debug!("{} page {}: {} streams", category, page + 1, streams.len());
                self.progress.pages_fetched += 1;
                Ok(streams)
            }
            Err(e) => {
                tracing::warn!("Skipping malformed {} page {}: {}", category, page + 1, e);
                self.progress.pages_skipped += 1;
                Ok(Vec::new())
            }
        }
    }

    /// Fetches a stream's social list and hands it to the aggregator
    async fn inspect_stream(&mut self, stream: &StreamRef) -> Result<(), AbortReason> {
        let crawler = self.crawler;
        let config = &crawler.config.search;
        let url = crawler.endpoints.social_url(&stream.stream_id);
        let params = Endpoints::social_params(config.social_page_size, config.enable_viewers);

        let social = match self.paced_fetch(&url, &params).await {
            Ok(response) => parse_social_list(&response.body).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed social list of stream {}: {}", stream.stream_id, e);
                self.progress.streams_skipped += 1;
                SocialList::default()
            }),
            Err(e) if e.is_fatal() => return Err(AbortReason::Fatal(e)),
            Err(e) => {
                tracing::warn!("Skipping stream {}: {}", stream.stream_id, e);
                self.progress.streams_skipped += 1;
                SocialList::default()
            }
        };

        tracing::trace!(
            "Stream {}: {} gifters, {} viewers",
            stream.stream_id,
            social.gifters.len(),
            social.viewers.len()
        );
        self.aggregator.absorb(stream, &social);
        Ok(())
    }

    async fn paced_fetch(&mut self, url: &Url, params: &[(&str, String)]) -> Result<FetchResponse, FetchError> {
        self.pacer.wait_turn().await;
        let result = self.crawler.fetcher.fetch(url, params).await;
        self.pacer.mark_done();
        result
    }

    fn check_cancelled(&self) -> Result<(), AbortReason> {
        if self.crawler.cancel.is_cancelled() {
            Err(AbortReason::Cancelled)
        } else {
            Ok(())
        }
    }

    fn finish(mut self, started_at: DateTime<Utc>) -> (SearchReport, CrawlProgress) {
        self.progress.paused = self.pacer.total_waited();
        let report = self.aggregator.into_report(
            self.progress.streams_searched,
            self.categories_searched,
            started_at,
        );
        (report, self.progress)
    }
}

/// Number of feed pages needed to cover the stream budget
fn pages_for_budget(budget: u64, page_size: u32) -> u64 {
    budget.div_ceil(u64::from(page_size.max(1)))
}
