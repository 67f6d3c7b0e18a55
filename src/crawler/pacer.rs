//! Request pacing
//!
//! The platform enforces undocumented rate limits, so the crawler keeps a
//! fixed gap between the end of one request and the start of the next, and
//! takes a longer break every few streams.
//!
//! Time is read through the [`Clock`] port so the pacing rules can be
//! exercised with a [`VirtualClock`] instead of real sleeps.

use crate::config::PacingConfig;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Port for time abstraction
///
/// This allows the crawler to use different time sources:
/// - Real system time and tokio sleeps in production
/// - Virtual time that advances instantly for tests
#[async_trait]
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Instant;

    /// Suspend the caller for the given duration of this clock's time
    async fn sleep(&self, duration: Duration);

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}

/// Real system clock backed by tokio timers
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

/// Clock whose time only moves when someone sleeps on it
///
/// Every sleep returns immediately, advances the clock, and is recorded so
/// tests can assert on the exact pauses a crawl would have taken.
#[derive(Debug)]
pub struct VirtualClock {
    origin: Instant,
    state: Mutex<VirtualState>,
}

#[derive(Debug, Default)]
struct VirtualState {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Mutex::new(VirtualState::default()),
        }
    }

    /// Moves time forward without recording a sleep
    pub fn advance(&self, duration: Duration) {
        self.lock().elapsed += duration;
    }

    /// Every sleep taken so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.lock().sleeps.clone()
    }

    /// Total virtual time spent sleeping
    pub fn total_slept(&self) -> Duration {
        self.lock().sleeps.iter().sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VirtualState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for VirtualClock {
    fn now(&self) -> Instant {
        self.origin + self.lock().elapsed
    }

    async fn sleep(&self, duration: Duration) {
        {
            let mut state = self.lock();
            state.elapsed += duration;
            state.sleeps.push(duration);
        }
        tokio::task::yield_now().await;
    }

    fn name(&self) -> &str {
        "VirtualClock"
    }
}

/// Fixed-interval pacer consulted before every request
pub struct Pacer {
    clock: Arc<dyn Clock>,
    request_delay: Duration,
    burst_every: u64,
    burst_pause: Duration,
    last_done: Option<Instant>,
    total_waited: Duration,
}

impl Pacer {
    pub fn new(config: &PacingConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            request_delay: config.request_delay(),
            burst_every: u64::from(config.burst_every.max(1)),
            burst_pause: config.burst_pause(),
            last_done: None,
            total_waited: Duration::ZERO,
        }
    }

    /// Waits until the configured delay has passed since the last request finished
    ///
    /// Returns the duration waited (0 if no wait was needed).
    pub async fn wait_turn(&mut self) -> Duration {
        let wait = match self.last_done {
            Some(last) => {
                let since = self.clock.now().saturating_duration_since(last);
                self.request_delay.saturating_sub(since)
            }
            None => Duration::ZERO,
        };

        if !wait.is_zero() {
            tracing::trace!("Pacer: waiting {:?} before next request", wait);
            self.sleep(wait).await;
        }

        wait
    }

    /// Records that a request has just finished
    pub fn mark_done(&mut self) {
        self.last_done = Some(self.clock.now());
    }

    /// Takes the longer break before every `burst_every`-th stream of a category
    ///
    /// `stream_number` is the 1-based position of the stream about to be
    /// inspected. Returns the duration waited.
    pub async fn stream_checkpoint(&mut self, stream_number: u64) -> Duration {
        if stream_number == 0 || stream_number % self.burst_every != 0 {
            return Duration::ZERO;
        }

        tracing::debug!(
            "Pacer: {} streams reached, pausing {:?}",
            stream_number,
            self.burst_pause
        );
        self.sleep(self.burst_pause).await;
        self.burst_pause
    }

    /// Pauses unconditionally
    pub async fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            self.sleep(duration).await;
        }
    }

    /// Total time this pacer has spent waiting
    pub fn total_waited(&self) -> Duration {
        self.total_waited
    }

    async fn sleep(&mut self, duration: Duration) {
        self.clock.sleep(duration).await;
        self.total_waited += duration;
    }
}
