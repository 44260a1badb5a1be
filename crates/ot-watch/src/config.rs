//! Per-run watch configuration.

use std::time::Duration;

use crate::error::WatchError;

/// Entries requested per fetch unless configured otherwise.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// When a [`ChangeWatch`](crate::ChangeWatch) starts and stops.
///
/// The three usage patterns:
///
/// ```text
/// backfill  start=0         stop=Some(snapshot)  poll=0
/// tail      start=snapshot  stop=None            poll>0
/// resweep   start=0         stop_at_end=true
/// ```
///
/// With `poll_interval == 0`, no `stop_index` and `stop_at_end == false` the
/// run makes a single pass and finishes the first time it reaches the tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Exclusive lower bound: the first entry dispatched has `seq > start_index`.
    pub start_index: u64,
    /// Finish once every entry up to and including this index was handled.
    pub stop_index: Option<u64>,
    /// Finish as soon as a page reports the live tail.
    pub stop_at_end: bool,
    /// Sleep between fetches once the tail is reached. Zero finishes instead.
    pub poll_interval: Duration,
    /// Entries requested per fetch.
    pub page_limit: u32,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            start_index: 0,
            stop_index: None,
            stop_at_end: false,
            poll_interval: Duration::ZERO,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl WatchConfig {
    /// Replay history from the beginning up to `stop`.
    #[must_use]
    pub fn backfill(stop: u64) -> Self {
        Self {
            stop_index: Some(stop),
            ..Self::default()
        }
    }

    /// Follow new entries after `start`, polling every `poll_interval`.
    #[must_use]
    pub fn tail(start: u64, poll_interval: Duration) -> Self {
        Self {
            start_index: start,
            poll_interval,
            ..Self::default()
        }
    }

    /// One full pass over the log as it is right now.
    #[must_use]
    pub fn resweep() -> Self {
        Self {
            stop_at_end: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// True if the run only ends through cancellation.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.stop_index.is_none() && !self.stop_at_end && !self.poll_interval.is_zero()
    }

    /// True if the run would finish without fetching anything.
    #[must_use]
    pub fn is_empty_range(&self) -> bool {
        self.stop_index.is_some_and(|stop| self.start_index >= stop)
    }

    /// Reject configurations that can never advance.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Configuration`] if `page_limit` is zero.
    pub fn validate(&self) -> Result<(), WatchError> {
        if self.page_limit == 0 {
            return Err(WatchError::Configuration(
                "page_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
