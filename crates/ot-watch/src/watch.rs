//! The change watch state machine.
//!
//! ```text
//! Fetching → Dispatching → Deciding ─┬→ Fetching   (more entries known)
//!                                    ├→ Sleeping → Fetching
//!                                    ├→ Done
//!                                    └→ Failed
//! ```
//!
//! Fetches and poll sleeps race the cancellation token, and the token is
//! checked again before every dispatch and at the top of Deciding.

use ot_api::LogPage;
use tokio_util::sync::CancellationToken;

use crate::action::ChangeHandler;
use crate::config::WatchConfig;
use crate::error::WatchError;
use crate::source::ChangeLog;

/// What to do after a page has been dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Fetch,
    Sleep,
    Done,
}

/// One run over the change log.
#[derive(Debug, Clone)]
pub struct ChangeWatch {
    name: &'static str,
    config: WatchConfig,
}

impl ChangeWatch {
    /// `name` only labels log output (`tail`, `backfill`, `resweep`, ...).
    #[must_use]
    pub const fn new(name: &'static str, config: WatchConfig) -> Self {
        Self { name, config }
    }

    #[must_use]
    pub const fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Page through `log`, handing each new entry to `handler`, until the
    /// configured stop condition is met.
    ///
    /// Handler failures are logged and skipped; they never end the run.
    ///
    /// # Errors
    ///
    /// - [`WatchError::Configuration`] if the config fails validation.
    /// - [`WatchError::Transport`] on the first failed fetch.
    /// - [`WatchError::Cancelled`] once `token` is cancelled.
    pub async fn run<L, H>(
        &self,
        log: &L,
        token: &CancellationToken,
        handler: &H,
    ) -> Result<(), WatchError>
    where
        L: ChangeLog,
        H: ChangeHandler,
    {
        self.config.validate()?;

        let name = self.name;
        let mut current = self.config.start_index;
        let mut dispatched: u64 = 0;

        if self.config.is_empty_range() {
            tracing::info!(
                watch = name,
                start = current,
                stop = ?self.config.stop_index,
                "nothing to watch"
            );
            return Ok(());
        }

        tracing::debug!(watch = name, config = ?self.config, "watch started");

        loop {
            let page = tokio::select! {
                biased;
                () = token.cancelled() => return Err(WatchError::Cancelled),
                page = log.fetch_page(current, self.config.page_limit) => page?,
            };
            tracing::debug!(
                watch = name,
                after = current,
                count = page.entries.len(),
                last = page.last_seq,
                at_end = page.is_at_end,
                "page fetched"
            );

            let before = current;
            for entry in &page.entries {
                if entry.seq <= current {
                    tracing::trace!(watch = name, seq = entry.seq, "skipping already seen entry");
                    continue;
                }
                if let Some(stop) = self.config.stop_index
                    && entry.seq > stop
                {
                    // Everything up to `stop` has been seen.
                    current = stop;
                    break;
                }
                if token.is_cancelled() {
                    return Err(WatchError::Cancelled);
                }
                if let Err(error) = handler.handle(entry).await {
                    tracing::warn!(watch = name, seq = entry.seq, %error, "change action failed");
                }
                current = entry.seq;
                dispatched += 1;
            }

            if token.is_cancelled() {
                return Err(WatchError::Cancelled);
            }

            match self.decide(&page, before, current) {
                Decision::Fetch => {}
                Decision::Done => {
                    tracing::info!(watch = name, position = current, dispatched, "watch finished");
                    return Ok(());
                }
                Decision::Sleep => {
                    tracing::trace!(
                        watch = name,
                        interval = ?self.config.poll_interval,
                        "at tail, sleeping"
                    );
                    tokio::select! {
                        biased;
                        () = token.cancelled() => return Err(WatchError::Cancelled),
                        () = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                }
            }
        }
    }

    fn decide(&self, page: &LogPage, before: u64, current: u64) -> Decision {
        if self.config.stop_index.is_some_and(|stop| current >= stop) {
            return Decision::Done;
        }
        // A page that moved us nowhere counts as the tail, otherwise a server
        // reporting Done=false with nothing new would be refetched forever.
        let at_tail = page.is_at_end || current == before;
        if !at_tail {
            Decision::Fetch
        } else if self.config.stop_at_end || self.config.poll_interval.is_zero() {
            Decision::Done
        } else {
            Decision::Sleep
        }
    }
}
