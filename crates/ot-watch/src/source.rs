//! The change log a watch reads from.

use std::future::Future;
use std::sync::Arc;

use ot_api::{ApiError, ChangeEntry, LogPage, OrthancClient};

/// A paged, append-only change log.
pub trait ChangeLog: Send + Sync {
    /// Up to `limit` entries with `seq > after`, oldest first.
    fn fetch_page(
        &self,
        after: u64,
        limit: u32,
    ) -> impl Future<Output = Result<LogPage, ApiError>> + Send;

    /// The newest entry, if any, and the current tail index.
    fn last_index(
        &self,
    ) -> impl Future<Output = Result<(Option<ChangeEntry>, u64), ApiError>> + Send;
}

impl ChangeLog for OrthancClient {
    fn fetch_page(
        &self,
        after: u64,
        limit: u32,
    ) -> impl Future<Output = Result<LogPage, ApiError>> + Send {
        self.changes(after, limit)
    }

    fn last_index(
        &self,
    ) -> impl Future<Output = Result<(Option<ChangeEntry>, u64), ApiError>> + Send {
        self.last_change()
    }
}

impl<L: ChangeLog> ChangeLog for Arc<L> {
    fn fetch_page(
        &self,
        after: u64,
        limit: u32,
    ) -> impl Future<Output = Result<LogPage, ApiError>> + Send {
        (**self).fetch_page(after, limit)
    }

    fn last_index(
        &self,
    ) -> impl Future<Output = Result<(Option<ChangeEntry>, u64), ApiError>> + Send {
        (**self).last_index()
    }
}
