//! # ot-watch
//!
//! Turns the Orthanc change log into a stream of per-change actions.
//!
//! - [`ChangeWatch`] pages through a [`ChangeLog`] and decides, after every
//!   page, whether to fetch again, sleep until the next poll, or finish.
//!   Backfill, live tail and resweep are just different [`WatchConfig`]s.
//! - [`WatchGroup`] runs several watches at once. The first failure cancels
//!   the rest and is the only error reported.
//! - [`Dispatcher`] is the [`ChangeHandler`] that filters changes and prints
//!   them or pipes them to an external command.

pub mod action;
pub mod config;
pub mod group;
pub mod source;
pub mod watch;

mod error;

#[cfg(test)]
mod test_support;

pub use action::{Action, ChangeHandler, Dispatcher};
pub use config::WatchConfig;
pub use error::{ActionError, WatchError};
pub use group::{WatchGroup, run_all};
pub use source::ChangeLog;
pub use watch::ChangeWatch;

pub use tokio_util::sync::CancellationToken;
