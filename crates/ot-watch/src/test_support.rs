//! Shared test utilities for ot-watch unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use ot_api::{ApiError, ChangeEntry, LogPage, ResourceType};
use tokio_util::sync::CancellationToken;

use crate::action::ChangeHandler;
use crate::error::ActionError;
use crate::source::ChangeLog;

pub fn entry(seq: u64) -> ChangeEntry {
    ChangeEntry {
        seq,
        change_type: if seq % 2 == 0 { "StableStudy" } else { "NewInstance" }.to_string(),
        resource_type: ResourceType::Instance,
        resource_id: format!("resource-{seq}"),
        path: format!("/instances/resource-{seq}"),
        timestamp: "20240312T101500".to_string(),
    }
}

/// In-memory change log that counts fetches and can fail on demand.
pub struct MemoryLog {
    entries: Mutex<Vec<ChangeEntry>>,
    fetches: AtomicUsize,
    fail_on_fetch: Option<usize>,
}

impl MemoryLog {
    pub fn with_seqs(seqs: impl IntoIterator<Item = u64>) -> Self {
        Self {
            entries: Mutex::new(seqs.into_iter().map(entry).collect()),
            fetches: AtomicUsize::new(0),
            fail_on_fetch: None,
        }
    }

    /// Make the `n`th fetch (1-based) fail with a 503.
    pub const fn failing_on(mut self, n: usize) -> Self {
        self.fail_on_fetch = Some(n);
        self
    }

    pub fn push(&self, seq: u64) {
        self.entries.lock().unwrap().push(entry(seq));
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ChangeLog for MemoryLog {
    async fn fetch_page(&self, after: u64, limit: u32) -> Result<LogPage, ApiError> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_fetch == Some(n) {
            return Err(ApiError::Api {
                status: 503,
                message: "unavailable".into(),
            });
        }

        let entries = self.entries.lock().unwrap();
        let newer: Vec<ChangeEntry> = entries.iter().filter(|e| e.seq > after).cloned().collect();
        let limit = limit as usize;
        Ok(LogPage {
            is_at_end: newer.len() <= limit,
            entries: newer.into_iter().take(limit).collect(),
            last_seq: entries.last().map_or(0, |e| e.seq),
        })
    }

    async fn last_index(&self) -> Result<(Option<ChangeEntry>, u64), ApiError> {
        let entries = self.entries.lock().unwrap();
        let last = entries.last().cloned();
        let seq = last.as_ref().map_or(0, |e| e.seq);
        Ok((last, seq))
    }
}

/// Handler that records every sequence number it sees.
#[derive(Default)]
pub struct Recorder {
    seen: Mutex<Vec<u64>>,
    fail_on: Option<u64>,
    cancel_at: Option<(u64, CancellationToken)>,
}

impl Recorder {
    pub fn failing_on(seq: u64) -> Self {
        Self {
            fail_on: Some(seq),
            ..Self::default()
        }
    }

    /// Cancel `token` while handling `seq`.
    pub fn cancelling_at(seq: u64, token: CancellationToken) -> Self {
        Self {
            cancel_at: Some((seq, token)),
            ..Self::default()
        }
    }

    pub fn seen(&self) -> Vec<u64> {
        self.seen.lock().unwrap().clone()
    }
}

impl ChangeHandler for Recorder {
    async fn handle(&self, entry: &ChangeEntry) -> Result<(), ActionError> {
        self.seen.lock().unwrap().push(entry.seq);
        if let Some((seq, token)) = &self.cancel_at
            && *seq == entry.seq
        {
            token.cancel();
        }
        if self.fail_on == Some(entry.seq) {
            return Err(ActionError::Io {
                program: "recorder".into(),
                source: std::io::Error::other("boom"),
            });
        }
        Ok(())
    }
}
