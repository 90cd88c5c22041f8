//! Running counters for the poll loop, exposed through the daemon status call.

use chrono::{DateTime, Utc};
use serde::Serialize;

use roomsync_core::{PollError, ReconcileReport};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PollStats {
    pub polls_ok: u64,
    pub polls_failed: u64,
    /// Ticks dropped because the previous poll was still in flight.
    pub ticks_skipped: u64,
    pub last_poll_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error_kind: Option<String>,
    pub last_error: Option<String>,
    pub last_updated: usize,
    pub last_unmatched: usize,
    /// Unreadable room entries in the last successful snapshot.
    pub last_malformed: usize,
}

impl PollStats {
    pub fn record(&mut self, result: &Result<ReconcileReport, PollError>, at: DateTime<Utc>) {
        self.last_poll_at = Some(at);
        match result {
            Ok(report) => {
                self.polls_ok += 1;
                self.last_success_at = Some(at);
                self.last_error_kind = None;
                self.last_error = None;
                self.last_updated = report.updated.len();
                self.last_unmatched = report.unmatched.len();
                self.last_malformed = report.malformed.len();
            }
            Err(e) => {
                self.polls_failed += 1;
                self.last_error_kind = Some(e.kind().to_string());
                self.last_error = Some(e.to_string());
            }
        }
    }

    pub fn record_skip(&mut self) {
        self.ticks_skipped += 1;
    }
}
