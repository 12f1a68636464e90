//! Report history
//!
//! The dashboard's list of prior reports. Fetched once per mount and again
//! after every successful submission; a failed refresh keeps whatever was
//! shown before.
//!
//! Every request takes a sequence number when it starts. A result older
//! than the newest one already applied is dropped, so a slow mount-time
//! fetch cannot overwrite the refresh that followed an upload.

use crate::error::ClientResult;
use crate::fetch::{FetchCache, Resource};
use medscore_shared::{ReportStatus, ReportSummary};

pub const MSG_HISTORY_FAILED: &str = "Could not load Report History Data";

/// Colour of the dot next to each history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusIndicator {
    Green,
    Yellow,
    Red,
    Gray,
}

impl StatusIndicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusIndicator::Green => "green",
            StatusIndicator::Yellow => "yellow",
            StatusIndicator::Red => "red",
            StatusIndicator::Gray => "gray",
        }
    }
}

pub fn status_indicator(status: ReportStatus) -> StatusIndicator {
    match status {
        ReportStatus::Completed => StatusIndicator::Green,
        ReportStatus::Pending => StatusIndicator::Yellow,
        ReportStatus::Failed => StatusIndicator::Red,
        ReportStatus::Unknown => StatusIndicator::Gray,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportHistory {
    reports: Vec<ReportSummary>,
    notice: Option<String>,
    loaded: bool,
    fetches: FetchCache<Resource>,
    /// Last sequence number handed out.
    issued: u64,
    /// Sequence number of the newest applied result.
    applied: u64,
}

impl ReportHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in backend order (most recent first).
    pub fn reports(&self) -> &[ReportSummary] {
        &self.reports
    }

    /// Non-blocking notice from the last failed refresh.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Whether any refresh has succeeded yet.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Sequence number for the mount-time fetch; `Some` exactly once per
    /// instance.
    pub fn begin_initial_fetch(&mut self) -> Option<u64> {
        if self.fetches.try_begin(Resource::ReportHistory) {
            Some(self.next_seq())
        } else {
            None
        }
    }

    /// Sequence number for a refresh started after a submission.
    pub fn begin_refresh(&mut self) -> u64 {
        self.next_seq()
    }

    fn next_seq(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Applies the result of request `seq`.
    ///
    /// Returns whether the list was replaced. Results older than the last
    /// applied one change nothing.
    pub fn apply(&mut self, seq: u64, result: ClientResult<Vec<ReportSummary>>) -> bool {
        self.fetches.finish(&Resource::ReportHistory, result.is_ok());
        if seq <= self.applied {
            log_warn!(
                "[History] dropping result #{} (already showing #{})",
                seq,
                self.applied
            );
            return false;
        }
        self.applied = seq;

        match result {
            Ok(reports) => {
                log_info!("[History] loaded {} report(s)", reports.len());
                self.reports = reports;
                self.notice = None;
                self.loaded = true;
                true
            }
            Err(e) => {
                log_error!("[History] refresh failed: {}", e);
                self.notice = Some(MSG_HISTORY_FAILED.to_string());
                false
            }
        }
    }

    /// Hides the notice until the next failed refresh.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
