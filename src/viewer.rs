//! Single report view
//!
//! Tracks which report is on screen and its fetch. State is replaced
//! wholesale on every transition, so an error never shows leftovers of a
//! previous report.

use crate::error::{ClientErrorStatus, ClientResult};
use crate::fetch::{FetchCache, Resource};
use medscore_shared::ReportDetail;

pub const MSG_REPORT_FAILED: &str = "Failed to fetch report.";
pub const MSG_REPORT_NOT_FOUND: &str = "Report not found.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReportViewState {
    #[default]
    Loading,
    Error(String),
    Loaded(ReportDetail),
}

#[derive(Debug, Clone, Default)]
pub struct ReportViewer {
    current_id: Option<String>,
    state: ReportViewState,
    fetches: FetchCache<Resource>,
}

impl ReportViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ReportViewState {
        &self.state
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Shows `report_id` and tells whether its fetch must be issued now.
    ///
    /// Re-entering the same id is a no-op; switching ids starts over in
    /// `Loading` with a fresh fetch.
    pub fn enter(&mut self, report_id: &str) -> bool {
        let key = Resource::Report(report_id.to_string());
        if self.current_id.as_deref() != Some(report_id) {
            if let Some(previous) = self.current_id.take() {
                self.fetches.forget(&Resource::Report(previous));
            }
            self.current_id = Some(report_id.to_string());
            self.state = ReportViewState::Loading;
            self.fetches.forget(&key);
        }
        self.fetches.try_begin(key)
    }

    /// Applies the fetch result for `report_id`.
    ///
    /// Results for an id no longer on screen are ignored.
    pub fn settle(&mut self, report_id: &str, result: ClientResult<ReportDetail>) -> bool {
        if self.current_id.as_deref() != Some(report_id) {
            log_warn!("[Report] ignoring result for superseded report {}", report_id);
            return false;
        }
        let key = Resource::Report(report_id.to_string());

        self.state = match result {
            Ok(detail) => {
                log_info!("[Report] loaded {}", report_id);
                self.fetches.finish(&key, true);
                ReportViewState::Loaded(detail)
            }
            Err(e) => {
                log_error!("[Report] {} failed: {}", report_id, e);
                self.fetches.finish(&key, false);
                let message = match e.status {
                    ClientErrorStatus::NotFound => MSG_REPORT_NOT_FOUND,
                    _ => MSG_REPORT_FAILED,
                };
                ReportViewState::Error(message.to_string())
            }
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{BASE, api, run_agent_ok};
    use crate::error::ClientError;
    use medscore_shared::{ClassificationResult, Timestamp};
    use serde_json::json;

    fn detail(id: &str) -> ReportDetail {
        let result: ClassificationResult =
            serde_json::from_value(run_agent_ok()["result"].clone()).unwrap();
        ReportDetail {
            report_id: id.to_string(),
            created_at: Timestamp::from_millis(0).unwrap(),
            classifier_label: result.classifier_label,
            credibility: result.credibility,
        }
    }

    #[test]
    fn fetches_once_per_id() {
        let mut viewer = ReportViewer::new();
        assert!(viewer.enter("r1"));
        assert_eq!(viewer.state(), &ReportViewState::Loading);
        assert!(!viewer.enter("r1"));

        assert!(viewer.settle("r1", Ok(detail("r1"))));
        assert!(!viewer.enter("r1"));
        assert!(matches!(viewer.state(), ReportViewState::Loaded(d) if d.report_id == "r1"));
    }

    #[test]
    fn changing_id_refetches() {
        let mut viewer = ReportViewer::new();
        viewer.enter("r1");
        viewer.settle("r1", Ok(detail("r1")));

        assert!(viewer.enter("r2"));
        assert_eq!(viewer.state(), &ReportViewState::Loading);
        assert!(viewer.enter("r1"));
    }

    #[test]
    fn error_replaces_previous_report() {
        let mut viewer = ReportViewer::new();
        viewer.enter("r1");
        viewer.settle("r1", Ok(detail("r1")));
        viewer.enter("r2");
        viewer.settle("r2", Err(ClientError::network("offline")));

        match viewer.state() {
            ReportViewState::Error(msg) => assert_eq!(msg, MSG_REPORT_FAILED),
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[test]
    fn superseded_results_are_ignored() {
        let mut viewer = ReportViewer::new();
        viewer.enter("r1");
        viewer.enter("r2");
        assert!(!viewer.settle("r1", Ok(detail("r1"))));
        assert_eq!(viewer.state(), &ReportViewState::Loading);
    }

    #[tokio::test]
    async fn unknown_report_shows_not_found() {
        let api = api();
        api.client().mock_response(
            &format!("{}/report/missing", BASE),
            404,
            json!({"detail": "Report not found"}),
        );
        let mut viewer = ReportViewer::new();
        assert!(viewer.enter("missing"));
        let result = api.report("t", "missing").await;
        viewer.settle("missing", result);
        assert_eq!(
            viewer.state(),
            &ReportViewState::Error(MSG_REPORT_NOT_FOUND.to_string())
        );
    }
}
