use super::*;
use crate::api::tests::{BASE, api, files, run_agent_ok};
use crate::error::ClientErrorStatus;
use crate::history::{MSG_HISTORY_FAILED, ReportHistory};
use crate::request::{MockHttpClient, MockReply};
use medscore_shared::Flag;
use serde_json::json;

fn run_agent_url() -> String {
    format!("{}/run-agent", BASE)
}

fn history_url() -> String {
    format!("{}/report-history-list", BASE)
}

fn history_ok() -> serde_json::Value {
    json!({
        "success": true,
        "result": [
            { "report_id": "r2", "created_at": "2025-05-02T09:00:00", "status": "completed" },
            { "report_id": "r1", "created_at": "2025-05-01T09:00:00", "status": "failed" }
        ]
    })
}

fn ready_workflow() -> UploadWorkflow {
    let (resume, credential) = files();
    let mut workflow = UploadWorkflow::new();
    assert!(workflow.select_resume(Some(resume)));
    assert!(workflow.select_credential(Some(credential)));
    workflow
}

/// Applies an outcome the way the dashboard does.
fn settle(
    workflow: &mut UploadWorkflow,
    history: &mut ReportHistory,
    seq: u64,
    outcome: SubmissionOutcome,
) {
    if let Some(refresh) = outcome.history {
        history.apply(seq, refresh);
    }
    workflow.finish(outcome.ticket_id, outcome.result);
}

async fn submit(
    api: &MedScoreApi<MockHttpClient>,
    workflow: &mut UploadWorkflow,
    history: &mut ReportHistory,
) {
    let ticket = workflow.begin_submit().expect("submission admitted");
    let seq = history.begin_refresh();
    let outcome = submit_documents(api, "tok", ticket).await;
    settle(workflow, history, seq, outcome);
}

#[test]
fn missing_files_never_reach_the_backend() {
    let (resume, credential) = files();
    let selections = [
        (None, None),
        (Some(resume.clone()), None),
        (None, Some(credential.clone())),
    ];

    for (r, c) in selections {
        let mut workflow = UploadWorkflow::new();
        workflow.select_resume(r);
        workflow.select_credential(c);

        assert!(workflow.begin_submit().is_none());
        assert_eq!(workflow.state(), SubmissionState::Idle);
        assert_eq!(workflow.message(), MSG_MISSING_FILES);
        assert!(workflow.can_submit());
    }
}

#[tokio::test]
async fn success_refreshes_history_once() {
    let api = api();
    api.client().mock_response(&run_agent_url(), 200, run_agent_ok());
    api.client().mock_response(&history_url(), 200, history_ok());

    let mut workflow = ready_workflow();
    let mut history = ReportHistory::new();
    submit(&api, &mut workflow, &mut history).await;

    assert_eq!(workflow.state(), SubmissionState::Succeeded);
    assert_eq!(workflow.message(), MSG_UPLOAD_OK);
    let result = workflow.result().unwrap();
    assert_eq!(result.classifier_label, "high_risk");
    assert_eq!(result.credibility.score, 42);
    assert_eq!(result.credibility.flag, Some(Flag::Yellow));
    assert_eq!(result.credibility.discrepancies, vec!["x".to_string()]);

    assert_eq!(api.client().count(&run_agent_url()), 1);
    assert_eq!(api.client().count(&history_url()), 1);
    assert_eq!(history.reports().len(), 2);
    assert_eq!(history.reports()[0].report_id, "r2");
}

#[tokio::test]
async fn failed_refresh_does_not_downgrade_success() {
    let api = api();
    api.client().mock_response(&run_agent_url(), 200, run_agent_ok());
    api.client().mock_reply(&history_url(), MockReply::Fail);

    let mut workflow = ready_workflow();
    let mut history = ReportHistory::new();
    submit(&api, &mut workflow, &mut history).await;

    assert_eq!(workflow.state(), SubmissionState::Succeeded);
    assert_eq!(api.client().count(&history_url()), 1);
    assert_eq!(history.notice(), Some(MSG_HISTORY_FAILED));
}

#[tokio::test]
async fn backend_failure_fails_without_refresh() {
    let api = api();
    api.client().mock_response(
        &run_agent_url(),
        500,
        json!({"detail": "Agent crashed"}),
    );

    let mut workflow = ready_workflow();
    let ticket = workflow.begin_submit().unwrap();
    let outcome = submit_documents(&api, "tok", ticket).await;

    let err = outcome.result.as_ref().unwrap_err();
    assert_eq!(err.status, ClientErrorStatus::Rejected);
    assert!(err.to_string().contains("upload.submit"));
    assert!(outcome.history.is_none());

    let mut history = ReportHistory::new();
    let seq = history.begin_refresh();
    settle(&mut workflow, &mut history, seq, outcome);
    assert_eq!(workflow.state(), SubmissionState::Failed);
    assert_eq!(workflow.message(), MSG_UPLOAD_FAILED);
    assert!(workflow.result().is_none());
    assert_eq!(api.client().count(&history_url()), 0);
    // The picked files survive so the user can retry.
    assert!(workflow.selection().is_complete());
}

#[tokio::test]
async fn resubmit_after_failure() {
    let api = api();
    api.client().mock_reply(&run_agent_url(), MockReply::Fail);
    let mut workflow = ready_workflow();
    let mut history = ReportHistory::new();
    submit(&api, &mut workflow, &mut history).await;
    assert_eq!(workflow.state(), SubmissionState::Failed);

    api.client().mock_response(&run_agent_url(), 200, run_agent_ok());
    api.client().mock_response(&history_url(), 200, history_ok());
    submit(&api, &mut workflow, &mut history).await;
    assert_eq!(workflow.state(), SubmissionState::Succeeded);
    assert_eq!(workflow.message(), MSG_UPLOAD_OK);
}

#[test]
fn one_submission_in_flight() {
    let mut workflow = ready_workflow();
    let ticket = workflow.begin_submit().unwrap();
    assert_eq!(workflow.state(), SubmissionState::Submitting);
    assert!(!workflow.can_submit());

    assert!(workflow.begin_submit().is_none());
    assert!(!workflow.select_resume(None));
    assert!(!workflow.reset());
    assert_eq!(workflow.state(), SubmissionState::Submitting);

    let result = serde_json::from_value(run_agent_ok()["result"].clone()).unwrap();
    assert!(workflow.finish(ticket.id, Ok(result)));
}

#[test]
fn stale_results_are_dropped() {
    let mut workflow = ready_workflow();
    let _ticket = workflow.begin_submit().unwrap();
    let result = serde_json::from_value(run_agent_ok()["result"].clone()).unwrap();

    assert!(!workflow.finish(Uuid::new_v4(), Ok(result)));
    assert_eq!(workflow.state(), SubmissionState::Submitting);
}

#[test]
fn reset_clears_selection_and_result() {
    let mut workflow = ready_workflow();
    let ticket = workflow.begin_submit().unwrap();
    let result = serde_json::from_value(run_agent_ok()["result"].clone()).unwrap();
    workflow.finish(ticket.id, Ok(result));
    assert!(workflow.begin_submit().is_none());

    assert!(workflow.reset());
    assert_eq!(workflow.state(), SubmissionState::Idle);
    assert!(workflow.result().is_none());
    assert_eq!(workflow.selection(), &UploadSelection::default());
    assert_eq!(workflow.message(), "");
}

#[tokio::test]
async fn reset_after_failure_clears_the_error() {
    let api = api();
    api.client().mock_reply(&run_agent_url(), MockReply::Fail);
    let mut workflow = ready_workflow();
    let mut history = ReportHistory::new();

    submit(&api, &mut workflow, &mut history).await;
    assert_eq!(workflow.state(), SubmissionState::Failed);
    assert_eq!(workflow.message(), MSG_UPLOAD_FAILED);

    assert!(workflow.reset());
    assert_eq!(workflow.state(), SubmissionState::Idle);
    assert_eq!(workflow.message(), "");
    assert_eq!(workflow.selection(), &UploadSelection::default());
    assert!(workflow.begin_submit().is_none());
}

#[tokio::test(start_paused = true)]
async fn hung_backend_times_out_into_failed() {
    let api = api();
    api.client().mock_reply(&run_agent_url(), MockReply::Hang);
    let mut workflow = ready_workflow();
    let mut history = ReportHistory::new();

    submit(&api, &mut workflow, &mut history).await;
    assert_eq!(workflow.state(), SubmissionState::Failed);
    assert_eq!(workflow.message(), MSG_UPLOAD_FAILED);
}
