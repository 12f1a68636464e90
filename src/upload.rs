//! Upload workflow
//!
//! One instance per mounted dashboard. Owns the picked documents, the
//! submission state and the last classification result.
//!
//! ```text
//! Idle --select--> Idle
//! Idle --submit (both files)--> Submitting
//! Idle --submit (file missing)--> Idle + validation message
//! Submitting --ok--> Succeeded(result)
//! Submitting --err--> Failed + retry message
//! Succeeded --reset--> Idle
//! Failed --reset | resubmit--> Idle | Submitting
//! ```

use crate::api::MedScoreApi;
use crate::error::ClientResult;
use crate::request::{DocumentFile, HttpClient};
use medscore_shared::{ClassificationResult, ReportSummary};
use uuid::Uuid;

pub const MSG_MISSING_FILES: &str = "Please upload both documents.";
pub const MSG_UPLOAD_FAILED: &str = "Upload failed. Please try again.";
pub const MSG_UPLOAD_OK: &str = "Upload successful!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSelection {
    pub resume: Option<DocumentFile>,
    pub credential: Option<DocumentFile>,
}

impl UploadSelection {
    pub fn is_complete(&self) -> bool {
        self.resume.is_some() && self.credential.is_some()
    }
}

/// Admission token for one submission.
///
/// Carries its own copy of the documents so the request does not borrow
/// the workflow across the await.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    pub id: Uuid,
    pub resume: DocumentFile,
    pub credential: DocumentFile,
}

#[derive(Debug, Clone, Default)]
pub struct UploadWorkflow {
    selection: UploadSelection,
    state: SubmissionState,
    message: String,
    result: Option<ClassificationResult>,
    in_flight: Option<Uuid>,
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        self.result.as_ref()
    }

    pub fn selection(&self) -> &UploadSelection {
        &self.selection
    }

    /// `false` while a submission is in flight; the trigger is disabled.
    pub fn can_submit(&self) -> bool {
        matches!(self.state, SubmissionState::Idle | SubmissionState::Failed)
    }

    /// Picks (or clears, with `None`) the resume. Ignored unless the form
    /// is editable.
    pub fn select_resume(&mut self, file: Option<DocumentFile>) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.selection.resume = file;
        true
    }

    pub fn select_credential(&mut self, file: Option<DocumentFile>) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.selection.credential = file;
        true
    }

    /// Validates the selection and, if admitted, moves to `Submitting`.
    ///
    /// Returns `None` when nothing must be sent: a file is missing, or a
    /// submission is already running or finished.
    pub fn begin_submit(&mut self) -> Option<SubmissionTicket> {
        if !self.can_submit() {
            log_warn!(
                "[Upload] submit ignored while {}",
                self.state.as_str()
            );
            return None;
        }

        let (Some(resume), Some(credential)) =
            (self.selection.resume.clone(), self.selection.credential.clone())
        else {
            self.state = SubmissionState::Idle;
            self.message = MSG_MISSING_FILES.to_string();
            return None;
        };

        let id = Uuid::new_v4();
        self.state = SubmissionState::Submitting;
        self.message.clear();
        self.result = None;
        self.in_flight = Some(id);
        log_info!(
            "[Upload] submitting {} ({} bytes) and {} ({} bytes) as {}",
            resume.name,
            resume.size(),
            credential.name,
            credential.size(),
            id
        );
        Some(SubmissionTicket {
            id,
            resume,
            credential,
        })
    }

    /// Settles the submission identified by `ticket_id`.
    ///
    /// Returns `false` for a result that does not belong to the current
    /// submission; it is dropped without touching state.
    pub fn finish(&mut self, ticket_id: Uuid, outcome: ClientResult<ClassificationResult>) -> bool {
        if self.state != SubmissionState::Submitting || self.in_flight != Some(ticket_id) {
            log_warn!("[Upload] dropping stale result for {}", ticket_id);
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                log_info!(
                    "[Upload] {} classified as {} (score {})",
                    ticket_id,
                    result.classifier_label,
                    result.credibility.score
                );
                self.state = SubmissionState::Succeeded;
                self.message = MSG_UPLOAD_OK.to_string();
                self.result = Some(result);
            }
            Err(e) => {
                log_error!("[Upload] {} failed: {}", ticket_id, e);
                self.state = SubmissionState::Failed;
                self.message = MSG_UPLOAD_FAILED.to_string();
                self.result = None;
            }
        }
        true
    }

    /// Back to an empty form. Not allowed while submitting.
    pub fn reset(&mut self) -> bool {
        if self.state == SubmissionState::Submitting {
            return false;
        }
        *self = Self::new();
        true
    }
}

// =========================================================
// Submission
// =========================================================

/// Everything one submission produced, applied to view state in one step.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub ticket_id: Uuid,
    pub result: ClientResult<ClassificationResult>,
    /// History refresh issued after a successful submission; `None` when
    /// the submission failed.
    pub history: Option<ClientResult<Vec<ReportSummary>>>,
}

/// Sends the documents, then refreshes the history exactly once if the
/// backend accepted them.
pub async fn submit_documents<C: HttpClient>(
    api: &MedScoreApi<C>,
    token: &str,
    ticket: SubmissionTicket,
) -> SubmissionOutcome {
    let result = api
        .run_agent(token, &ticket.resume, &ticket.credential)
        .await
        .map_err(|e| e.in_op_with("upload.submit", ticket.id.to_string()));

    let history = match &result {
        Ok(_) => Some(api.report_history(token).await),
        Err(_) => None,
    };

    SubmissionOutcome {
        ticket_id: ticket.id,
        result,
        history,
    }
}

#[cfg(test)]
mod tests;
