//! Upload orchestration: the end-to-end state machine.
//!
//! One [`UploadOrchestrator`] owns one pipeline run:
//! select → decode → validate → preview → confirm → upload → reconcile.
//! It is the only stateful component; codec, validator and reporter are pure
//! and the submit client is an external collaborator behind
//! [`SubmitClient`](crate::submit::SubmitClient).
//!
//! The instance is single-owner and single-flight: at most one batch is in
//! flight at a time. A file selection while an upload is in progress is
//! rejected, not queued, and a second confirmation while uploading is a
//! silent no-op so repeated operator clicks cannot double-submit.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::Value;

use crate::codec::decode_bytes;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{BulkSubmitRequest, CandidateRecord, UploadResult};
use crate::preview;
use crate::submit::SubmitClient;
use crate::validation::validate;

// =============================================================================
// Pipeline State
// =============================================================================

/// Lifecycle of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineState {
    Idle,
    FileSelected,
    Previewing,
    Uploading,
    Succeeded,
    Failed,
}

impl PipelineState {
    /// A new file may be selected in any state except mid-upload.
    pub fn accepts_selection(self) -> bool {
        !matches!(self, PipelineState::Uploading)
    }

    /// Confirmation is legal with a staged batch: after a clean selection,
    /// or after a failed upload (retry without re-parsing).
    pub fn accepts_confirm(self) -> bool {
        matches!(self, PipelineState::Previewing | PipelineState::Failed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Succeeded | PipelineState::Failed)
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// What a successful file selection reports back to the operator.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionSummary {
    pub headers: Vec<String>,
    /// Bounded head of the batch, for display only.
    pub preview: Vec<Value>,
    pub row_count: usize,
}

/// Outcome of a confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// Exactly one request was issued and reconciled.
    Submitted(UploadResult),
    /// An upload was already in flight; this confirmation was ignored.
    AlreadyUploading,
}

/// The validated batch held between selection and upload.
#[derive(Debug, Clone)]
struct Batch {
    rows: Vec<Value>,
}

#[derive(Debug)]
struct Inner {
    state: PipelineState,
    batch: Option<Batch>,
}

/// Owns the pipeline state machine for one operator session.
pub struct UploadOrchestrator<C> {
    client: C,
    inner: Mutex<Inner>,
}

impl<C: SubmitClient> UploadOrchestrator<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner { state: PipelineState::Idle, batch: None }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> PipelineState {
        self.lock().state
    }

    /// Decode and validate a selected document.
    ///
    /// On success the orchestrator holds the full validated row set and
    /// transitions to `Previewing`. On any decode or validation failure it
    /// snaps back to `Idle` retaining nothing.
    pub fn select_file(&self, bytes: &[u8]) -> PipelineResult<SelectionSummary> {
        let mut inner = self.lock();
        if !inner.state.accepts_selection() {
            return Err(PipelineError::Busy);
        }
        inner.state = PipelineState::FileSelected;

        let doc = match decode_bytes(bytes) {
            Ok(doc) => doc,
            Err(e) => {
                inner.state = PipelineState::Idle;
                inner.batch = None;
                tracing::warn!(error = %e, "document rejected at decode");
                return Err(e.into());
            }
        };

        let outcome = validate(&doc.headers, &doc.rows);
        if !outcome.is_valid() {
            inner.state = PipelineState::Idle;
            inner.batch = None;
            tracing::warn!(%outcome, "document rejected at validation");
            return Err(PipelineError::Validation(outcome));
        }

        let summary = SelectionSummary {
            headers: doc.headers,
            preview: preview::project(&doc.rows).to_vec(),
            row_count: doc.rows.len(),
        };

        tracing::info!(rows = summary.row_count, "batch validated, previewing");
        inner.batch = Some(Batch { rows: doc.rows });
        inner.state = PipelineState::Previewing;
        Ok(summary)
    }

    /// Submit the staged batch in one request and reconcile the result.
    ///
    /// Legal from `Previewing`, and from `Failed` as an explicit retry that
    /// reuses the already-validated batch. While `Uploading` it is a no-op
    /// (the single-flight guard). On success the batch is cleared; a
    /// re-upload requires a fresh file selection. On failure the batch is
    /// retained so a retry needs no re-parse.
    pub async fn confirm_upload(&self) -> PipelineResult<UploadOutcome> {
        let request = {
            let mut inner = self.lock();
            if inner.state == PipelineState::Uploading {
                return Ok(UploadOutcome::AlreadyUploading);
            }
            if !inner.state.accepts_confirm() {
                return Err(PipelineError::NothingStaged);
            }
            let batch = inner.batch.as_ref().ok_or(PipelineError::NothingStaged)?;
            let candidates: Vec<CandidateRecord> =
                batch.rows.iter().map(CandidateRecord::from_row).collect();
            inner.state = PipelineState::Uploading;
            BulkSubmitRequest { candidates }
        };

        match self.client.submit(&request).await {
            Ok(response) => {
                let mut inner = self.lock();
                inner.state = PipelineState::Succeeded;
                inner.batch = None;
                let result = UploadResult::from(response);
                tracing::info!(submitted = result.submitted_count, "upload succeeded");
                Ok(UploadOutcome::Submitted(result))
            }
            Err(e) => {
                let mut inner = self.lock();
                inner.state = PipelineState::Failed;
                tracing::warn!(error = %e, "upload failed, batch retained for retry");
                Err(e.into())
            }
        }
    }

    /// Drop any staged batch and return to `Idle`.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.state = PipelineState::Idle;
        inner.batch = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SubmitError, SubmitResult};
    use crate::models::BulkSubmitResponse;

    /// Fake client that always reports success without issuing anything.
    struct NullClient;

    impl SubmitClient for NullClient {
        async fn submit(&self, request: &BulkSubmitRequest) -> SubmitResult<BulkSubmitResponse> {
            Ok(BulkSubmitResponse {
                submitted_count: request.candidates.len() as u64,
                notification_stats: None,
                message: None,
            })
        }
    }

    const VALID_CSV: &[u8] =
        b"candidate_name,email,phone_number,department\nAlice,alice@example.com,+1,Engineering\n";

    #[test]
    fn test_select_valid_document_previews() {
        let orchestrator = UploadOrchestrator::new(NullClient);
        let summary = orchestrator.select_file(VALID_CSV).unwrap();

        assert_eq!(orchestrator.state(), PipelineState::Previewing);
        assert_eq!(summary.row_count, 1);
        assert_eq!(summary.preview.len(), 1);
    }

    #[test]
    fn test_select_invalid_document_snaps_to_idle() {
        let orchestrator = UploadOrchestrator::new(NullClient);
        let err = orchestrator
            .select_file(b"candidate_name,email\nAlice,alice@example.com\n")
            .unwrap_err();

        assert!(matches!(err, PipelineError::Validation(_)));
        assert_eq!(orchestrator.state(), PipelineState::Idle);
    }

    #[tokio::test]
    async fn test_confirm_without_selection_is_an_error() {
        let orchestrator = UploadOrchestrator::new(NullClient);
        let err = orchestrator.confirm_upload().await.unwrap_err();
        assert!(matches!(err, PipelineError::NothingStaged));
    }

    #[tokio::test]
    async fn test_success_clears_batch() {
        let orchestrator = UploadOrchestrator::new(NullClient);
        orchestrator.select_file(VALID_CSV).unwrap();

        let outcome = orchestrator.confirm_upload().await.unwrap();
        match outcome {
            UploadOutcome::Submitted(result) => assert_eq!(result.submitted_count, 1),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(orchestrator.state(), PipelineState::Succeeded);

        // Re-upload requires a fresh selection.
        let err = orchestrator.confirm_upload().await.unwrap_err();
        assert!(matches!(err, PipelineError::NothingStaged));
    }

    #[test]
    fn test_state_predicates() {
        assert!(PipelineState::Idle.accepts_selection());
        assert!(PipelineState::Failed.accepts_selection());
        assert!(!PipelineState::Uploading.accepts_selection());

        assert!(PipelineState::Previewing.accepts_confirm());
        assert!(PipelineState::Failed.accepts_confirm());
        assert!(!PipelineState::Idle.accepts_confirm());
        assert!(!PipelineState::Succeeded.accepts_confirm());

        assert!(PipelineState::Succeeded.is_terminal());
        assert!(PipelineState::Failed.is_terminal());
        assert!(!PipelineState::Previewing.is_terminal());
    }

    #[tokio::test]
    async fn test_reset_drops_the_staged_batch() {
        let orchestrator = UploadOrchestrator::new(NullClient);
        orchestrator.select_file(VALID_CSV).unwrap();
        assert_eq!(orchestrator.state(), PipelineState::Previewing);

        orchestrator.reset();
        assert_eq!(orchestrator.state(), PipelineState::Idle);

        let err = orchestrator.confirm_upload().await.unwrap_err();
        assert!(matches!(err, PipelineError::NothingStaged));
    }
}
