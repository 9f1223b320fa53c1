//! User-facing classification of pipeline failures and results.
//!
//! Pure mapping only: nothing here displays or notifies. The orchestrator
//! consumes these strings at every stage boundary and decides where they go
//! (CLI output, a toast, a log line).

use crate::error::{PipelineError, SubmitError};
use crate::models::UploadResult;

/// Failure category, for callers that branch on kind rather than text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or unsupported document.
    InvalidDocument,
    /// Required headers absent.
    MissingFields,
    /// Per-row defects; whole batch rejected.
    RowErrors,
    /// Network-level failure, including timeouts.
    Transport,
    /// Non-2xx response from the endpoint.
    Server,
    /// Illegal operation for the current pipeline state.
    State,
}

/// Classify a pipeline failure.
pub fn classify(error: &PipelineError) -> ErrorCategory {
    match error {
        PipelineError::Decode(_) => ErrorCategory::InvalidDocument,
        PipelineError::Validation(outcome) if !outcome.missing_fields.is_empty() => {
            ErrorCategory::MissingFields
        }
        PipelineError::Validation(_) => ErrorCategory::RowErrors,
        PipelineError::Submit(SubmitError::Server { .. }) => ErrorCategory::Server,
        PipelineError::Submit(_) => ErrorCategory::Transport,
        PipelineError::Busy | PipelineError::NothingStaged => ErrorCategory::State,
    }
}

/// One user-visible message per failure.
///
/// A server-supplied message passes through verbatim; everything else gets a
/// category-appropriate summary.
pub fn user_message(error: &PipelineError) -> String {
    match error {
        PipelineError::Decode(e) => format!("Invalid document: {}", e),
        PipelineError::Validation(outcome) if !outcome.missing_fields.is_empty() => {
            format!(
                "Missing required fields: {}",
                outcome.missing_fields.join(", ")
            )
        }
        PipelineError::Validation(outcome) => format!("Rows rejected: {}", outcome),
        PipelineError::Submit(SubmitError::Server { message: Some(m), .. }) => m.clone(),
        PipelineError::Submit(_) => "Error uploading candidates".to_string(),
        PipelineError::Busy => "An upload is already in progress".to_string(),
        PipelineError::NothingStaged => "Select and validate a file first".to_string(),
    }
}

/// Compose the success message for a reconciled upload.
///
/// The notification clause appears only when the server actually had
/// candidates to notify; `total == 0` reads the same as an absent field.
pub fn success_message(result: &UploadResult) -> String {
    match result.notification_stats {
        Some(stats) if stats.total > 0 => format!(
            "{} submitted, {} of {} notified",
            result.submitted_count, stats.sent, stats.total
        ),
        _ => format!("{} submitted", result.submitted_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::models::NotificationStats;
    use crate::validation::{RowError, ValidationOutcome};

    fn result(submitted: u64, stats: Option<NotificationStats>) -> UploadResult {
        UploadResult { submitted_count: submitted, notification_stats: stats }
    }

    #[test]
    fn test_success_message_with_notifications() {
        let result = result(10, Some(NotificationStats { sent: 3, total: 4, failed: 0 }));
        assert_eq!(success_message(&result), "10 submitted, 3 of 4 notified");
    }

    #[test]
    fn test_success_message_without_stats() {
        assert_eq!(success_message(&result(10, None)), "10 submitted");
    }

    #[test]
    fn test_success_message_zero_total_omits_clause() {
        // Field present but nobody to notify: same as absent.
        let result = result(10, Some(NotificationStats::default()));
        assert_eq!(success_message(&result), "10 submitted");
    }

    #[test]
    fn test_missing_fields_listed() {
        let err = PipelineError::Validation(ValidationOutcome {
            missing_fields: vec!["phone_number".into(), "department".into()],
            row_errors: Vec::new(),
        });
        assert_eq!(classify(&err), ErrorCategory::MissingFields);
        assert_eq!(
            user_message(&err),
            "Missing required fields: phone_number, department"
        );
    }

    #[test]
    fn test_row_errors_category() {
        let err = PipelineError::Validation(ValidationOutcome {
            missing_fields: Vec::new(),
            row_errors: vec![RowError {
                row: 0,
                field: "email".into(),
                reason: "must contain exactly one '@' with text on both sides".into(),
            }],
        });
        assert_eq!(classify(&err), ErrorCategory::RowErrors);
        assert!(user_message(&err).contains("email"));
    }

    #[test]
    fn test_server_message_passes_through_verbatim() {
        let err = PipelineError::Submit(SubmitError::Server {
            status: 400,
            message: Some("Candidate at row 3 is missing required fields: email".into()),
        });
        assert_eq!(
            user_message(&err),
            "Candidate at row 3 is missing required fields: email"
        );
    }

    #[test]
    fn test_transport_and_bare_server_errors_generic() {
        let transport = PipelineError::Submit(SubmitError::Transport("timed out".into()));
        assert_eq!(classify(&transport), ErrorCategory::Transport);
        assert_eq!(user_message(&transport), "Error uploading candidates");

        let bare = PipelineError::Submit(SubmitError::Server { status: 502, message: None });
        assert_eq!(classify(&bare), ErrorCategory::Server);
        assert_eq!(user_message(&bare), "Error uploading candidates");
    }

    #[test]
    fn test_decode_category() {
        let err = PipelineError::Decode(DecodeError::EmptySheet);
        assert_eq!(classify(&err), ErrorCategory::InvalidDocument);
        assert!(user_message(&err).starts_with("Invalid document"));
    }
}
