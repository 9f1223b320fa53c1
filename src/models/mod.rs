//! Domain models for the rosterload import pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`CandidateRecord`] - one candidate row, all fields preserved as literal text
//! - [`BulkSubmitRequest`] / [`BulkSubmitResponse`] - wire types for the bulk-submit endpoint
//! - [`NotificationStats`] - outbound-notification reconciliation counts
//! - [`UploadResult`] - the outcome surfaced to the operator after a successful upload

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Field Names
// =============================================================================

/// Column headers of the canonical template, in order.
pub const TEMPLATE_FIELDS: [&str; 6] = [
    "candidate_name",
    "email",
    "phone_number",
    "department",
    "has_resume",
    "comment",
];

/// Headers that must be present for a document to be accepted.
pub const REQUIRED_FIELDS: [&str; 4] = ["candidate_name", "email", "phone_number", "department"];

// =============================================================================
// Candidate Record
// =============================================================================

/// One candidate, as submitted to the bulk endpoint.
///
/// Every field is free text. `phone_number` and `has_resume` are semantically
/// typed but carried as literal strings end to end so that leading zeros,
/// a leading `+`, and `TRUE`/`FALSE` literals survive the round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateRecord {
    pub candidate_name: String,
    pub email: String,
    pub phone_number: String,
    pub department: String,
    pub has_resume: String,
    pub comment: String,
}

impl CandidateRecord {
    /// Build a record from a decoded row object. Absent columns default to
    /// empty strings; extra columns are dropped.
    pub fn from_row(row: &Value) -> Self {
        let field = |name: &str| {
            row.get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            candidate_name: field("candidate_name"),
            email: field("email"),
            phone_number: field("phone_number"),
            department: field("department"),
            has_resume: field("has_resume"),
            comment: field("comment"),
        }
    }

    /// Narrow parse of the `has_resume` literal: case-insensitive
    /// `"true"`/`"false"` only, `None` for anything else.
    pub fn resume_on_file(&self) -> Option<bool> {
        parse_has_resume(&self.has_resume)
    }
}

/// Parse a `has_resume` cell literal.
///
/// Accepts case-insensitive `"true"` and `"false"` (surrounding whitespace
/// tolerated) and nothing else. Applied at the point of use, never during
/// decode.
pub fn parse_has_resume(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Payload of the single bulk-submit request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkSubmitRequest {
    pub candidates: Vec<CandidateRecord>,
}

/// Aggregate result of the server-side outbound notifications, counting only
/// the candidates flagged as having no résumé.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationStats {
    pub sent: u64,
    pub total: u64,
    /// Reported by some server versions; not used for reconciliation.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub failed: u64,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

/// Success body of the bulk-submit endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkSubmitResponse {
    /// Older server builds report `inserted_count` instead.
    #[serde(alias = "submittedCount", alias = "inserted_count")]
    pub submitted_count: u64,

    #[serde(default)]
    pub notification_stats: Option<NotificationStats>,

    #[serde(default)]
    pub message: Option<String>,
}

impl BulkSubmitResponse {
    /// Check the reconciliation invariant: `0 <= sent <= total <= submitted`.
    pub fn check_invariants(&self) -> Result<(), String> {
        if let Some(stats) = self.notification_stats {
            if stats.sent > stats.total {
                return Err(format!(
                    "notification_stats.sent ({}) exceeds total ({})",
                    stats.sent, stats.total
                ));
            }
            if stats.total > self.submitted_count {
                return Err(format!(
                    "notification_stats.total ({}) exceeds submitted count ({})",
                    stats.total, self.submitted_count
                ));
            }
        }
        Ok(())
    }
}

/// Error envelope of the bulk-submit endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Upload Result
// =============================================================================

/// What a completed upload reconciled to.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UploadResult {
    pub submitted_count: u64,
    pub notification_stats: Option<NotificationStats>,
}

impl From<BulkSubmitResponse> for UploadResult {
    fn from(response: BulkSubmitResponse) -> Self {
        Self {
            submitted_count: response.submitted_count,
            notification_stats: response.notification_stats,
        }
    }
}
