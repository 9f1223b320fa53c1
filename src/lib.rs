//! # Rosterload - bulk candidate roster import pipeline
//!
//! Rosterload turns an operator-filled spreadsheet into one validated,
//! single-flight bulk submission to a candidate roster endpoint.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Workbook   │────▶│    Codec    │────▶│  Validator  │────▶│  Bulk submit│
//! │ (xlsx/csv)  │     │ (literals)  │     │ (all-or-none)│    │ (one request)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rosterload::{HttpSubmitClient, UploadOrchestrator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = HttpSubmitClient::from_env().unwrap();
//!     let orchestrator = UploadOrchestrator::new(client);
//!
//!     let bytes = std::fs::read("roster.xlsx").unwrap();
//!     let summary = orchestrator.select_file(&bytes).unwrap();
//!     println!("previewing {} of {} rows", summary.preview.len(), summary.row_count);
//!
//!     let outcome = orchestrator.confirm_upload().await.unwrap();
//!     println!("{:?}", outcome);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models and wire types
//! - [`codec`] - Spreadsheet decoding/encoding with literal preservation
//! - [`template`] - Canonical template workbook generation
//! - [`validation`] - Header and row validation
//! - [`preview`] - Bounded preview projection
//! - [`submit`] - Bulk-submit HTTP client
//! - [`pipeline`] - Upload orchestration state machine
//! - [`report`] - User-facing error classification

// Core modules
pub mod error;
pub mod models;

// Document I/O
pub mod codec;
pub mod template;

// Validation & preview
pub mod preview;
pub mod validation;

// Submission
pub mod submit;

// Orchestration
pub mod pipeline;
pub mod report;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{DecodeError, PipelineError, PipelineResult, SubmitError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    parse_has_resume, BulkSubmitRequest, BulkSubmitResponse, CandidateRecord, NotificationStats,
    UploadResult, REQUIRED_FIELDS, TEMPLATE_FIELDS,
};

// =============================================================================
// Re-exports - Codec & Template
// =============================================================================

pub use codec::{decode_bytes, decode_file, encode_workbook, DecodedDocument, DocumentFormat};
pub use template::{generate_template, write_template, TEMPLATE_FILE_NAME};

// =============================================================================
// Re-exports - Validation & Preview
// =============================================================================

pub use preview::{project, PREVIEW_ROW_LIMIT};
pub use validation::{validate, RowError, ValidationOutcome};

// =============================================================================
// Re-exports - Submission & Pipeline
// =============================================================================

pub use pipeline::{
    PipelineState, SelectionSummary, UploadOrchestrator, UploadOutcome,
};
pub use submit::{HttpSubmitClient, SubmitClient, ENDPOINT_ENV};

// =============================================================================
// Re-exports - Reporting
// =============================================================================

pub use report::{classify, success_message, user_message, ErrorCategory};
