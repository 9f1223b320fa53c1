//! Error types for the rosterload import pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`DecodeError`] - spreadsheet/CSV decoding errors
//! - [`SubmitError`] - transport and server errors from the bulk-submit call
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

use crate::validation::ValidationOutcome;

// =============================================================================
// Decoding Errors
// =============================================================================

/// Errors while decoding or encoding a spreadsheet document.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a recognizable spreadsheet container.
    #[error("Not a recognizable spreadsheet document: {0}")]
    Unrecognized(String),

    /// Workbook-level failure from the xlsx/xls reader.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// CSV parsing failure.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Text decoding failure.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The first sheet has no rows at all.
    #[error("First sheet is empty")]
    EmptySheet,

    /// Header row exists but no data rows follow it.
    #[error("Document contains no candidate rows")]
    NoRows,

    /// Workbook write failure (template generation).
    #[error("Failed to write workbook: {0}")]
    Write(String),
}

// =============================================================================
// Submission Errors
// =============================================================================

/// Errors from the bulk-submit endpoint call.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Endpoint URL is not configured.
    #[error("Submit endpoint not configured (set ROSTERLOAD_ENDPOINT)")]
    MissingEndpoint,

    /// Network-level failure, including transport timeouts.
    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-2xx response. `message` is the server-supplied text, if any.
    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    /// 2xx response whose body does not satisfy the submit contract.
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by
/// [`crate::pipeline::UploadOrchestrator`]. It wraps all lower-level errors
/// and adds state-machine-specific variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Document decoding error.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The batch failed header or row validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationOutcome),

    /// Submission error.
    #[error("Submit error: {0}")]
    Submit(#[from] SubmitError),

    /// An upload is in flight; new file selections are rejected, not queued.
    #[error("An upload is already in progress")]
    Busy,

    /// `confirm_upload` called with no validated batch staged.
    #[error("No validated batch staged for upload")]
    NothingStaged,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for decode/encode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for submission operations.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
