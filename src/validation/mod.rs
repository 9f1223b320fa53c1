//! Schema and field validation for decoded roster documents.
//!
//! Validation runs in two phases, in order:
//!
//! 1. **Header completeness** - the required headers
//!    (`candidate_name`, `email`, `phone_number`, `department`) must all be
//!    present, compared case-sensitively and exactly. If any are missing,
//!    validation stops: field checks are meaningless without a column to
//!    anchor them to.
//! 2. **Row checks** - per row: `candidate_name` and `department` non-empty
//!    after trimming, `email` of the shape `local@domain` with exactly one
//!    `@`, `phone_number` non-empty. The phone value is never reformatted;
//!    whether `+1234567890` is a usable number is the operator's call.
//!
//! A non-empty [`ValidationOutcome`] rejects the whole batch. There is no
//! partial upload of valid rows: partial batches would make the downstream
//! notification reconciliation ambiguous.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::models::REQUIRED_FIELDS;

/// Exactly one `@`, non-empty local and domain parts.
static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]+@[^@]+$").expect("email regex is valid"));

/// One violated check in one row.
///
/// `row` is the index into the decoded row sequence (0-based, header row
/// excluded). A row may contribute several entries.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub field: String,
    pub reason: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // +2: 1-based plus the header row, the line the operator sees.
        write!(f, "row {} ({}): {}", self.row + 2, self.field, self.reason)
    }
}

/// Result of validating a decoded document.
///
/// Empty on both counts means the document is accepted.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Required headers absent from the document, in required order.
    pub missing_fields: Vec<String>,
    /// Per-row violations, in row order.
    pub row_errors: Vec<RowError>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.missing_fields.is_empty() && self.row_errors.is_empty()
    }
}

impl std::fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.missing_fields.is_empty() {
            return write!(
                f,
                "missing required fields: {}",
                self.missing_fields.join(", ")
            );
        }
        match self.row_errors.as_slice() {
            [] => write!(f, "valid"),
            [first] => write!(f, "{}", first),
            [first, rest @ ..] => write!(f, "{} (+{} more)", first, rest.len()),
        }
    }
}

/// Validate a decoded document against the roster contract.
///
/// Rows are never mutated; values are read as literals.
pub fn validate(headers: &[String], rows: &[Value]) -> ValidationOutcome {
    let missing_fields: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .map(|required| required.to_string())
        .collect();

    // Hard stop: no row processing when headers are incomplete.
    if !missing_fields.is_empty() {
        return ValidationOutcome { missing_fields, row_errors: Vec::new() };
    }

    let mut row_errors = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        check_row(index, row, &mut row_errors);
    }

    ValidationOutcome { missing_fields, row_errors }
}

fn check_row(index: usize, row: &Value, errors: &mut Vec<RowError>) {
    let cell = |field: &str| row.get(field).and_then(Value::as_str).unwrap_or_default();

    if cell("candidate_name").trim().is_empty() {
        push(errors, index, "candidate_name", "must not be empty");
    }

    let email = cell("email");
    if !EMAIL_SHAPE.is_match(email.trim()) {
        push(errors, index, "email", "must contain exactly one '@' with text on both sides");
    }

    if cell("department").trim().is_empty() {
        push(errors, index, "department", "must not be empty");
    }

    if cell("phone_number").trim().is_empty() {
        push(errors, index, "phone_number", "must not be empty");
    }
}

fn push(errors: &mut Vec<RowError>, row: usize, field: &str, reason: &str) {
    errors.push(RowError {
        row,
        field: field.to_string(),
        reason: reason.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn good_row() -> Value {
        json!({
            "candidate_name": "Alice",
            "email": "alice@example.com",
            "phone_number": "+1234567890",
            "department": "Engineering"
        })
    }

    #[test]
    fn test_complete_document_valid() {
        let outcome = validate(
            &headers(&["candidate_name", "email", "phone_number", "department"]),
            &[good_row()],
        );
        assert!(outcome.is_valid());
    }

    #[test]
    fn test_missing_headers_stop_row_checks() {
        // Rows are deliberately broken; they must not be inspected.
        let broken_row = json!({ "candidate_name": "" });
        let outcome = validate(&headers(&["candidate_name", "email"]), &[broken_row]);

        assert_eq!(outcome.missing_fields, vec!["phone_number", "department"]);
        assert!(outcome.row_errors.is_empty());
        assert!(!outcome.is_valid());
    }

    #[test]
    fn test_header_match_is_case_sensitive() {
        let outcome = validate(
            &headers(&["Candidate_Name", "email", "phone_number", "department"]),
            &[],
        );
        assert_eq!(outcome.missing_fields, vec!["candidate_name"]);
    }

    #[test]
    fn test_empty_name_yields_one_row_error() {
        let mut row = good_row();
        row["candidate_name"] = json!("   ");
        let outcome = validate(
            &headers(&["candidate_name", "email", "phone_number", "department"]),
            &[good_row(), row],
        );

        assert_eq!(outcome.row_errors.len(), 1);
        assert_eq!(outcome.row_errors[0].row, 1);
        assert_eq!(outcome.row_errors[0].field, "candidate_name");
    }

    #[test]
    fn test_email_shape() {
        for bad in ["", "no-at-sign", "@domain", "local@", "a@b@c"] {
            let mut row = good_row();
            row["email"] = json!(bad);
            let outcome = validate(
                &headers(&["candidate_name", "email", "phone_number", "department"]),
                &[row],
            );
            assert_eq!(outcome.row_errors.len(), 1, "expected rejection of {:?}", bad);
            assert_eq!(outcome.row_errors[0].field, "email");
        }

        let mut row = good_row();
        row["email"] = json!("x@y");
        let outcome = validate(
            &headers(&["candidate_name", "email", "phone_number", "department"]),
            &[row],
        );
        assert!(outcome.is_valid());
    }

    #[test]
    fn test_one_row_many_reasons() {
        let row = json!({
            "candidate_name": "",
            "email": "broken",
            "phone_number": "",
            "department": ""
        });
        let outcome = validate(
            &headers(&["candidate_name", "email", "phone_number", "department"]),
            &[row],
        );
        assert_eq!(outcome.row_errors.len(), 4);
        assert!(outcome.row_errors.iter().all(|e| e.row == 0));
    }

    #[test]
    fn test_phone_literal_never_reformatted() {
        let row = json!({
            "candidate_name": "Alice",
            "email": "alice@example.com",
            "phone_number": "+00 (123) 456",
            "department": "Engineering"
        });
        let rows = [row.clone()];
        let outcome = validate(
            &headers(&["candidate_name", "email", "phone_number", "department"]),
            &rows,
        );
        assert!(outcome.is_valid());
        // Validation never mutates rows.
        assert_eq!(rows[0], row);
    }

    #[test]
    fn test_outcome_display() {
        let outcome = ValidationOutcome {
            missing_fields: vec!["phone_number".into(), "department".into()],
            row_errors: Vec::new(),
        };
        assert_eq!(
            outcome.to_string(),
            "missing required fields: phone_number, department"
        );
    }
}
