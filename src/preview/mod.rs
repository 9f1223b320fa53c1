//! Bounded preview projection over a validated batch.
//!
//! The preview exists so the operator can sanity-check the parse before
//! committing; its size is a deliberate fixed bound so a large roster never
//! has to render in full before the decision. Pure and idempotent: same
//! rows, same order, same literals.

use serde_json::Value;

/// Maximum rows shown in the preview.
pub const PREVIEW_ROW_LIMIT: usize = 5;

/// Project the first `min(5, len(rows))` rows.
pub fn project(rows: &[Value]) -> &[Value] {
    &rows[..rows.len().min(PREVIEW_ROW_LIMIT)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| {
                json!({
                    "candidate_name": format!("Candidate {}", i),
                    "phone_number": format!("+12345678{:02}", i),
                })
            })
            .collect()
    }

    #[test]
    fn test_bound_applies() {
        let rows = rows(12);
        let slice = project(&rows);

        assert_eq!(slice.len(), 5);
        // Head of the sequence, source order, literal values intact.
        assert_eq!(slice[0]["candidate_name"], "Candidate 0");
        assert_eq!(slice[4]["candidate_name"], "Candidate 4");
        assert_eq!(slice[0]["phone_number"], "+1234567800");
    }

    #[test]
    fn test_short_batch_returned_whole() {
        let rows = rows(3);
        assert_eq!(project(&rows).len(), 3);
    }

    #[test]
    fn test_idempotent() {
        let rows = rows(9);
        let once = project(&rows).to_vec();
        let twice = project(project(&rows)).to_vec();
        assert_eq!(once, twice);
    }
}
