//! Canonical roster template generation.
//!
//! Produces the workbook operators download, fill in and upload: the exact
//! required header row followed by a few illustrative candidates. The
//! `phone_number` and `has_resume` columns must re-open in a spreadsheet
//! application as literal text (`+1234567890`, `FALSE`), never as numbers or
//! native booleans, so the whole sheet is written through the codec's
//! text-cell encoder.

use std::path::Path;

use crate::codec::encode_workbook;
use crate::error::DecodeResult;
use crate::models::TEMPLATE_FIELDS;

/// Sheet name of the generated template.
pub const TEMPLATE_SHEET: &str = "Candidates";

/// Suggested file name for the download.
pub const TEMPLATE_FILE_NAME: &str = "candidate_template.xlsx";

/// Illustrative candidates shipped with the template.
fn sample_rows() -> Vec<Vec<String>> {
    [
        [
            "John Doe",
            "john@example.com",
            "+1234567890",
            "Engineering",
            "FALSE",
            "Experienced frontend developer",
        ],
        [
            "Jane Smith",
            "jane@example.com",
            "+0987654321",
            "Marketing",
            "TRUE",
            "5 years marketing experience",
        ],
        [
            "Robert Brown",
            "robert@example.com",
            "+1122334455",
            "Sales",
            "FALSE",
            "New graduate seeking sales position",
        ],
    ]
    .iter()
    .map(|row| row.iter().map(|cell| cell.to_string()).collect())
    .collect()
}

/// Build the canonical template workbook as XLSX bytes.
pub fn generate_template() -> DecodeResult<Vec<u8>> {
    let headers: Vec<String> = TEMPLATE_FIELDS.iter().map(|f| f.to_string()).collect();
    encode_workbook(TEMPLATE_SHEET, &headers, &sample_rows())
}

/// Write the template workbook to disk.
pub fn write_template<P: AsRef<Path>>(path: P) -> DecodeResult<()> {
    let bytes = generate_template()?;
    std::fs::write(path.as_ref(), bytes)?;
    Ok(())
}
