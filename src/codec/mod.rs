//! Spreadsheet decoding and encoding.
//!
//! Decodes an uploaded binary document into the first sheet's headers plus an
//! ordered sequence of row objects, and (in reverse) writes a workbook for
//! template generation. The container is sniffed from magic bytes: ZIP means
//! XLSX, OLE2 means legacy XLS, anything else that looks like text is treated
//! as CSV with encoding and delimiter auto-detection.
//!
//! The decode contract is strictly stringly-typed: every cell becomes its
//! literal textual representation. Numbers, booleans and dates never survive
//! as native types, so values like `+1234567890` and `FALSE` reach the
//! validator exactly as the operator typed them.

use calamine::{Data, Reader, Xls, Xlsx};
use csv::ReaderBuilder;
use serde_json::{json, Map, Value};
use std::io::Cursor;
use std::path::Path;

use crate::error::{DecodeError, DecodeResult};

/// ZIP local-file magic, start of every XLSX container.
const XLSX_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE2 compound-document magic, start of every legacy XLS file.
const XLS_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Container format a document decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFormat {
    Xlsx,
    Xls,
    Csv { encoding: String, delimiter: char },
}

/// Result of decoding with metadata.
///
/// `rows` are JSON objects whose values are all strings; column order is
/// carried by `headers`.
#[derive(Debug, Clone)]
pub struct DecodedDocument {
    pub headers: Vec<String>,
    pub rows: Vec<Value>,
    pub format: DocumentFormat,
}

/// Decode a document from raw bytes.
pub fn decode_bytes(bytes: &[u8]) -> DecodeResult<DecodedDocument> {
    if bytes.starts_with(&XLSX_MAGIC) {
        let workbook = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| DecodeError::Workbook(e.to_string()))?;
        decode_workbook(workbook, DocumentFormat::Xlsx)
    } else if bytes.starts_with(&XLS_MAGIC) {
        let workbook = Xls::new(Cursor::new(bytes))
            .map_err(|e| DecodeError::Workbook(e.to_string()))?;
        decode_workbook(workbook, DocumentFormat::Xls)
    } else if bytes.contains(&0) {
        Err(DecodeError::Unrecognized(
            "binary data is neither XLSX, XLS nor text".to_string(),
        ))
    } else {
        decode_csv(bytes)
    }
}

/// Decode a document from a file on disk.
pub fn decode_file<P: AsRef<Path>>(path: P) -> DecodeResult<DecodedDocument> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_bytes(&bytes)
}

// =============================================================================
// Workbook decoding (XLSX / XLS)
// =============================================================================

/// Decode the first sheet of an opened workbook.
fn decode_workbook<'a, R>(mut workbook: R, format: DocumentFormat) -> DecodeResult<DecodedDocument>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: std::fmt::Display,
{
    let sheet_names = workbook.sheet_names();
    let sheet_name = sheet_names
        .first()
        .cloned()
        .ok_or(DecodeError::EmptySheet)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DecodeError::Workbook(e.to_string()))?;

    let mut sheet_rows = range.rows();
    let header_row = sheet_rows.next().ok_or(DecodeError::EmptySheet)?;
    let headers: Vec<String> = header_row.iter().map(cell_to_literal).collect();

    let mut rows = Vec::new();
    for data_row in sheet_rows {
        let mut obj = Map::new();
        for (i, header) in headers.iter().enumerate() {
            let literal = data_row.get(i).map(cell_to_literal).unwrap_or_default();
            obj.insert(header.clone(), json!(literal));
        }

        // Trailing all-empty rows are common in hand-edited workbooks.
        if obj.values().all(|v| v.as_str() == Some("")) {
            continue;
        }
        rows.push(Value::Object(obj));
    }

    if rows.is_empty() {
        return Err(DecodeError::NoRows);
    }

    Ok(DecodedDocument { headers, rows, format })
}

/// Literal textual representation of a cell, regardless of its native type.
fn cell_to_literal(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(n) => {
            // Integral floats render without a decimal point, matching what
            // the operator saw in the spreadsheet application.
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

// =============================================================================
// CSV decoding
// =============================================================================

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to text using the detected encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> DecodeResult<String> {
    let content = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string()),
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.to_string()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        _ => String::from_utf8_lossy(bytes).to_string(),
    };

    // A UTF-8 BOM would otherwise end up glued to the first header.
    Ok(content
        .strip_prefix('\u{feff}')
        .map(str::to_string)
        .unwrap_or(content))
}

/// Detect the delimiter by counting occurrences in the first line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Decode CSV bytes with encoding and delimiter auto-detection.
fn decode_csv(bytes: &[u8]) -> DecodeResult<DecodedDocument> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;

    if content.trim().is_empty() {
        return Err(DecodeError::EmptySheet);
    }

    let delimiter = detect_delimiter(&content);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DecodeError::Csv(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DecodeError::Csv(e.to_string()))?;

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let mut obj = Map::new();
        for (i, header) in headers.iter().enumerate() {
            let literal = record.get(i).unwrap_or_default();
            obj.insert(header.clone(), json!(literal));
        }
        rows.push(Value::Object(obj));
    }

    if rows.is_empty() {
        return Err(DecodeError::NoRows);
    }

    Ok(DecodedDocument {
        headers,
        rows,
        format: DocumentFormat::Csv { encoding, delimiter },
    })
}

// =============================================================================
// Workbook encoding
// =============================================================================

/// Encode rows into an XLSX workbook, the inverse of [`decode_bytes`].
///
/// Every cell is written as an explicit text cell, so phone numbers keep
/// their leading `+` and `TRUE`/`FALSE` stay literals. Round-trips header
/// names exactly.
pub fn encode_workbook(
    sheet_name: &str,
    headers: &[String],
    rows: &[Vec<String>],
) -> DecodeResult<Vec<u8>> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(|e| DecodeError::Write(e.to_string()))?;

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, header)
            .map_err(|e| DecodeError::Write(e.to_string()))?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32 + 1, col as u16, cell)
                .map_err(|e| DecodeError::Write(e.to_string()))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| DecodeError::Write(e.to_string()))
}
