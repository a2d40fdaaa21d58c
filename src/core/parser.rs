//! Row parser for uploaded catalog files.
//!
//! Input format: a single delimited-text table with a header row. Fields
//! are separated by `,` or `;` (auto-detected from the header line);
//! multi-value sub-fields such as `debouche` and `diplome` use `|`.

use crate::domain::model::RawRow;
use crate::utils::error::{ImportError, Result};
use csv::ReaderBuilder;

/// Picks the field delimiter from the header line: `;` wins only when it is
/// strictly more frequent than `,`. One delimiter for the whole file.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Splits raw text into header-keyed rows.
///
/// Header tokens are trimmed and lower-cased and form the fixed key list
/// for every data row. Values are trimmed; empty values are omitted, so a
/// row shorter than the header simply lacks its trailing keys. Blank lines
/// and rows whose fields are all empty are skipped.
pub fn parse_rows(raw_text: &str) -> Result<Vec<RawRow>> {
    if raw_text.lines().count() < 2 {
        return Err(ImportError::MalformedInput {
            message: "expected a header row and at least one data row".to_string(),
        });
    }

    let header_line = raw_text.lines().next().unwrap_or_default();
    let delimiter = detect_delimiter(header_line);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(raw_text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = RawRow::new();

        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                let value = value.trim();
                if !value.is_empty() {
                    row.insert(header.clone(), value.to_string());
                }
            }
        }

        if row.is_empty() {
            continue;
        }

        rows.push(row);
    }

    Ok(rows)
}
