//! Bulk product import
//!
//! Three stages, mirroring the admin panel's CSV upload flow:
//!
//! 1. [`parse_csv`]: bytes to headers + string rows (`csv` crate)
//! 2. [`reconciler`]: pure validation + catalog resolution + duplicate
//!    policy, producing submission candidates and a full error report
//! 3. [`runner`]: sequential per-row submission with a progress tally

pub mod reconciler;
pub mod runner;

pub use reconciler::{
    Candidate, CatalogSnapshot, DuplicatePolicy, FileError, ReconcileReport, reconcile,
};
pub use runner::{ImportOutcome, ImportTally, run_import};

use std::collections::HashMap;

use shared::error::{AppError, ErrorCode};

/// Parsed tabular input: header names plus one map per data row
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

/// Parse CSV bytes into headers and per-row column maps.
///
/// Values are trimmed; rows shorter than the header are padded with
/// empty strings by keying only the columns present.
pub fn parse_csv(bytes: &[u8]) -> Result<ParsedTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| {
            AppError::with_message(ErrorCode::ImportInvalidFile, format!("Invalid CSV: {e}"))
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            AppError::with_message(ErrorCode::ImportInvalidFile, format!("Invalid CSV: {e}"))
        })?;
        let mut row = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(i) {
                row.insert(header.clone(), value.trim().to_string());
            }
        }
        // Skip fully blank lines
        if row.values().any(|v| !v.is_empty()) {
            rows.push(row);
        }
    }

    Ok(ParsedTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headers_and_trims_values() {
        let data = b"Product Name, Brand \nDrill , Bosch\n";
        let table = parse_csv(data).unwrap();
        assert_eq!(table.headers, vec!["Product Name", "Brand"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0]["Product Name"], "Drill");
        assert_eq!(table.rows[0]["Brand"], "Bosch");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let data = b"Product Name,Brand\nDrill,Bosch\n,\n";
        let table = parse_csv(data).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn short_rows_omit_missing_columns() {
        let data = b"Product Name,Brand,Model\nDrill,Bosch\n";
        let table = parse_csv(data).unwrap();
        assert_eq!(table.rows[0].get("Model"), None);
    }
}
