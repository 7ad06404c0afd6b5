//! CSV boundary: raw upload bytes in, typed [`CsvData`] out, and back.

use crate::error::{BadgeError, BadgeResult};
use badge_common::model::csv::{CsvData, Row};
use std::collections::HashSet;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// UTF-8 (BOM stripped) when valid, Latin-1 otherwise.
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Parses an uploaded CSV. Headers must be present, non-empty and unique;
/// short records are padded with empty cells and extra cells are dropped.
pub fn parse_csv(bytes: &[u8]) -> BadgeResult<CsvData> {
    let text = decode_text(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| BadgeError::InvalidInput(format!("CSV error: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(BadgeError::InvalidInput("CSV has no header row".to_string()));
    }
    if headers.iter().any(|h| h.trim().is_empty()) {
        return Err(BadgeError::InvalidInput(
            "CSV header cells must not be empty".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
        return Err(BadgeError::InvalidInput(format!(
            "CSV header '{}' appears more than once",
            dup
        )));
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            BadgeError::InvalidInput(format!("CSV error in record {}: {}", line + 1, e))
        })?;
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    Ok(CsvData { headers, rows })
}

/// Writes headers and rows back out as UTF-8 CSV.
pub fn write_csv(data: &CsvData) -> BadgeResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let to_err = |e: csv::Error| BadgeError::Internal(format!("CSV write: {}", e));

    writer.write_record(&data.headers).map_err(to_err)?;
    for row in &data.rows {
        writer
            .write_record(data.headers.iter().map(|h| row.get(h).unwrap_or("")))
            .map_err(to_err)?;
    }
    writer
        .into_inner()
        .map_err(|e| BadgeError::Internal(format!("CSV write: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bom_and_pads_short_records() {
        let data = parse_csv(b"\xEF\xBB\xBFName,Company,Badge Number\nAda,Analytical,7\nGrace\n")
            .unwrap();
        assert_eq!(data.headers, ["Name", "Company", "Badge Number"]);
        assert_eq!(data.row_count(), 2);
        assert_eq!(data.value(1, "Name"), Some("Grace"));
        assert_eq!(data.value(1, "Company"), Some(""));
        assert_eq!(data.value(0, "Badge Number"), Some("7"));
    }

    #[test]
    fn extra_cells_are_dropped() {
        let data = parse_csv(b"Name\nAda,extra,cells\n").unwrap();
        assert_eq!(data.rows[0].len(), 1);
    }

    #[test]
    fn falls_back_to_latin1() {
        let data = parse_csv(b"Name\nJos\xE9\n").unwrap();
        assert_eq!(data.value(0, "Name"), Some("Jos\u{e9}"));
    }

    #[test]
    fn rejects_bad_headers() {
        for bad in [&b""[..], b"Name,,Company\n", b"Name,Name\nA,B\n"] {
            assert!(matches!(parse_csv(bad), Err(BadgeError::InvalidInput(_))));
        }
    }

    #[test]
    fn written_csv_parses_back() {
        let data = parse_csv(b"Name,Title\n\"Lovelace, Ada\",Countess\n").unwrap();
        let written = write_csv(&data).unwrap();
        assert_eq!(parse_csv(&written).unwrap(), data);
    }
}
