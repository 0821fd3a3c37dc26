//! Reads an arbitrary CSV table (universe sources) into a [`RawTable`].
//!
//! Comma and semicolon delimiters are both accepted; the delimiter is taken
//! from the header line. A UTF-8 byte-order mark is ignored.

use crate::domain::error::ScreenerError;
use crate::domain::universe::RawTable;
use std::fs;
use std::path::Path;

fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

pub fn parse_table(content: &str) -> Result<RawTable, ScreenerError> {
    let content = content.trim_start_matches('\u{feff}');
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(content))
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| ScreenerError::Data {
            reason: format!("CSV header error: {}", e),
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| ScreenerError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(RawTable { headers, rows })
}

pub fn read_table(path: &Path) -> Result<RawTable, ScreenerError> {
    let content = fs::read_to_string(path).map_err(|e| ScreenerError::Data {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;
    parse_table(&content)
}
