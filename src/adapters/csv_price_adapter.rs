//! CSV directory price adapter: one `<TICKER>.csv` file per ticker.
//!
//! Files need a header row naming at least `date`, `open`, `high`, `low`,
//! `close` and `volume` (case-insensitive, any order, extra columns ignored).
//! Rows with a blank or non-numeric price are skipped.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::price_data_port::PriceDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    /// Fails when the directory does not exist, so an unreachable source stops
    /// the run before any ticker is fetched.
    pub fn new(base_path: PathBuf) -> Result<Self, ScreenerError> {
        if !base_path.is_dir() {
            return Err(ScreenerError::Data {
                reason: format!("price directory {} not found", base_path.display()),
            });
        }
        Ok(Self { base_path })
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

fn column_positions(headers: &csv::StringRecord) -> Result<[usize; 6], ScreenerError> {
    let names: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let mut positions = [0usize; 6];
    for (slot, required) in REQUIRED_COLUMNS.iter().enumerate() {
        positions[slot] = names
            .iter()
            .position(|n| n == required)
            .ok_or_else(|| ScreenerError::Data {
                reason: format!("missing {} column", required),
            })?;
    }
    Ok(positions)
}

fn parse_number(record: &csv::StringRecord, idx: usize) -> Option<f64> {
    let v: f64 = record.get(idx)?.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

impl PriceDataPort for CsvPriceAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ScreenerError> {
        let path = self.csv_path(ticker);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| ScreenerError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| ScreenerError::Data {
            reason: format!("CSV parse error in {}: {}", path.display(), e),
        })?;
        let [date_i, open_i, high_i, low_i, close_i, volume_i] = column_positions(headers)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| ScreenerError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_i).unwrap_or_default().trim();
            // Timestamps like "2024-01-15 00:00:00+01:00" keep only the date part.
            let date_str = date_str.get(..10).unwrap_or(date_str);
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                ScreenerError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let (Some(open), Some(high), Some(low), Some(close)) = (
                parse_number(&record, open_i),
                parse_number(&record, high_i),
                parse_number(&record, low_i),
                parse_number(&record, close_i),
            ) else {
                continue;
            };

            bars.push(OhlcvBar {
                ticker: ticker.to_string(),
                date,
                open,
                high,
                low,
                close,
                volume: parse_number(&record, volume_i).unwrap_or(0.0),
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
