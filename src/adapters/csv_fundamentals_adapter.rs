//! Fundamentals from a `ticker,market_cap,pe_ratio` CSV file.

use crate::adapters::table_csv_adapter::read_table;
use crate::domain::error::ScreenerError;
use crate::domain::screen::Fundamentals;
use crate::domain::universe::normalize_header;
use crate::ports::fundamentals_port::FundamentalsPort;
use std::collections::HashMap;
use std::path::Path;

pub struct CsvFundamentalsAdapter {
    by_ticker: HashMap<String, Fundamentals>,
}

fn parse_cell(row: &[String], idx: Option<usize>) -> Option<f64> {
    let v: f64 = row.get(idx?)?.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

impl CsvFundamentalsAdapter {
    /// A file without a ticker column is rejected; unparseable cells are absent.
    pub fn from_file(path: &Path) -> Result<Self, ScreenerError> {
        let table = read_table(path)?;
        let headers: Vec<String> = table.headers.iter().map(|h| normalize_header(h)).collect();
        let position = |name: &str| headers.iter().position(|h| h == name);

        let ticker_idx = position("ticker").ok_or_else(|| ScreenerError::Data {
            reason: format!("{}: missing ticker column", path.display()),
        })?;
        let cap_idx = position("market_cap");
        let pe_idx = position("pe_ratio");

        let mut by_ticker = HashMap::new();
        for row in &table.rows {
            let Some(ticker) = row.get(ticker_idx).map(|t| t.trim()) else {
                continue;
            };
            if ticker.is_empty() {
                continue;
            }
            by_ticker.entry(ticker.to_string()).or_insert(Fundamentals {
                market_cap: parse_cell(row, cap_idx),
                pe_ratio: parse_cell(row, pe_idx),
            });
        }

        Ok(Self { by_ticker })
    }

    pub fn len(&self) -> usize {
        self.by_ticker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ticker.is_empty()
    }
}

impl FundamentalsPort for CsvFundamentalsAdapter {
    fn lookup(&self, ticker: &str) -> Fundamentals {
        self.by_ticker.get(ticker).copied().unwrap_or_default()
    }
}
