#![allow(dead_code)]

use chrono::NaiveDate;
use peascreen::domain::error::ScreenerError;
pub use peascreen::domain::ohlcv::OhlcvBar;
use peascreen::domain::universe::UniverseRow;
use peascreen::ports::price_data_port::PriceDataPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub struct MockPriceDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub requested: RefCell<Vec<String>>,
}

impl MockPriceDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockPriceDataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ScreenerError> {
        self.requested.borrow_mut().push(ticker.to_string());
        if let Some(reason) = self.errors.get(ticker) {
            return Err(ScreenerError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn row(ticker: &str, country: &str) -> UniverseRow {
    UniverseRow {
        ticker: ticker.to_string(),
        name: format!("{ticker} SA"),
        country_code: country.to_string(),
        ..UniverseRow::default()
    }
}

/// Daily bars from `start`, one per calendar day, with closes from `close_at`.
pub fn bars_from(
    ticker: &str,
    start: NaiveDate,
    count: usize,
    volume: f64,
    close_at: impl Fn(usize) -> f64,
    half_range_at: impl Fn(usize) -> f64,
) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| {
            let close = close_at(i);
            let half = half_range_at(i);
            OhlcvBar {
                ticker: ticker.to_string(),
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close + half,
                low: close - half,
                close,
                volume,
            }
        })
        .collect()
}

/// Zig-zag series around a linear drift; RSI stays inside 30..70 for small drifts.
pub fn zigzag_bars(ticker: &str, count: usize, start_price: f64, drift: f64) -> Vec<OhlcvBar> {
    bars_from(
        ticker,
        date(2024, 1, 1),
        count,
        30_000.0,
        |i| start_price + drift * i as f64 + if i % 2 == 0 { 0.3 } else { -0.3 },
        |_| 0.5,
    )
}

/// Wide swings for most of the history, then a calm tail of `calm` bars.
pub fn squeeze_bars(ticker: &str, count: usize, calm: usize) -> Vec<OhlcvBar> {
    let calm_from = count - calm;
    bars_from(
        ticker,
        date(2024, 1, 1),
        count,
        50_000.0,
        move |i| {
            let swing = if i < calm_from { 3.0 } else { 0.2 };
            if i % 2 == 0 { 100.0 + swing } else { 100.0 - swing }
        },
        move |i| if i < calm_from { 3.5 } else { 0.3 },
    )
}

pub fn write_price_csv(dir: &Path, bars: &[OhlcvBar]) {
    let Some(first) = bars.first() else {
        return;
    };
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    fs::write(dir.join(format!("{}.csv", first.ticker)), content).unwrap();
}
