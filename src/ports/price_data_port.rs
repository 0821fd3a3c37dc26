//! Price history port trait.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::{normalize_series, OhlcvBar};
use chrono::NaiveDate;
use std::collections::HashMap;

pub trait PriceDataPort {
    /// Bars for one ticker within `[start_date, end_date]`. An empty vector
    /// means the source has no data for the ticker.
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ScreenerError>;

    /// Fetch a batch of tickers. Tickers with no data or a per-ticker error
    /// are left out of the map; each series is sorted and de-duplicated.
    fn fetch_many(
        &self,
        tickers: &[String],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> HashMap<String, Vec<OhlcvBar>> {
        let mut out = HashMap::with_capacity(tickers.len());
        for ticker in tickers {
            match self.fetch_ohlcv(ticker, start_date, end_date) {
                Ok(bars) if !bars.is_empty() => {
                    out.insert(ticker.clone(), normalize_series(bars));
                }
                Ok(_) => {}
                Err(e) => eprintln!("warning: skipping {} ({})", ticker, e),
            }
        }
        out
    }
}
