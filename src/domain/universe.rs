//! Universe loading: maps an arbitrary table onto the canonical row schema.
//!
//! Column names are matched against one declarative synonym table. For each
//! canonical field, in table order, the first unclaimed column whose
//! normalised header equals a synonym wins; failing that, the first unclaimed
//! column whose header contains a synonym and no measure word.

use crate::domain::country::{country_from_isin, normalize_country};
use crate::domain::error::SchemaError;
use std::collections::HashSet;

/// A table as read from disk: header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniverseRow {
    pub ticker: String,
    pub name: String,
    pub exchange: String,
    pub country_code: String,
    pub sector: String,
    pub isin: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Ticker,
    Isin,
    CountryCode,
    Name,
    Exchange,
    Sector,
}

pub const COLUMN_SYNONYMS: &[(Field, &[&str])] = &[
    (Field::Ticker, &["ticker", "symbol", "mnemonique", "mnémonique", "mnemo"]),
    (Field::Isin, &["isin"]),
    (Field::CountryCode, &["country_code", "country_iso2", "country", "pays"]),
    (Field::Name, &["name", "company", "nom", "issuer", "émetteur"]),
    (Field::Exchange, &["exchange", "market", "marché", "marche", "place", "mic"]),
    (Field::Sector, &["sector", "secteur"]),
];

/// Headers carrying one of these name a quantity ("Market Cap", "Nominal
/// Value"), so they never match a synonym by substring.
pub const MEASURE_WORDS: &[&str] = &["cap", "value", "volume"];

/// Lowercase, trim and join internal whitespace runs with `_`.
pub fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Column index chosen for each field, in `COLUMN_SYNONYMS` order.
pub fn map_columns(headers: &[String]) -> Vec<(Field, usize)> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut mapping = Vec::new();

    for (field, synonyms) in COLUMN_SYNONYMS {
        let exact = normalized
            .iter()
            .enumerate()
            .find(|(i, h)| !claimed.contains(i) && synonyms.contains(&h.as_str()));
        let found = exact.or_else(|| {
            normalized.iter().enumerate().find(|(i, h)| {
                !claimed.contains(i)
                    && !MEASURE_WORDS.iter().any(|m| h.contains(m))
                    && synonyms.iter().any(|s| h.contains(s))
            })
        });
        if let Some((idx, _)) = found {
            claimed.insert(idx);
            mapping.push((*field, idx));
        }
    }

    mapping
}

/// Parse a raw table into de-duplicated universe rows.
///
/// Fails only when no column maps to the ticker field. Rows with an empty
/// ticker are skipped; later duplicates of a ticker are dropped.
pub fn parse_universe(table: &RawTable) -> Result<Vec<UniverseRow>, SchemaError> {
    let mapping = map_columns(&table.headers);
    if !mapping.iter().any(|(f, _)| *f == Field::Ticker) {
        return Err(SchemaError::missing_ticker(
            &table.headers,
            COLUMN_SYNONYMS[0].1,
        ));
    }

    let rows = table
        .rows
        .iter()
        .map(|record| {
            let mut row = UniverseRow::default();
            for (field, idx) in &mapping {
                let cell = record.get(*idx).map(|s| s.trim()).unwrap_or_default();
                match field {
                    Field::Ticker => row.ticker = cell.to_string(),
                    Field::Isin => row.isin = cell.to_uppercase(),
                    Field::CountryCode => row.country_code = normalize_country(cell),
                    Field::Name => row.name = cell.to_string(),
                    Field::Exchange => row.exchange = cell.to_string(),
                    Field::Sector => row.sector = cell.to_string(),
                }
            }
            if row.country_code.is_empty() {
                if let Some(code) = country_from_isin(&row.isin) {
                    row.country_code = code;
                }
            }
            row
        })
        .filter(|row| !row.ticker.is_empty());

    Ok(dedup_by_ticker(rows))
}

/// Keep the first row seen for each ticker, preserving order.
pub fn dedup_by_ticker(rows: impl IntoIterator<Item = UniverseRow>) -> Vec<UniverseRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.ticker.clone()))
        .collect()
}

/// Merge several loaded universes; earlier sources win on duplicate tickers.
pub fn merge_universes(sources: Vec<Vec<UniverseRow>>) -> Vec<UniverseRow> {
    dedup_by_ticker(sources.into_iter().flatten())
}

/// Enforce the per-run ticker cap. Applied before any price fetch.
pub fn limit(mut rows: Vec<UniverseRow>, max_tickers: usize) -> Vec<UniverseRow> {
    rows.truncate(max_tickers);
    rows
}
