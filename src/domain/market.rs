//! Yahoo-style market suffixes for Euronext listings.

/// Suffix and the lowercase keywords (city, country, MIC) that select it.
pub const MARKET_SUFFIXES: &[(&str, &[&str])] = &[
    (".PA", &["paris", "france", "xpar"]),
    (".AS", &["amsterdam", "netherlands", "xams"]),
    (".BR", &["brussels", "bruxelles", "belgium", "xbru"]),
    (".LS", &["lisbon", "lisbonne", "portugal", "xlis"]),
    (".IR", &["dublin", "ireland", "xmsm"]),
];

/// Suffix for an exchange description, matched case-insensitively by keyword.
pub fn suffix_for_exchange(exchange: &str) -> Option<&'static str> {
    let lower = exchange.to_lowercase();
    MARKET_SUFFIXES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(suffix, _)| *suffix)
}

/// Append the market suffix unless the ticker already carries one.
pub fn with_market_suffix(ticker: &str, exchange: &str) -> String {
    if ticker.contains('.') {
        return ticker.to_string();
    }
    match suffix_for_exchange(exchange) {
        Some(suffix) => format!("{ticker}{suffix}"),
        None => ticker.to_string(),
    }
}
