//! PEA country eligibility.
//!
//! A PEA account may only hold equities of companies domiciled in the EU or
//! the EEA. Eligibility is approximated here by the ISO-2 country code of each
//! universe row.

use crate::domain::universe::UniverseRow;
use std::fmt;
use std::str::FromStr;

/// EU member states plus the non-EU EEA members (NO, IS, LI).
pub const ACCEPTED_ISO2: &[&str] = &[
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE", "IT",
    "LV", "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE", "NO", "IS", "LI",
];

/// Common non-eligible listings.
pub const EXCLUDED_ISO2: &[&str] = &["GB", "CH", "US", "CA"];

/// English and French names of every country the filters know, lowercase.
const COUNTRY_NAMES: &[(&str, &[&str])] = &[
    ("AT", &["austria", "autriche"]),
    ("BE", &["belgium", "belgique"]),
    ("BG", &["bulgaria", "bulgarie"]),
    ("HR", &["croatia", "croatie"]),
    ("CY", &["cyprus", "chypre"]),
    ("CZ", &["czech republic", "czechia", "république tchèque", "tchéquie"]),
    ("DK", &["denmark", "danemark"]),
    ("EE", &["estonia", "estonie"]),
    ("FI", &["finland", "finlande"]),
    ("FR", &["france"]),
    ("DE", &["germany", "allemagne"]),
    ("GR", &["greece", "grèce"]),
    ("HU", &["hungary", "hongrie"]),
    ("IE", &["ireland", "irlande"]),
    ("IT", &["italy", "italie"]),
    ("LV", &["latvia", "lettonie"]),
    ("LT", &["lithuania", "lituanie"]),
    ("LU", &["luxembourg"]),
    ("MT", &["malta", "malte"]),
    ("NL", &["netherlands", "pays-bas", "pays bas"]),
    ("PL", &["poland", "pologne"]),
    ("PT", &["portugal"]),
    ("RO", &["romania", "roumanie"]),
    ("SK", &["slovakia", "slovaquie"]),
    ("SI", &["slovenia", "slovénie"]),
    ("ES", &["spain", "espagne"]),
    ("SE", &["sweden", "suède"]),
    ("NO", &["norway", "norvège"]),
    ("IS", &["iceland", "islande"]),
    ("LI", &["liechtenstein"]),
    ("GB", &["united kingdom", "royaume-uni"]),
    ("CH", &["switzerland", "suisse"]),
    ("US", &["united states", "états-unis"]),
    ("CA", &["canada"]),
];

pub fn is_accepted(iso2: &str) -> bool {
    ACCEPTED_ISO2.contains(&iso2)
}

pub fn is_excluded(iso2: &str) -> bool {
    EXCLUDED_ISO2.contains(&iso2)
}

/// Normalise a country cell to an upper-case ISO-2 code.
///
/// Two-letter values are upper-cased as-is; known country names are
/// translated; anything else is upper-cased and left for the filter to reject.
pub fn normalize_country(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() == 2 {
        return trimmed.to_uppercase();
    }
    let lower = trimmed.to_lowercase();
    COUNTRY_NAMES
        .iter()
        .find(|(_, names)| names.contains(&lower.as_str()))
        .map(|(code, _)| code.to_string())
        .unwrap_or_else(|| trimmed.to_uppercase())
}

/// Country code implied by an ISIN prefix, when that prefix is an eligible
/// country.
pub fn country_from_isin(isin: &str) -> Option<String> {
    let prefix: String = isin.trim().chars().take(2).collect::<String>().to_uppercase();
    if prefix.chars().count() == 2 && is_accepted(&prefix) {
        Some(prefix)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryPolicy {
    /// Keep only EU/EEA rows; empty or unknown codes are dropped.
    AcceptedOnly,
    /// Drop known non-eligible countries; empty or unknown codes are kept.
    ExcludeKnown,
    /// No country filter.
    All,
}

impl CountryPolicy {
    pub fn keeps(&self, iso2: &str) -> bool {
        match self {
            CountryPolicy::AcceptedOnly => is_accepted(iso2),
            CountryPolicy::ExcludeKnown => !is_excluded(iso2),
            CountryPolicy::All => true,
        }
    }
}

impl FromStr for CountryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accepted" | "pea" => Ok(CountryPolicy::AcceptedOnly),
            "exclude" => Ok(CountryPolicy::ExcludeKnown),
            "all" | "none" => Ok(CountryPolicy::All),
            other => Err(format!(
                "unknown country policy '{other}' (expected accepted, exclude or all)"
            )),
        }
    }
}

impl fmt::Display for CountryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountryPolicy::AcceptedOnly => write!(f, "accepted"),
            CountryPolicy::ExcludeKnown => write!(f, "exclude"),
            CountryPolicy::All => write!(f, "all"),
        }
    }
}

/// Apply the policy, preserving input order.
pub fn filter_rows(rows: Vec<UniverseRow>, policy: CountryPolicy) -> Vec<UniverseRow> {
    rows.into_iter()
        .filter(|row| policy.keeps(&row.country_code))
        .collect()
}
