//! Domain error types.

/// The universe table has no column that can be read as a ticker.
#[derive(Debug, Clone, thiserror::Error)]
#[error("no ticker column found (expected one of: {expected}); columns were: {found}")]
pub struct SchemaError {
    pub expected: String,
    pub found: String,
}

impl SchemaError {
    pub fn missing_ticker(headers: &[String], synonyms: &[&str]) -> Self {
        Self {
            expected: synonyms.join(", "),
            found: if headers.is_empty() {
                "<none>".to_string()
            } else {
                headers.join(", ")
            },
        }
    }
}

/// Top-level error type for peascreen.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("data source error: {reason}")]
    Data { reason: String },

    #[error("data query error: {reason}")]
    DataQuery { reason: String },

    #[error("export error: {reason}")]
    Export { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScreenerError {
    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        ScreenerError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        let code: u8 = match err {
            ScreenerError::Io(_) => 1,
            ScreenerError::ConfigParse { .. }
            | ScreenerError::ConfigMissing { .. }
            | ScreenerError::ConfigInvalid { .. } => 2,
            ScreenerError::Data { .. } | ScreenerError::DataQuery { .. } => 3,
            ScreenerError::Schema(_) => 4,
            ScreenerError::Export { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
