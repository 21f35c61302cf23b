//! Domain error types.

/// Top-level error type for quantdesk.
#[derive(Debug, thiserror::Error)]
pub enum QuantError {
    #[error("market data provider error: {reason}")]
    Provider { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

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
    Io(#[from] std::io::Error),
}

impl QuantError {
    pub fn provider(reason: impl Into<String>) -> Self {
        QuantError::Provider {
            reason: reason.into(),
        }
    }

    pub fn invalid_series(reason: impl Into<String>) -> Self {
        QuantError::InvalidSeries {
            reason: reason.into(),
        }
    }
}

impl From<&QuantError> for std::process::ExitCode {
    fn from(err: &QuantError) -> Self {
        let code: u8 = match err {
            QuantError::Io(_) => 1,
            QuantError::ConfigParse { .. }
            | QuantError::ConfigMissing { .. }
            | QuantError::ConfigInvalid { .. } => 2,
            QuantError::Provider { .. } => 3,
            QuantError::InvalidSeries { .. } => 4,
            QuantError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
