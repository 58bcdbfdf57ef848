//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

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

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("malformed bar for {symbol} on {date}: {reason}")]
    MalformedBar {
        symbol: String,
        date: NaiveDate,
        reason: String,
    },

    #[error("notification failed: {reason}")]
    Notify { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SigtraderError {
    /// Errors that leave an instrument with an empty trade log rather than
    /// rejecting its run.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            SigtraderError::NoData { .. } | SigtraderError::InsufficientData { .. }
        )
    }
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        let code: u8 = match err {
            SigtraderError::Io(_) | SigtraderError::Notify { .. } => 1,
            SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. }
            | SigtraderError::ConfigInvalid { .. } => 2,
            SigtraderError::DataSource { .. } => 3,
            SigtraderError::NoData { .. } | SigtraderError::InsufficientData { .. } => 5,
            SigtraderError::MalformedBar { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
