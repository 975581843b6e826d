//! Domain error types.

/// Top-level error type for tradeperf.
#[derive(Debug, thiserror::Error)]
pub enum TradePerfError {
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

    #[error("failed to read {path}: {reason}")]
    SourceRead { path: String, reason: String },

    #[error("{source_name} row {row}: {reason}")]
    SourceParse {
        source_name: String,
        row: usize,
        reason: String,
    },

    #[error("invalid trade: {reason}")]
    InvalidTrade { reason: String },

    #[error("trades are not in exit-time order (first violation at index {index})")]
    OutOfOrder { index: usize },

    /// Every source failed to read; each entry is `(source, reason)`.
    #[error("no trade source could be loaded: {}", render_failures(.failures))]
    NoSourceAvailable { failures: Vec<(String, String)> },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn render_failures(failures: &[(String, String)]) -> String {
    if failures.is_empty() {
        return "no sources configured".to_string();
    }
    failures
        .iter()
        .map(|(source, reason)| format!("{source} ({reason})"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl TradePerfError {
    pub(crate) fn invalid_trade(reason: impl Into<String>) -> Self {
        TradePerfError::InvalidTrade {
            reason: reason.into(),
        }
    }

    /// Prefix an `InvalidTrade` reason with the source and row it came from.
    pub(crate) fn at_row(self, source_name: &str, row: usize) -> Self {
        match self {
            TradePerfError::InvalidTrade { reason } => TradePerfError::InvalidTrade {
                reason: format!("{source_name} row {row}: {reason}"),
            },
            other => other,
        }
    }

    /// The source was readable but its contents were not usable trades.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            TradePerfError::SourceParse { .. }
                | TradePerfError::InvalidTrade { .. }
                | TradePerfError::OutOfOrder { .. }
                | TradePerfError::Json(_)
        )
    }
}

impl From<&TradePerfError> for std::process::ExitCode {
    fn from(err: &TradePerfError) -> Self {
        let code: u8 = match err {
            TradePerfError::Io(_) => 1,
            TradePerfError::ConfigParse { .. }
            | TradePerfError::ConfigMissing { .. }
            | TradePerfError::ConfigInvalid { .. } => 2,
            TradePerfError::SourceRead { .. }
            | TradePerfError::SourceParse { .. }
            | TradePerfError::NoSourceAvailable { .. }
            | TradePerfError::Json(_) => 3,
            TradePerfError::InvalidTrade { .. } | TradePerfError::OutOfOrder { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
