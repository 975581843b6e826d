//! Explicit "no data yet" / "loaded" state for consumers of a report.

use super::metrics::{compute_metrics, MetricsReport};
use super::trade::TradeSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    #[default]
    NoData,
    Loaded {
        source: String,
        trades: TradeSet,
        report: MetricsReport,
    },
}

impl LoadState {
    /// Compute a fresh report for `trades`. An empty set stays `NoData`.
    pub fn load(source: impl Into<String>, trades: TradeSet, base_capital: f64) -> Self {
        if trades.is_empty() {
            return LoadState::NoData;
        }
        let report = compute_metrics(&trades, base_capital);
        LoadState::Loaded {
            source: source.into(),
            trades,
            report,
        }
    }

    pub fn report(&self) -> Option<&MetricsReport> {
        match self {
            LoadState::Loaded { report, .. } => Some(report),
            LoadState::NoData => None,
        }
    }

    pub fn trades(&self) -> Option<&TradeSet> {
        match self {
            LoadState::Loaded { trades, .. } => Some(trades),
            LoadState::NoData => None,
        }
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            LoadState::Loaded { source, .. } => Some(source),
            LoadState::NoData => None,
        }
    }
}
