//! Ordered chain of trade sources; the first one that loads wins.

use std::path::{Path, PathBuf};

use crate::adapters::ninjatrader_csv_adapter::NinjaTraderCsvAdapter;
use crate::adapters::perf_json_adapter::PerfJsonSource;
use crate::domain::error::TradePerfError;
use crate::domain::trade::Trade;
use crate::ports::trade_source_port::TradeSource;

/// Pick an adapter by file extension: `.json` is read as `perf.json`,
/// anything else as a grid CSV export.
pub fn source_for_path(path: &Path) -> Box<dyn TradeSource> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        Box::new(PerfJsonSource::new(path.to_path_buf()))
    } else {
        Box::new(NinjaTraderCsvAdapter::new(path.to_path_buf()))
    }
}

pub struct FallbackSource {
    sources: Vec<Box<dyn TradeSource>>,
}

impl FallbackSource {
    pub fn new(sources: Vec<Box<dyn TradeSource>>) -> Self {
        Self { sources }
    }

    pub fn from_paths(paths: &[PathBuf]) -> Self {
        Self::new(paths.iter().map(|p| source_for_path(p)).collect())
    }

    /// Load from the first source that succeeds, returning its name too.
    ///
    /// When every source fails, the first source that was readable but held
    /// bad data is reported with its own error. Otherwise the read failures
    /// are returned together as `NoSourceAvailable`.
    pub fn fetch_first(&self) -> Result<(String, Vec<Trade>), TradePerfError> {
        let mut failures = Vec::with_capacity(self.sources.len());
        let mut data_error = None;
        for source in &self.sources {
            let name = source.name();
            match source.fetch_trades() {
                Ok(trades) => {
                    log::info!("using trade source {name} ({} trades)", trades.len());
                    return Ok((name, trades));
                }
                Err(e) => {
                    log::warn!("trade source {name} failed: {e}");
                    failures.push((name, e.to_string()));
                    if data_error.is_none() && e.is_data_error() {
                        data_error = Some(e);
                    }
                }
            }
        }
        match data_error {
            Some(e) => Err(e),
            None => Err(TradePerfError::NoSourceAvailable { failures }),
        }
    }
}

impl TradeSource for FallbackSource {
    fn name(&self) -> String {
        self.sources
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    fn fetch_trades(&self) -> Result<Vec<Trade>, TradePerfError> {
        self.fetch_first().map(|(_, trades)| trades)
    }
}
