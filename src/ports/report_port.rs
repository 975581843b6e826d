//! Report generation port trait.

use crate::domain::error::TradePerfError;
use crate::domain::metrics::MetricsReport;
use crate::domain::trade::TradeSet;

/// Port for writing a computed report.
pub trait ReportPort {
    fn write(
        &self,
        report: &MetricsReport,
        trades: &TradeSet,
        output_path: &str,
    ) -> Result<(), TradePerfError>;
}
