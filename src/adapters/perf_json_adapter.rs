//! `perf.json` structured file: trade source and report writer.
//!
//! The file carries the equity curve, headline metrics and the trade list
//! keyed by the grid export's column names. Only `trades` is required when
//! reading; the other sections are regenerated on write.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::adapters::ninjatrader_csv_adapter::{
    COL_ENTRY_PRICE, COL_EXIT_PRICE, COL_EXIT_TIME, COL_ENTRY_TIME, COL_MARKET_POS, COL_PROFIT,
    COL_QTY,
};
use crate::domain::error::TradePerfError;
use crate::domain::metrics::MetricsReport;
use crate::domain::normalize::{
    format_timestamp, parse_direction, parse_money, parse_price, parse_quantity, parse_timestamp,
    FieldError,
};
use crate::domain::trade::{Trade, TradeSet};
use crate::ports::report_port::ReportPort;
use crate::ports::trade_source_port::TradeSource;

/// A JSON value that may be a bare number or a display string such as
/// `"$162.50"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn as_text(&self) -> String {
        match self {
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(rename = "Entry time")]
    pub entry_time: String,
    #[serde(rename = "Exit time")]
    pub exit_time: String,
    #[serde(rename = "Instrument")]
    pub instrument: String,
    #[serde(rename = "Market pos.")]
    pub market_pos: String,
    #[serde(rename = "Qty")]
    pub qty: NumberOrText,
    #[serde(rename = "Entry price")]
    pub entry_price: NumberOrText,
    #[serde(rename = "Exit price")]
    pub exit_price: NumberOrText,
    #[serde(rename = "Profit")]
    pub profit: NumberOrText,
}

impl From<&Trade> for TradeRecord {
    fn from(trade: &Trade) -> Self {
        Self {
            entry_time: format_timestamp(trade.entry_time()),
            exit_time: format_timestamp(trade.exit_time()),
            instrument: trade.instrument().to_string(),
            market_pos: trade.direction().to_string(),
            qty: NumberOrText::Number(f64::from(trade.quantity())),
            entry_price: NumberOrText::Number(trade.entry_price()),
            exit_price: NumberOrText::Number(trade.exit_price()),
            profit: NumberOrText::Number(trade.profit()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityCurveJson {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsJson {
    pub pnl: f64,
    pub sharpe: f64,
    pub max_dd: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub win_loss_ratio: f64,
    pub total_trades: usize,
    pub avg_holding_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfFile {
    #[serde(default)]
    pub equity_curve: EquityCurveJson,
    #[serde(default)]
    pub metrics: MetricsJson,
    pub trades: Vec<TradeRecord>,
}

/// Build the file contents for a computed report. Equity values are
/// cumulative profit, not seeded with base capital.
pub fn build_perf_file(report: &MetricsReport, trades: &TradeSet) -> PerfFile {
    PerfFile {
        equity_curve: EquityCurveJson {
            dates: report
                .equity_curve
                .iter()
                .map(|p| format_timestamp(p.time))
                .collect(),
            values: report
                .equity_curve
                .iter()
                .map(|p| p.cumulative_pnl)
                .collect(),
        },
        metrics: MetricsJson {
            pnl: report.total_pnl,
            sharpe: report.sharpe_ratio,
            max_dd: report.max_drawdown,
            win_rate: report.win_rate,
            profit_factor: report.profit_factor,
            win_loss_ratio: report.win_loss_ratio,
            total_trades: report.total_trades,
            avg_holding_secs: report.avg_holding_secs,
        },
        trades: trades.iter().map(TradeRecord::from).collect(),
    }
}

fn record_to_trade(
    record: &TradeRecord,
    source_name: &str,
    row: usize,
) -> Result<Trade, TradePerfError> {
    let parse_err = |column: &str, e: FieldError| TradePerfError::SourceParse {
        source_name: source_name.to_string(),
        row,
        reason: format!("{column}: {e}"),
    };

    let direction =
        parse_direction(&record.market_pos).map_err(|e| parse_err(COL_MARKET_POS, e))?;
    let quantity = match &record.qty {
        NumberOrText::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX) => {
            *n as u32
        }
        other => parse_quantity(&other.as_text()).map_err(|e| parse_err(COL_QTY, e))?,
    };
    let entry_price = parse_price(&record.entry_price.as_text())
        .map_err(|e| parse_err(COL_ENTRY_PRICE, e))?;
    let exit_price =
        parse_price(&record.exit_price.as_text()).map_err(|e| parse_err(COL_EXIT_PRICE, e))?;
    let entry_time =
        parse_timestamp(&record.entry_time).map_err(|e| parse_err(COL_ENTRY_TIME, e))?;
    let exit_time = parse_timestamp(&record.exit_time).map_err(|e| parse_err(COL_EXIT_TIME, e))?;
    let profit = match &record.profit {
        NumberOrText::Number(n) => *n,
        NumberOrText::Text(s) => parse_money(s).map_err(|e| parse_err(COL_PROFIT, e))?,
    };

    Trade::new(
        record.instrument.as_str(),
        direction,
        quantity,
        entry_time,
        exit_time,
        entry_price,
        exit_price,
        profit,
    )
    .map_err(|e| e.at_row(source_name, row))
}

pub fn parse_perf_json(content: &str, source_name: &str) -> Result<Vec<Trade>, TradePerfError> {
    let file: PerfFile = serde_json::from_str(content)?;
    file.trades
        .iter()
        .enumerate()
        .map(|(i, record)| record_to_trade(record, source_name, i + 1))
        .collect()
}

pub struct PerfJsonSource {
    path: PathBuf,
}

impl PerfJsonSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TradeSource for PerfJsonSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_trades(&self) -> Result<Vec<Trade>, TradePerfError> {
        let content = fs::read_to_string(&self.path).map_err(|e| TradePerfError::SourceRead {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        let trades = parse_perf_json(&content, &self.name())?;
        log::debug!("loaded {} trades from {}", trades.len(), self.path.display());
        Ok(trades)
    }
}

#[derive(Debug, Default)]
pub struct PerfJsonReportAdapter;

impl PerfJsonReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for PerfJsonReportAdapter {
    fn write(
        &self,
        report: &MetricsReport,
        trades: &TradeSet,
        output_path: &str,
    ) -> Result<(), TradePerfError> {
        let file = build_perf_file(report, trades);
        let json = serde_json::to_string_pretty(&file)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        Ok(())
    }
}
