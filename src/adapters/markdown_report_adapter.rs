//! Markdown report adapter implementing ReportPort.
//!
//! Produces a summary table followed by per-instrument, per-direction and
//! per-hour breakdowns and the full trade log.

use std::fs;
use std::path::Path;

use crate::domain::error::TradePerfError;
use crate::domain::metrics::MetricsReport;
use crate::domain::normalize::format_timestamp;
use crate::domain::trade::TradeSet;
use crate::ports::report_port::ReportPort;

fn format_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${:.2}", value)
    }
}

/// Seconds rendered as `1h 02m 03s`, `4m 05s` or `12s`.
pub fn format_duration(secs: f64) -> String {
    let total = secs.round().max(0.0) as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

pub fn render_summary_table(report: &MetricsReport) -> String {
    let rows = [
        ("Total P&L", format_money(report.total_pnl)),
        ("Total Trades", report.total_trades.to_string()),
        (
            "Won / Lost / Flat",
            format!(
                "{} / {} / {}",
                report.trades_won, report.trades_lost, report.trades_breakeven
            ),
        ),
        ("Win Rate", format!("{:.1}%", report.win_rate)),
        ("Profit Factor", format!("{:.2}", report.profit_factor)),
        ("Win/Loss Ratio", format!("{:.2}", report.win_loss_ratio)),
        ("Sharpe Ratio", format!("{:.2}", report.sharpe_ratio)),
        ("Max Drawdown", format!("{:.2}%", report.max_drawdown)),
        ("Average Win", format_money(report.avg_win)),
        ("Average Loss", format_money(-report.avg_loss)),
        ("Largest Win", format_money(report.largest_win)),
        ("Largest Loss", format_money(-report.largest_loss)),
        ("Avg Holding Time", format_duration(report.avg_holding_secs)),
        ("Base Capital", format_money(report.base_capital)),
    ];

    let mut output = String::from("| Metric | Value |\n|---|---:|\n");
    for (name, value) in rows {
        output.push_str(&format!("| {} | {} |\n", name, value));
    }
    output
}

pub fn render_instrument_table(report: &MetricsReport) -> String {
    if report.by_instrument.is_empty() {
        return "_No instruments traded._\n".to_string();
    }

    let mut output = String::from("| Instrument | Trades | Win Rate | P&L |\n|---|---:|---:|---:|\n");
    for (instrument, stats) in &report.by_instrument {
        output.push_str(&format!(
            "| {} | {} | {:.1}% | {} |\n",
            instrument,
            stats.count,
            stats.win_rate(),
            format_money(stats.profit)
        ));
    }
    output
}

pub fn render_direction_table(report: &MetricsReport) -> String {
    if report.by_direction.is_empty() {
        return "_No trades._\n".to_string();
    }

    let mut output = String::from("| Direction | Trades | Win Rate | P&L |\n|---|---:|---:|---:|\n");
    for (direction, stats) in &report.by_direction {
        output.push_str(&format!(
            "| {} | {} | {:.1}% | {} |\n",
            direction,
            stats.count,
            stats.win_rate(),
            format_money(stats.profit)
        ));
    }
    output
}

pub fn render_hourly_table(report: &MetricsReport) -> String {
    if report.by_hour.is_empty() {
        return "_No trades._\n".to_string();
    }

    let mut output =
        String::from("| Hour | Trades | Win Rate | P&L | Avg P&L |\n|---|---:|---:|---:|---:|\n");
    for (hour, stats) in &report.by_hour {
        output.push_str(&format!(
            "| {:02}:00 | {} | {:.1}% | {} | {} |\n",
            hour,
            stats.count,
            stats.win_rate(),
            format_money(stats.profit),
            format_money(stats.avg_profit())
        ));
    }
    output
}

pub fn render_trade_log(trades: &TradeSet) -> String {
    if trades.is_empty() {
        return "_No trades recorded._\n".to_string();
    }

    let mut output = String::from(
        "| # | Entry Time | Exit Time | Instrument | Direction | Qty | Entry | Exit | Profit |\n\
         |---:|---|---|---|---|---:|---:|---:|---:|\n",
    );
    for (i, trade) in trades.iter().enumerate() {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {:.2} | {:.2} | {} |\n",
            i + 1,
            format_timestamp(trade.entry_time()),
            format_timestamp(trade.exit_time()),
            trade.instrument(),
            trade.direction(),
            trade.quantity(),
            trade.entry_price(),
            trade.exit_price(),
            format_money(trade.profit())
        ));
    }
    output
}

pub fn render(report: &MetricsReport, trades: &TradeSet) -> String {
    let mut output = String::from("# Trading Performance\n\n");

    if let (Some(first), Some(last)) = (trades.first_exit(), trades.last_exit()) {
        output.push_str(&format!(
            "Trades closed between {} and {}.\n\n",
            format_timestamp(first),
            format_timestamp(last)
        ));
    }

    output.push_str("## Summary\n\n");
    output.push_str(&render_summary_table(report));
    output.push_str("\n## By Instrument\n\n");
    output.push_str(&render_instrument_table(report));
    output.push_str("\n## By Direction\n\n");
    output.push_str(&render_direction_table(report));
    output.push_str("\n## By Hour of Exit\n\n");
    output.push_str(&render_hourly_table(report));
    output.push_str("\n## Trade Log\n\n");
    output.push_str(&render_trade_log(trades));
    output
}

#[derive(Debug, Default)]
pub struct MarkdownReportAdapter;

impl MarkdownReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for MarkdownReportAdapter {
    fn write(
        &self,
        report: &MetricsReport,
        trades: &TradeSet,
        output_path: &str,
    ) -> Result<(), TradePerfError> {
        let markdown = render(report, trades);

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, markdown)?;
        Ok(())
    }
}
