//! Performance metrics over a set of closed trades.
//!
//! [`compute_metrics`] is total: every ratio degrades to `0.0` when its
//! denominator is zero, so no field of a [`MetricsReport`] is ever NaN or
//! infinite for a valid [`TradeSet`].

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use super::trade::{Direction, Trade, TradeSet};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Count, wins and summed profit for one breakdown key.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BucketStats {
    pub count: usize,
    pub wins: usize,
    pub profit: f64,
}

impl BucketStats {
    fn record(&mut self, trade: &Trade) {
        self.count += 1;
        self.profit += trade.profit();
        if trade.is_win() {
            self.wins += 1;
        }
    }

    /// Percentage of winning trades in the bucket.
    pub fn win_rate(&self) -> f64 {
        if self.count > 0 {
            self.wins as f64 / self.count as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn avg_profit(&self) -> f64 {
        if self.count > 0 {
            self.profit / self.count as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPnl {
    pub date: NaiveDate,
    pub profit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquityPoint {
    pub time: NaiveDateTime,
    pub cumulative_pnl: f64,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    pub base_capital: f64,
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub total_pnl: f64,
    /// Percent, 0-100.
    pub win_rate: f64,
    /// Percent of peak equity, 0-100.
    pub max_drawdown: f64,
    pub profit_factor: f64,
    pub sharpe_ratio: f64,
    pub win_loss_ratio: f64,
    pub gross_profit: f64,
    /// Absolute value.
    pub gross_loss: f64,
    pub avg_win: f64,
    /// Absolute value.
    pub avg_loss: f64,
    pub largest_win: f64,
    /// Absolute value.
    pub largest_loss: f64,
    pub avg_holding_secs: f64,
    pub by_instrument: BTreeMap<String, BucketStats>,
    pub by_direction: BTreeMap<Direction, BucketStats>,
    /// Keyed by hour of exit time, 0-23.
    pub by_hour: BTreeMap<u32, BucketStats>,
    pub daily_pnl: Vec<DailyPnl>,
    pub equity_curve: Vec<EquityPoint>,
}

pub fn compute_metrics(trades: &TradeSet, base_capital: f64) -> MetricsReport {
    let mut trades_won = 0usize;
    let mut trades_lost = 0usize;
    let mut trades_breakeven = 0usize;
    let mut gross_profit = 0.0_f64;
    let mut gross_loss = 0.0_f64;
    let mut largest_win = 0.0_f64;
    let mut largest_loss = 0.0_f64;
    let mut total_holding_secs = 0i64;

    let mut by_instrument: BTreeMap<String, BucketStats> = BTreeMap::new();
    let mut by_direction: BTreeMap<Direction, BucketStats> = BTreeMap::new();
    let mut by_hour: BTreeMap<u32, BucketStats> = BTreeMap::new();

    for trade in trades {
        let pnl = trade.profit();
        if trade.is_win() {
            trades_won += 1;
            gross_profit += pnl;
            largest_win = largest_win.max(pnl);
        } else if trade.is_loss() {
            trades_lost += 1;
            gross_loss += pnl.abs();
            largest_loss = largest_loss.max(pnl.abs());
        } else {
            trades_breakeven += 1;
        }

        total_holding_secs += trade.holding_secs();

        by_instrument
            .entry(trade.instrument().to_string())
            .or_default()
            .record(trade);
        by_direction
            .entry(trade.direction())
            .or_default()
            .record(trade);
        by_hour
            .entry(trade.exit_time().hour())
            .or_default()
            .record(trade);
    }

    let total_trades = trades.len();
    let total_pnl = trades.iter().map(Trade::profit).sum::<f64>();

    let win_rate = ratio(trades_won as f64, total_trades as f64) * 100.0;
    let profit_factor = ratio(gross_profit, gross_loss);
    let avg_win = ratio(gross_profit, trades_won as f64);
    let avg_loss = ratio(gross_loss, trades_lost as f64);
    let win_loss_ratio = if trades_lost > 0 {
        ratio(avg_win, avg_loss).abs()
    } else {
        0.0
    };
    let avg_holding_secs = ratio(total_holding_secs as f64, total_trades as f64);

    let profits: Vec<f64> = trades.iter().map(Trade::profit).collect();
    let max_drawdown = compute_drawdown(&profits, base_capital);

    let daily_pnl = compute_daily_pnl(trades);
    let sharpe_ratio = compute_sharpe(&daily_pnl);

    let equity_curve = compute_equity_curve(trades, base_capital);

    MetricsReport {
        base_capital,
        total_trades,
        trades_won,
        trades_lost,
        trades_breakeven,
        total_pnl,
        win_rate,
        max_drawdown,
        profit_factor,
        sharpe_ratio,
        win_loss_ratio,
        gross_profit,
        gross_loss,
        avg_win,
        avg_loss,
        largest_win,
        largest_loss,
        avg_holding_secs,
        by_instrument,
        by_direction,
        by_hour,
        daily_pnl,
        equity_curve,
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Largest peak-to-trough decline, in percent of the peak, of the running
/// equity seeded at `base_capital`. `profits` must be in chronological order.
pub fn compute_drawdown(profits: &[f64], base_capital: f64) -> f64 {
    let mut peak = base_capital;
    let mut running = base_capital;
    let mut max_dd = 0.0_f64;

    for pnl in profits {
        running += pnl;
        if running > peak {
            peak = running;
        } else if peak > 0.0 {
            let dd = (peak - running) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

/// Sum profit per calendar day of exit, in date order.
pub fn compute_daily_pnl(trades: &TradeSet) -> Vec<DailyPnl> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for trade in trades {
        *by_day.entry(trade.exit_time().date()).or_insert(0.0) += trade.profit();
    }
    by_day
        .into_iter()
        .map(|(date, profit)| DailyPnl { date, profit })
        .collect()
}

/// Relative floor under which daily dispersion is rounding noise.
const DISPERSION_TOLERANCE: f64 = 16.0 * f64::EPSILON;

/// Annualized Sharpe ratio of daily profit using the population standard
/// deviation. Zero when there is no dispersion beyond rounding noise.
pub fn compute_sharpe(daily: &[DailyPnl]) -> f64 {
    if daily.is_empty() {
        return 0.0;
    }

    let n = daily.len() as f64;
    let mean = daily.iter().map(|d| d.profit).sum::<f64>() / n;
    let variance = daily.iter().map(|d| (d.profit - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > DISPERSION_TOLERANCE * mean.abs().max(1.0) {
        mean / stddev * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}

pub fn compute_equity_curve(trades: &TradeSet, base_capital: f64) -> Vec<EquityPoint> {
    let mut cumulative = 0.0_f64;
    trades
        .iter()
        .map(|trade| {
            cumulative += trade.profit();
            EquityPoint {
                time: trade.exit_time(),
                cumulative_pnl: cumulative,
                equity: base_capital + cumulative,
            }
        })
        .collect()
}
