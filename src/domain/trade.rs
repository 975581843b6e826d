//! Closed trades and chronologically ordered trade sets.

use std::fmt;

use chrono::NaiveDateTime;

use super::error::TradePerfError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed round-trip position.
///
/// Fields are read-only once constructed; use [`Trade::new`] so the price,
/// quantity and timestamp invariants are checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    instrument: String,
    direction: Direction,
    quantity: u32,
    entry_time: NaiveDateTime,
    exit_time: NaiveDateTime,
    entry_price: f64,
    exit_price: f64,
    profit: f64,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instrument: impl Into<String>,
        direction: Direction,
        quantity: u32,
        entry_time: NaiveDateTime,
        exit_time: NaiveDateTime,
        entry_price: f64,
        exit_price: f64,
        profit: f64,
    ) -> Result<Self, TradePerfError> {
        let instrument = instrument.into();
        if instrument.trim().is_empty() {
            return Err(TradePerfError::invalid_trade("instrument must not be empty"));
        }
        if quantity == 0 {
            return Err(TradePerfError::invalid_trade(format!(
                "{instrument}: quantity must be positive"
            )));
        }
        if exit_time < entry_time {
            return Err(TradePerfError::invalid_trade(format!(
                "{instrument}: exit time {exit_time} precedes entry time {entry_time}"
            )));
        }
        for (name, price) in [("entry price", entry_price), ("exit price", exit_price)] {
            if !price.is_finite() || price <= 0.0 {
                return Err(TradePerfError::invalid_trade(format!(
                    "{instrument}: {name} must be positive, got {price}"
                )));
            }
        }
        if !profit.is_finite() {
            return Err(TradePerfError::invalid_trade(format!(
                "{instrument}: profit must be finite"
            )));
        }

        Ok(Self {
            instrument,
            direction,
            quantity,
            entry_time,
            exit_time,
            entry_price,
            exit_price,
            profit,
        })
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn entry_time(&self) -> NaiveDateTime {
        self.entry_time
    }

    pub fn exit_time(&self) -> NaiveDateTime {
        self.exit_time
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    pub fn exit_price(&self) -> f64 {
        self.exit_price
    }

    pub fn profit(&self) -> f64 {
        self.profit
    }

    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.profit < 0.0
    }

    pub fn holding_secs(&self) -> i64 {
        (self.exit_time - self.entry_time).num_seconds()
    }
}

/// Trades ordered by exit time, ascending.
///
/// Drawdown and the equity curve are path dependent, so the ordering is
/// enforced here rather than assumed by the calculator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeSet {
    trades: Vec<Trade>,
}

impl TradeSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Accept trades that are already chronological; reject anything else.
    pub fn new(trades: Vec<Trade>) -> Result<Self, TradePerfError> {
        if let Some(pos) = trades
            .windows(2)
            .position(|w| w[1].exit_time < w[0].exit_time)
        {
            return Err(TradePerfError::OutOfOrder { index: pos + 1 });
        }
        Ok(Self { trades })
    }

    /// Stable sort by exit time. Trades closing at the same instant keep
    /// their input order.
    pub fn sorted(mut trades: Vec<Trade>) -> Self {
        trades.sort_by_key(|t| t.exit_time);
        Self { trades }
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trade> {
        self.trades.iter()
    }

    pub fn first_exit(&self) -> Option<NaiveDateTime> {
        self.trades.first().map(|t| t.exit_time)
    }

    pub fn last_exit(&self) -> Option<NaiveDateTime> {
        self.trades.last().map(|t| t.exit_time)
    }
}

impl<'a> IntoIterator for &'a TradeSet {
    type Item = &'a Trade;
    type IntoIter = std::slice::Iter<'a, Trade>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn trade(exit_day: u32, profit: f64) -> Trade {
        Trade::new(
            "MNQ 06-25",
            Direction::Long,
            1,
            at(exit_day, 9, 30),
            at(exit_day, 9, 45),
            17823.5,
            17831.75,
            profit,
        )
        .unwrap()
    }

    #[test]
    fn new_accepts_valid_trade() {
        let t = trade(5, 16.5);
        assert_eq!(t.instrument(), "MNQ 06-25");
        assert_eq!(t.direction(), Direction::Long);
        assert_eq!(t.quantity(), 1);
        assert_eq!(t.holding_secs(), 15 * 60);
        assert!(t.is_win());
        assert!(!t.is_loss());
    }

    #[test]
    fn new_rejects_exit_before_entry() {
        let err = Trade::new(
            "MES",
            Direction::Short,
            1,
            at(5, 10, 0),
            at(5, 9, 0),
            5000.0,
            4990.0,
            50.0,
        )
        .unwrap_err();
        assert!(matches!(err, TradePerfError::InvalidTrade { .. }));
    }

    #[test]
    fn new_rejects_zero_quantity() {
        let err = Trade::new(
            "MES",
            Direction::Long,
            0,
            at(5, 9, 0),
            at(5, 9, 5),
            5000.0,
            5001.0,
            5.0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("quantity"));
    }

    #[test]
    fn new_rejects_non_positive_price() {
        let err = Trade::new(
            "MES",
            Direction::Long,
            1,
            at(5, 9, 0),
            at(5, 9, 5),
            0.0,
            5001.0,
            5.0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("entry price"));
    }

    #[test]
    fn new_rejects_nan_profit() {
        let result = Trade::new(
            "MES",
            Direction::Long,
            1,
            at(5, 9, 0),
            at(5, 9, 5),
            5000.0,
            5001.0,
            f64::NAN,
        );
        assert!(result.is_err());
    }

    #[test]
    fn new_allows_zero_duration() {
        let t = Trade::new(
            "MES",
            Direction::Long,
            1,
            at(5, 9, 0),
            at(5, 9, 0),
            5000.0,
            5000.0,
            0.0,
        )
        .unwrap();
        assert_eq!(t.holding_secs(), 0);
        assert!(!t.is_win());
        assert!(!t.is_loss());
    }

    #[test]
    fn trade_set_accepts_chronological_input() {
        let set = TradeSet::new(vec![trade(5, 1.0), trade(6, 2.0), trade(6, 3.0)]).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.first_exit(), Some(at(5, 9, 45)));
        assert_eq!(set.last_exit(), Some(at(6, 9, 45)));
    }

    #[test]
    fn trade_set_rejects_out_of_order_input() {
        let err = TradeSet::new(vec![trade(6, 1.0), trade(5, 2.0)]).unwrap_err();
        assert!(matches!(err, TradePerfError::OutOfOrder { index: 1 }));
    }

    #[test]
    fn trade_set_sorted_orders_by_exit_time() {
        let set = TradeSet::sorted(vec![trade(7, 3.0), trade(5, 1.0), trade(6, 2.0)]);
        let profits: Vec<f64> = set.iter().map(|t| t.profit()).collect();
        assert_eq!(profits, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn trade_set_sorted_is_stable_for_equal_exits() {
        let set = TradeSet::sorted(vec![trade(5, 10.0), trade(5, -4.0), trade(5, 2.0)]);
        let profits: Vec<f64> = set.iter().map(|t| t.profit()).collect();
        assert_eq!(profits, vec![10.0, -4.0, 2.0]);
    }

    #[test]
    fn empty_trade_set() {
        let set = TradeSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.first_exit(), None);
        assert_eq!(set.last_exit(), None);
    }

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Long.to_string(), "Long");
        assert_eq!(Direction::Short.to_string(), "Short");
    }
}
