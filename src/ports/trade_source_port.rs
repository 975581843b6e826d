//! Trade record source port trait.

use crate::domain::error::TradePerfError;
use crate::domain::trade::Trade;

/// Supplies closed trades with every field already normalized.
///
/// Implementations return trades in file order; callers build a
/// [`TradeSet`](crate::domain::trade::TradeSet) from them.
pub trait TradeSource {
    /// Human-readable identifier used in logs and error messages.
    fn name(&self) -> String;

    fn fetch_trades(&self) -> Result<Vec<Trade>, TradePerfError>;
}

impl<T: TradeSource + ?Sized> TradeSource for Box<T> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn fetch_trades(&self) -> Result<Vec<Trade>, TradePerfError> {
        (**self).fetch_trades()
    }
}
