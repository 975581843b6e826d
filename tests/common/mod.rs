#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::io::Write;
use tradeperf::domain::error::TradePerfError;
pub use tradeperf::domain::trade::{Direction, Trade, TradeSet};
use tradeperf::ports::trade_source_port::TradeSource;

pub struct MockTradeSource {
    pub name: String,
    pub trades: Vec<Trade>,
    pub error: Option<String>,
}

impl MockTradeSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            trades: Vec::new(),
            error: None,
        }
    }

    pub fn with_trades(mut self, trades: Vec<Trade>) -> Self {
        self.trades = trades;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl TradeSource for MockTradeSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn fetch_trades(&self) -> Result<Vec<Trade>, TradePerfError> {
        if let Some(reason) = &self.error {
            return Err(TradePerfError::SourceRead {
                path: self.name.clone(),
                reason: reason.clone(),
            });
        }
        Ok(self.trades.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

/// A one-contract long trade held five minutes, closing at `exit`.
pub fn make_trade(instrument: &str, exit: NaiveDateTime, profit: f64) -> Trade {
    let entry = exit - chrono::Duration::minutes(5);
    Trade::new(instrument, Direction::Long, 1, entry, exit, 100.0, 101.0, profit).unwrap()
}

/// One trade per day from 2025-05-01 at 10:00, in the given profit order.
pub fn daily_trades(profits: &[f64]) -> Vec<Trade> {
    profits
        .iter()
        .enumerate()
        .map(|(i, &p)| make_trade("MNQ 06-25", at(2025, 5, 1 + i as u32, 10, 0), p))
        .collect()
}

pub fn daily_set(profits: &[f64]) -> TradeSet {
    TradeSet::new(daily_trades(profits)).unwrap()
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub const GRID_CSV: &str = "\
Trade number,Instrument,Account,Strategy,Market pos.,Qty,Entry price,Exit price,Entry time,Exit time,Entry name,Exit name,Profit,Cum. net profit,Commission
1,MNQ 06-25,Sim101,MeanRev,Long,2,17823.50,17831.75,5/13/2025 9:35:17 AM,5/13/2025 9:37:02 AM,Entry,Exit,$33.00,$33.00,$1.24
2,MNQ 06-25,Sim101,MeanRev,Short,1,17840.00,17846.25,5/13/2025 10:02:43 AM,5/13/2025 10:05:10 AM,Entry,Stop,($12.50),$20.50,$0.62
3,MES 06-25,Sim101,MeanRev,Long,1,5612.25,5615.00,5/14/2025 1:15:00 PM,5/14/2025 1:20:30 PM,Entry,Exit,\"$1,013.75\",\"$1,034.25\",$0.62
";
