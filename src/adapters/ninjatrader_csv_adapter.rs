//! NinjaTrader grid export (CSV) trade source.

use std::fs;
use std::path::PathBuf;

use crate::domain::error::TradePerfError;
use crate::domain::normalize::{
    parse_direction, parse_money, parse_price, parse_quantity, parse_timestamp, FieldError,
};
use crate::domain::trade::Trade;
use crate::ports::trade_source_port::TradeSource;

pub const COL_INSTRUMENT: &str = "Instrument";
pub const COL_MARKET_POS: &str = "Market pos.";
pub const COL_QTY: &str = "Qty";
pub const COL_ENTRY_PRICE: &str = "Entry price";
pub const COL_EXIT_PRICE: &str = "Exit price";
pub const COL_ENTRY_TIME: &str = "Entry time";
pub const COL_EXIT_TIME: &str = "Exit time";
pub const COL_PROFIT: &str = "Profit";

pub struct NinjaTraderCsvAdapter {
    path: PathBuf,
}

impl NinjaTraderCsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TradeSource for NinjaTraderCsvAdapter {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_trades(&self) -> Result<Vec<Trade>, TradePerfError> {
        let content = fs::read_to_string(&self.path).map_err(|e| TradePerfError::SourceRead {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        let trades = parse_trades(&content, &self.name())?;
        log::debug!("loaded {} trades from {}", trades.len(), self.path.display());
        Ok(trades)
    }
}

struct Columns {
    instrument: usize,
    market_pos: usize,
    qty: usize,
    entry_price: usize,
    exit_price: usize,
    entry_time: usize,
    exit_time: usize,
    profit: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord, source_name: &str) -> Result<Self, TradePerfError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| TradePerfError::SourceParse {
                    source_name: source_name.to_string(),
                    row: 0,
                    reason: format!("missing column '{name}'"),
                })
        };
        Ok(Self {
            instrument: find(COL_INSTRUMENT)?,
            market_pos: find(COL_MARKET_POS)?,
            qty: find(COL_QTY)?,
            entry_price: find(COL_ENTRY_PRICE)?,
            exit_price: find(COL_EXIT_PRICE)?,
            entry_time: find(COL_ENTRY_TIME)?,
            exit_time: find(COL_EXIT_TIME)?,
            profit: find(COL_PROFIT)?,
        })
    }
}

/// Parse the text of a grid export. Columns are matched by header name, so
/// extra columns such as `Cum. net profit` or `Commission` are ignored.
pub fn parse_trades(content: &str, source_name: &str) -> Result<Vec<Trade>, TradePerfError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| TradePerfError::SourceParse {
            source_name: source_name.to_string(),
            row: 0,
            reason: format!("CSV header error: {e}"),
        })?
        .clone();
    let cols = Columns::locate(&headers, source_name)?;

    let mut trades = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| TradePerfError::SourceParse {
            source_name: source_name.to_string(),
            row,
            reason: format!("CSV parse error: {e}"),
        })?;

        if record.iter().all(|f| f.is_empty()) {
            continue;
        }

        let parse_err = |column: &str, e: FieldError| TradePerfError::SourceParse {
            source_name: source_name.to_string(),
            row,
            reason: format!("{column}: {e}"),
        };
        let get = |idx: usize| record.get(idx).unwrap_or("");

        let direction =
            parse_direction(get(cols.market_pos)).map_err(|e| parse_err(COL_MARKET_POS, e))?;
        let quantity = parse_quantity(get(cols.qty)).map_err(|e| parse_err(COL_QTY, e))?;
        let entry_price =
            parse_price(get(cols.entry_price)).map_err(|e| parse_err(COL_ENTRY_PRICE, e))?;
        let exit_price =
            parse_price(get(cols.exit_price)).map_err(|e| parse_err(COL_EXIT_PRICE, e))?;
        let entry_time =
            parse_timestamp(get(cols.entry_time)).map_err(|e| parse_err(COL_ENTRY_TIME, e))?;
        let exit_time =
            parse_timestamp(get(cols.exit_time)).map_err(|e| parse_err(COL_EXIT_TIME, e))?;
        let profit = parse_money(get(cols.profit)).map_err(|e| parse_err(COL_PROFIT, e))?;

        let trade = Trade::new(
            get(cols.instrument),
            direction,
            quantity,
            entry_time,
            exit_time,
            entry_price,
            exit_price,
            profit,
        )
        .map_err(|e| e.at_row(source_name, row))?;
        trades.push(trade);
    }

    Ok(trades)
}
