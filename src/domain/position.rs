//! Open positions and the trade records they turn into.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub buy_date: NaiveDate,
    pub buy_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    Overbought,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeResult {
    pub buy_date: NaiveDate,
    pub buy_price: f64,
    pub sell_date: Option<NaiveDate>,
    pub sell_price: Option<f64>,
    pub profit_percent: Option<f64>,
    pub exit_reason: Option<ExitReason>,
}

impl Position {
    pub fn new(buy_date: NaiveDate, buy_price: f64) -> Self {
        Self {
            buy_date,
            buy_price,
        }
    }

    /// True when `price` is at or below `buy_price * ratio`.
    pub fn should_stop_loss(&self, price: f64, ratio: f64) -> bool {
        price <= self.buy_price * ratio
    }

    pub fn close(self, sell_date: NaiveDate, sell_price: f64, reason: ExitReason) -> TradeResult {
        TradeResult {
            buy_date: self.buy_date,
            buy_price: self.buy_price,
            sell_date: Some(sell_date),
            sell_price: Some(sell_price),
            profit_percent: Some(profit_percent(self.buy_price, sell_price)),
            exit_reason: Some(reason),
        }
    }

    pub fn into_open_trade(self) -> TradeResult {
        TradeResult {
            buy_date: self.buy_date,
            buy_price: self.buy_price,
            sell_date: None,
            sell_price: None,
            profit_percent: None,
            exit_reason: None,
        }
    }
}

impl TradeResult {
    pub fn is_closed(&self) -> bool {
        self.sell_date.is_some()
    }
}

/// (sell - buy) / buy * 100
pub fn profit_percent(buy_price: f64, sell_price: f64) -> f64 {
    (sell_price - buy_price) / buy_price * 100.0
}
