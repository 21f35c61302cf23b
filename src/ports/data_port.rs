//! Market data provider port.

use crate::domain::error::QuantError;
use crate::domain::price::PricePoint;
use crate::domain::snapshot::StockQuote;
use chrono::NaiveDate;

pub trait MarketDataProvider {
    /// Daily history for `symbol` within `[start_date, end_date]`, ascending by date.
    fn fetch_daily_history(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, QuantError>;

    /// Latest quote for every symbol the provider knows.
    fn fetch_snapshot(&self) -> Result<Vec<StockQuote>, QuantError>;

    fn list_symbols(&self) -> Result<Vec<String>, QuantError>;
}
