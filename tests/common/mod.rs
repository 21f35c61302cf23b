#![allow(dead_code)]

use chrono::NaiveDate;
use quantdesk::domain::error::QuantError;
pub use quantdesk::domain::price::{PricePoint, PriceSeries};
use quantdesk::domain::snapshot::StockQuote;
use quantdesk::ports::data_port::MarketDataProvider;
use std::collections::HashMap;
use std::sync::Mutex;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
    pub quotes: Vec<StockQuote>,
    pub snapshot_calls: Mutex<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            quotes: Vec::new(),
            snapshot_calls: Mutex::new(0),
        }
    }

    pub fn with_points(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_closes(self, symbol: &str, start_date: &str, closes: &[f64]) -> Self {
        self.with_points(symbol, points_from_closes(start_date, closes))
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn with_quote(mut self, symbol: &str, name: &str, last_price: f64, change_percent: f64) -> Self {
        self.quotes.push(StockQuote {
            symbol: symbol.to_string(),
            name: name.to_string(),
            last_price,
            change_percent,
        });
        self
    }

    pub fn snapshot_calls(&self) -> usize {
        *self.snapshot_calls.lock().unwrap()
    }
}

impl MarketDataProvider for MockDataPort {
    fn fetch_daily_history(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, QuantError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(QuantError::provider(reason.clone()));
        }
        Ok(self
            .data
            .get(symbol)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn fetch_snapshot(&self) -> Result<Vec<StockQuote>, QuantError> {
        *self.snapshot_calls.lock().unwrap() += 1;
        Ok(self.quotes.clone())
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// One point per calendar day starting at `start_date`.
pub fn points_from_closes(start_date: &str, closes: &[f64]) -> Vec<PricePoint> {
    let start = date(start_date);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: start + chrono::Duration::days(i as i64),
            close,
            volume: 1000 + i as i64,
        })
        .collect()
}

pub fn series_from_closes(start_date: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(points_from_closes(start_date, closes)).unwrap()
}

/// Rising prices from `start_price`, one unit per day.
pub fn rising_closes(count: usize, start_price: f64) -> Vec<f64> {
    (0..count).map(|i| start_price + i as f64).collect()
}
