//! Technical indicator implementations.
//!
//! Every indicator produces an [`IndicatorSeries`] aligned one-to-one with the
//! source [`PriceSeries`]: same length, same dates. Points whose lookback
//! window is not yet full carry [`SENTINEL`] instead of being omitted.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::calculate_ema;
pub use macd::{calculate_macd, calculate_macd_default, MacdSeries};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::QuantError;
use crate::domain::price::PriceSeries;

/// Placeholder value for points before an indicator's window is full.
pub const SENTINEL: f64 = 0.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    MacdLine { fast: usize, slow: usize },
    MacdSignal { fast: usize, slow: usize, signal: usize },
    MacdDiff { fast: usize, slow: usize, signal: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Zip raw values onto the dates of `series`. `values` must have the series' length.
    pub fn from_values(indicator_type: IndicatorType, series: &PriceSeries, values: &[f64]) -> Self {
        debug_assert_eq!(series.len(), values.len());
        let values = series
            .points()
            .iter()
            .zip(values)
            .map(|(p, &value)| IndicatorPoint {
                date: p.date,
                value,
            })
            .collect();
        Self {
            indicator_type,
            values,
        }
    }

    pub fn empty(indicator_type: IndicatorType) -> Self {
        Self {
            indicator_type,
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().map(|p| p.value)
    }

    pub fn raw_values(&self) -> Vec<f64> {
        self.values.iter().map(|p| p.value).collect()
    }
}

/// Fails unless `indicator` has exactly the length and dates of `series`.
pub fn check_alignment(series: &PriceSeries, indicator: &IndicatorSeries) -> Result<(), QuantError> {
    if series.len() != indicator.len() {
        return Err(QuantError::invalid_series(format!(
            "{} has {} points, price series has {}",
            indicator.indicator_type,
            indicator.len(),
            series.len()
        )));
    }
    for (i, (price, point)) in series.points().iter().zip(&indicator.values).enumerate() {
        if price.date != point.date {
            return Err(QuantError::invalid_series(format!(
                "{} date {} does not match price date {} at index {}",
                indicator.indicator_type, point.date, price.date, i
            )));
        }
    }
    Ok(())
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::MacdLine { fast, slow } => write!(f, "MACD({},{})", fast, slow),
            IndicatorType::MacdSignal { fast, slow, signal } => {
                write!(f, "MACD_SIGNAL({},{},{})", fast, slow, signal)
            }
            IndicatorType::MacdDiff { fast, slow, signal } => {
                write!(f, "MACD_DIFF({},{},{})", fast, slow, signal)
            }
        }
    }
}
