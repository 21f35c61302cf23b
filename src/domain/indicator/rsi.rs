//! RSI (Relative Strength Index) indicator.
//!
//! Simple rolling mean of gains and losses over the last n close-to-close
//! changes. The change at the first bar is taken as zero.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100
//! If both are zero (flat window): RSI = 50
//!
//! Warmup: first (n-1) bars carry the sentinel.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, SENTINEL};
use crate::domain::price::PriceSeries;

pub const DEFAULT_WINDOW: usize = 6;

pub fn calculate_rsi(series: &PriceSeries, window: usize) -> IndicatorSeries {
    let closes = series.closes();
    let mut values = vec![SENTINEL; closes.len()];

    if window == 0 || closes.is_empty() {
        return IndicatorSeries::from_values(IndicatorType::Rsi(window), series, &values);
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        let change = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    for i in (window - 1)..closes.len() {
        let start = i + 1 - window;
        let avg_gain = gains[start..=i].iter().sum::<f64>() / window as f64;
        let avg_loss = losses[start..=i].iter().sum::<f64>() / window as f64;
        values[i] = rsi_from_averages(avg_gain, avg_loss);
    }

    IndicatorSeries::from_values(IndicatorType::Rsi(window), series, &values)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
