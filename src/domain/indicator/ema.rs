//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close: EMA[0] = C[0],
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). Defined from the first bar on.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, SENTINEL};
use crate::domain::price::PriceSeries;

pub fn calculate_ema(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let values = if period == 0 {
        vec![SENTINEL; series.len()]
    } else {
        ema_values(&series.closes(), period)
    };
    IndicatorSeries::from_values(IndicatorType::Ema(period), series, &values)
}

/// EMA recurrence over raw values. `period` must be non-zero.
pub(crate) fn ema_values(input: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(input.len());
    let mut ema = 0.0;
    for (i, &value) in input.iter().enumerate() {
        ema = if i == 0 {
            value
        } else {
            value * k + ema * (1.0 - k)
        };
        out.push(ema);
    }
    out
}
