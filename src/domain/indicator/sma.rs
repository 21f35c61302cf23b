//! Simple Moving Average indicator.
//!
//! Rolling mean of the last n closes. Warmup: first (n-1) bars carry the sentinel.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, SENTINEL};
use crate::domain::price::PriceSeries;

pub fn calculate_sma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let values: Vec<f64> = sma_values(&series.closes(), period)
        .into_iter()
        .map(|v| v.unwrap_or(SENTINEL))
        .collect();
    IndicatorSeries::from_values(IndicatorType::Sma(period), series, &values)
}

/// Rolling mean over raw values, `None` until the window is full.
pub(crate) fn sma_values(input: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; input.len()];
    }

    let mut out = Vec::with_capacity(input.len());
    let mut sum = 0.0;
    for (i, &value) in input.iter().enumerate() {
        sum += value;
        if i >= period {
            sum -= input[i - period];
        }
        if i + 1 >= period {
            out.push(Some(sum / period as f64));
        } else {
            out.push(None);
        }
    }
    out
}
