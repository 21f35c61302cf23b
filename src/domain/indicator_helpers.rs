//! Indicator engine: the MACD and RSI columns computed together over one series.

use crate::domain::indicator::{calculate_macd_default, calculate_rsi, IndicatorSeries};
use crate::domain::price::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub macd: IndicatorSeries,
    pub macd_signal: IndicatorSeries,
    pub macd_diff: IndicatorSeries,
    pub rsi: IndicatorSeries,
}

pub fn compute_indicators(series: &PriceSeries, rsi_window: usize) -> IndicatorSet {
    let macd = calculate_macd_default(series);
    IndicatorSet {
        macd: macd.macd,
        macd_signal: macd.signal,
        macd_diff: macd.diff,
        rsi: calculate_rsi(series, rsi_window),
    }
}
