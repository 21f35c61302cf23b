//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Diff = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9. All three EMAs are seeded
//! with their first input, so every bar carries a value.

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, SENTINEL};
use crate::domain::price::PriceSeries;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub diff: IndicatorSeries,
}

pub fn calculate_macd(
    series: &PriceSeries,
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    let len = series.len();
    let (line, signal, diff) = if fast == 0 || slow == 0 || signal_period == 0 {
        (
            vec![SENTINEL; len],
            vec![SENTINEL; len],
            vec![SENTINEL; len],
        )
    } else {
        let closes = series.closes();
        let ema_fast = ema_values(&closes, fast);
        let ema_slow = ema_values(&closes, slow);
        let line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();
        let signal = ema_values(&line, signal_period);
        let diff = line.iter().zip(&signal).map(|(m, s)| m - s).collect();
        (line, signal, diff)
    };

    MacdSeries {
        macd: IndicatorSeries::from_values(IndicatorType::MacdLine { fast, slow }, series, &line),
        signal: IndicatorSeries::from_values(
            IndicatorType::MacdSignal {
                fast,
                slow,
                signal: signal_period,
            },
            series,
            &signal,
        ),
        diff: IndicatorSeries::from_values(
            IndicatorType::MacdDiff {
                fast,
                slow,
                signal: signal_period,
            },
            series,
            &diff,
        ),
    }
}

pub fn calculate_macd_default(series: &PriceSeries) -> MacdSeries {
    calculate_macd(series, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
