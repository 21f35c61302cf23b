//! SMA crossover signal.
//!
//! signal = 1 while the short SMA is above the long SMA, else 0; the first
//! `warmup` signals are held at 0. position_delta is the first difference of
//! the signal (+1 entry, -1 exit).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::indicator::sma::sma_values;
use crate::domain::price::PriceSeries;

pub const DEFAULT_SHORT_WINDOW: usize = 10;
pub const DEFAULT_LONG_WINDOW: usize = 50;
pub const DEFAULT_WARMUP: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmaSignalPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: i64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub signal: u8,
    pub position_delta: Option<i8>,
}

pub fn compute_sma_signal(series: &PriceSeries) -> Vec<SmaSignalPoint> {
    compute_sma_signal_with(
        series,
        DEFAULT_SHORT_WINDOW,
        DEFAULT_LONG_WINDOW,
        DEFAULT_WARMUP,
    )
}

pub fn compute_sma_signal_with(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
    warmup: usize,
) -> Vec<SmaSignalPoint> {
    let closes = series.closes();
    let short = sma_values(&closes, short_window);
    let long = sma_values(&closes, long_window);

    let mut out: Vec<SmaSignalPoint> = Vec::with_capacity(closes.len());
    for (i, bar) in series.points().iter().enumerate() {
        let signal = match (short[i], long[i]) {
            (Some(s), Some(l)) if i >= warmup && s > l => 1,
            _ => 0,
        };
        let position_delta = out.last().map(|prev| signal as i8 - prev.signal as i8);
        out.push(SmaSignalPoint {
            date: bar.date,
            close: bar.close,
            volume: bar.volume,
            sma_short: short[i],
            sma_long: long[i],
            signal,
            position_delta,
        });
    }
    out
}
