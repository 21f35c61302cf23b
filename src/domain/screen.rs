//! Low-RSI screen over a universe of symbols.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

use crate::domain::analysis::load_series;
use crate::domain::indicator::calculate_rsi;
use crate::ports::data_port::MarketDataProvider;

pub const DEFAULT_THRESHOLD: f64 = 20.0;

/// China A50 constituents.
pub const A50_CODES: &[&str] = &[
    "600519", "601318", "300750", "600036", "000858", "000333", "600276", "600030", "601888",
    "601012", "600900", "000001", "600887", "601398", "601628", "600309", "000651", "601899",
    "600585", "600048", "601288", "601601", "601688", "601166", "601988", "600028", "601857",
    "601818", "601319", "600104", "601668", "601390", "601766", "600029", "601633", "600745",
    "600436", "600196", "600570",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowRsiHit {
    pub code: String,
    pub rsi: i64,
}

/// Latest RSI per code, rounded, kept when below `threshold`. Codes that fail
/// to load, have no history, or are shorter than the window are skipped.
pub fn screen_low_rsi<S: AsRef<str>>(
    provider: &dyn MarketDataProvider,
    codes: &[S],
    start_date: NaiveDate,
    end_date: NaiveDate,
    rsi_window: usize,
    threshold: f64,
) -> Vec<LowRsiHit> {
    let mut seen = HashSet::new();
    let mut hits = Vec::new();

    for code in codes.iter().map(AsRef::as_ref) {
        if !seen.insert(code) {
            continue;
        }

        let series = match load_series(provider, code, start_date, end_date) {
            Ok(Some(series)) => series,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(code, error = %e, "skipping code");
                continue;
            }
        };
        if rsi_window == 0 || series.len() < rsi_window {
            tracing::debug!(code, bars = series.len(), "not enough bars for RSI");
            continue;
        }

        let Some(latest) = calculate_rsi(&series, rsi_window).last_value() else {
            continue;
        };
        let rounded = latest.round_ties_even();
        if rounded < threshold {
            hits.push(LowRsiHit {
                code: code.to_string(),
                rsi: rounded as i64,
            });
        }
    }

    tracing::info!(screened = seen.len(), hits = hits.len(), "low-RSI screen complete");
    hits
}
