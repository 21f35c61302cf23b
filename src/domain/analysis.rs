//! Per-symbol pipeline: fetch history, compute indicators, run the RSI strategy.
//!
//! A provider failure is an `Err`; a symbol with no history in range is `Ok(None)`.

use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;

use crate::domain::backtest::{run_rsi_strategy, RsiStrategyConfig};
use crate::domain::error::QuantError;
use crate::domain::indicator::IndicatorPoint;
use crate::domain::indicator_helpers::compute_indicators;
use crate::domain::metrics::TradeStats;
use crate::domain::position::TradeResult;
use crate::domain::price::PriceSeries;
use crate::ports::data_port::MarketDataProvider;

pub const DEFAULT_HISTORY_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumePoint {
    pub date: NaiveDate,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAnalysis {
    pub symbol: String,
    pub kline: Vec<IndicatorPoint>,
    pub volume: Vec<VolumePoint>,
    pub macd: Vec<IndicatorPoint>,
    pub macd_signal: Vec<IndicatorPoint>,
    pub macd_diff: Vec<IndicatorPoint>,
    pub rsi: Vec<IndicatorPoint>,
    pub signals: Vec<TradeResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestReport {
    pub symbol: String,
    pub trades: Vec<TradeResult>,
    pub stats: TradeStats,
}

/// `[end - days, end]`, the trailing window used by every per-symbol view.
/// `None` when the start falls outside the representable date range.
pub fn trailing_window(end: NaiveDate, days: i64) -> Option<(NaiveDate, NaiveDate)> {
    let span = TimeDelta::try_days(days)?;
    let start = end.checked_sub_signed(span)?;
    Some((start, end))
}

pub fn load_series(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Option<PriceSeries>, QuantError> {
    let points = provider.fetch_daily_history(symbol, start_date, end_date)?;
    if points.is_empty() {
        tracing::warn!(symbol, %start_date, %end_date, "no history in range");
        return Ok(None);
    }
    PriceSeries::new(points).map(Some)
}

pub fn analyze_symbol(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    rsi_window: usize,
    strategy: &RsiStrategyConfig,
) -> Result<Option<StockAnalysis>, QuantError> {
    let Some(series) = load_series(provider, symbol, start_date, end_date)? else {
        return Ok(None);
    };
    tracing::info!(symbol, bars = series.len(), "computing analysis");

    let indicators = compute_indicators(&series, rsi_window);
    let signals = run_rsi_strategy(&series, &indicators.rsi, strategy)?;

    let kline = series
        .points()
        .iter()
        .map(|p| IndicatorPoint {
            date: p.date,
            value: p.close,
        })
        .collect();
    let volume = series
        .points()
        .iter()
        .map(|p| VolumePoint {
            date: p.date,
            value: p.volume,
        })
        .collect();

    Ok(Some(StockAnalysis {
        symbol: symbol.to_string(),
        kline,
        volume,
        macd: indicators.macd.values,
        macd_signal: indicators.macd_signal.values,
        macd_diff: indicators.macd_diff.values,
        rsi: indicators.rsi.values,
        signals,
    }))
}

pub fn backtest_symbol(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    rsi_window: usize,
    strategy: &RsiStrategyConfig,
) -> Result<Option<BacktestReport>, QuantError> {
    let Some(series) = load_series(provider, symbol, start_date, end_date)? else {
        return Ok(None);
    };

    let rsi = crate::domain::indicator::calculate_rsi(&series, rsi_window);
    let trades = run_rsi_strategy(&series, &rsi, strategy)?;
    let stats = TradeStats::compute(&trades);
    tracing::info!(
        symbol,
        closed = stats.closed_trades,
        open = stats.open_trades,
        "backtest complete"
    );

    Ok(Some(BacktestReport {
        symbol: symbol.to_string(),
        trades,
        stats,
    }))
}
