//! RSI mean-reversion backtest.
//!
//! Single pass over the series in date order. Each day: open a position when
//! RSI is oversold, then check every open position (including one opened the
//! same day) for a stop-loss hit or an overbought exit. Positions still open
//! after the last bar are reported with empty sell fields.

use crate::domain::error::QuantError;
use crate::domain::indicator::{check_alignment, IndicatorSeries};
use crate::domain::position::{ExitReason, Position, TradeResult};
use crate::domain::price::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct RsiStrategyConfig {
    /// Enter when 0 < RSI < entry_below.
    pub entry_below: f64,
    /// Exit when RSI > exit_above.
    pub exit_above: f64,
    /// Stop out when close <= buy_price * stop_loss_ratio.
    pub stop_loss_ratio: f64,
}

impl Default for RsiStrategyConfig {
    fn default() -> Self {
        Self {
            entry_below: 20.0,
            exit_above: 80.0,
            stop_loss_ratio: 0.9,
        }
    }
}

pub fn run_rsi_strategy(
    series: &PriceSeries,
    rsi: &IndicatorSeries,
    config: &RsiStrategyConfig,
) -> Result<Vec<TradeResult>, QuantError> {
    check_alignment(series, rsi)?;

    let mut results = Vec::new();
    let mut open: Vec<Position> = Vec::new();

    for (bar, point) in series.points().iter().zip(&rsi.values) {
        let rsi_value = point.value;

        if rsi_value > 0.0 && rsi_value < config.entry_below {
            open.push(Position::new(bar.date, bar.close));
        }

        let mut still_open = Vec::with_capacity(open.len());
        for position in open.drain(..) {
            if position.should_stop_loss(bar.close, config.stop_loss_ratio) {
                results.push(position.close(bar.date, bar.close, ExitReason::StopLoss));
            } else if rsi_value > config.exit_above {
                results.push(position.close(bar.date, bar.close, ExitReason::Overbought));
            } else {
                still_open.push(position);
            }
        }
        open = still_open;
    }

    results.extend(open.into_iter().map(Position::into_open_trade));
    Ok(results)
}

pub fn run_rsi_strategy_default(
    series: &PriceSeries,
    rsi: &IndicatorSeries,
) -> Result<Vec<TradeResult>, QuantError> {
    run_rsi_strategy(series, rsi, &RsiStrategyConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorType;
    use crate::domain::price::PricePoint;
    use chrono::NaiveDate;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(n)
    }

    /// Build a series and a hand-written RSI column from (close, rsi) pairs.
    fn fixture(rows: &[(f64, f64)]) -> (PriceSeries, IndicatorSeries) {
        let points = rows
            .iter()
            .enumerate()
            .map(|(i, &(close, _))| PricePoint {
                date: day(i as i64),
                close,
                volume: 1000,
            })
            .collect();
        let series = PriceSeries::new(points).unwrap();
        let rsi: Vec<f64> = rows.iter().map(|&(_, r)| r).collect();
        let rsi = IndicatorSeries::from_values(IndicatorType::Rsi(6), &series, &rsi);
        (series, rsi)
    }

    #[test]
    fn config_defaults() {
        let c = RsiStrategyConfig::default();
        assert_eq!(c.entry_below, 20.0);
        assert_eq!(c.exit_above, 80.0);
        assert_eq!(c.stop_loss_ratio, 0.9);
    }

    #[test]
    fn empty_series_yields_no_trades() {
        let (series, rsi) = fixture(&[]);
        assert!(run_rsi_strategy_default(&series, &rsi).unwrap().is_empty());
    }

    #[test]
    fn sentinel_rsi_never_enters() {
        let (series, rsi) = fixture(&[(100.0, 0.0), (90.0, 0.0), (80.0, 0.0)]);
        assert!(run_rsi_strategy_default(&series, &rsi).unwrap().is_empty());
    }

    #[test]
    fn stop_loss_closes_position() {
        let (series, rsi) = fixture(&[(100.0, 50.0), (95.0, 15.0), (89.0, 30.0), (85.0, 30.0)]);
        let trades = run_rsi_strategy_default(&series, &rsi).unwrap();

        assert_eq!(trades.len(), 1);
        let t = &trades[0];
        assert_eq!(t.buy_date, day(1));
        assert_eq!(t.sell_date, Some(day(3)));
        assert_eq!(t.sell_price, Some(85.0));
        assert_eq!(t.exit_reason, Some(ExitReason::StopLoss));
    }

    #[test]
    fn overbought_exit_before_stop() {
        let (series, rsi) = fixture(&[(100.0, 10.0), (104.0, 60.0), (110.0, 85.0)]);
        let trades = run_rsi_strategy_default(&series, &rsi).unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].exit_reason, Some(ExitReason::Overbought));
        assert!((trades[0].profit_percent.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn stop_loss_wins_over_overbought_same_day() {
        let (series, rsi) = fixture(&[(100.0, 10.0), (80.0, 90.0)]);
        let trades = run_rsi_strategy_default(&series, &rsi).unwrap();
        assert_eq!(trades[0].exit_reason, Some(ExitReason::StopLoss));
    }

    #[test]
    fn multiple_positions_accumulate() {
        let (series, rsi) = fixture(&[(100.0, 15.0), (99.0, 12.0), (98.0, 18.0), (101.0, 85.0)]);
        let trades = run_rsi_strategy_default(&series, &rsi).unwrap();

        assert_eq!(trades.len(), 3);
        let buys: Vec<NaiveDate> = trades.iter().map(|t| t.buy_date).collect();
        assert_eq!(buys, vec![day(0), day(1), day(2)]);
        assert!(trades.iter().all(|t| t.sell_date == Some(day(3))));
    }

    #[test]
    fn open_positions_appended_after_closed() {
        // day0 opens A; day1 opens B; day2 stops A only (threshold 90 vs B's 82.8)
        let (series, rsi) = fixture(&[(100.0, 10.0), (92.0, 15.0), (85.0, 40.0)]);
        let trades = run_rsi_strategy_default(&series, &rsi).unwrap();

        assert_eq!(trades.len(), 2);
        assert!(trades[0].is_closed());
        assert_eq!(trades[0].buy_date, day(0));
        assert!(!trades[1].is_closed());
        assert_eq!(trades[1].buy_date, day(1));
        assert_eq!(trades[1].sell_date, None);
        assert_eq!(trades[1].profit_percent, None);
    }

    #[test]
    fn position_can_close_on_entry_day() {
        let config = RsiStrategyConfig {
            entry_below: 50.0,
            exit_above: 30.0,
            stop_loss_ratio: 0.9,
        };
        let (series, rsi) = fixture(&[(100.0, 40.0)]);
        let trades = run_rsi_strategy(&series, &rsi, &config).unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].buy_date, trades[0].sell_date.unwrap());
        assert_eq!(trades[0].profit_percent, Some(0.0));
    }

    #[test]
    fn closed_position_not_reevaluated() {
        let (series, rsi) = fixture(&[(100.0, 10.0), (120.0, 85.0), (130.0, 90.0)]);
        let trades = run_rsi_strategy_default(&series, &rsi).unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].sell_date, Some(day(1)));
    }

    #[test]
    fn misaligned_rsi_is_rejected() {
        let (series, _) = fixture(&[(100.0, 10.0), (101.0, 20.0)]);
        let (_, short_rsi) = fixture(&[(100.0, 10.0)]);
        let result = run_rsi_strategy_default(&series, &short_rsi);
        assert!(matches!(result, Err(QuantError::InvalidSeries { .. })));
    }
}
