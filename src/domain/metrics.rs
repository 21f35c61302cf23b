//! Summary statistics over a backtest's trade list.

use serde::Serialize;

use super::position::TradeResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeStats {
    pub closed_trades: usize,
    pub open_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
    pub avg_profit_percent: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
}

impl TradeStats {
    /// Open trades are counted but excluded from every profit figure.
    pub fn compute(trades: &[TradeResult]) -> Self {
        let profits: Vec<f64> = trades.iter().filter_map(|t| t.profit_percent).collect();
        let open_trades = trades.len() - profits.len();

        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut total_wins = 0.0;
        let mut total_losses = 0.0;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for &p in &profits {
            if p > 0.0 {
                trades_won += 1;
                total_wins += p;
                largest_win = largest_win.max(p);
            } else if p < 0.0 {
                trades_lost += 1;
                total_losses += p;
                largest_loss = largest_loss.min(p);
            } else {
                trades_breakeven += 1;
            }
        }

        let closed_trades = profits.len();
        let win_rate = if closed_trades > 0 {
            trades_won as f64 / closed_trades as f64
        } else {
            0.0
        };
        let avg_profit_percent = if closed_trades > 0 {
            profits.iter().sum::<f64>() / closed_trades as f64
        } else {
            0.0
        };
        let avg_win = if trades_won > 0 {
            total_wins / trades_won as f64
        } else {
            0.0
        };
        let avg_loss = if trades_lost > 0 {
            total_losses / trades_lost as f64
        } else {
            0.0
        };

        TradeStats {
            closed_trades,
            open_trades,
            trades_won,
            trades_lost,
            trades_breakeven,
            win_rate,
            avg_profit_percent,
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
        }
    }
}
