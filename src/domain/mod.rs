//! Core domain types and logic.

pub mod analysis;
pub mod backtest;
pub mod error;
pub mod indicator;
pub mod indicator_helpers;
pub mod metrics;
pub mod position;
pub mod price;
pub mod screen;
pub mod settings;
pub mod snapshot;
pub mod strategy;
