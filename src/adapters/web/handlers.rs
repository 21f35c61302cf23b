//! HTTP request handlers for the web adapter.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::adapters::chart_svg::render_price_chart;
use crate::domain::analysis::{
    BacktestReport, StockAnalysis, analyze_symbol, backtest_symbol, load_series, trailing_window,
};
use crate::domain::backtest::run_rsi_strategy;
use crate::domain::indicator::calculate_rsi;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::domain::screen::{self, LowRsiHit};
use crate::domain::snapshot::StockQuote;
use crate::domain::strategy::{SmaSignalPoint, compute_sma_signal};

use super::{AppState, WebError};

/// Optional overrides for the trailing history window.
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub end: Option<NaiveDate>,
    pub days: Option<i64>,
}

impl WindowQuery {
    fn resolve(&self, default_days: i64) -> Result<(NaiveDate, NaiveDate), WebError> {
        let days = self.days.unwrap_or(default_days);
        if days < 1 {
            return Err(WebError::bad_request("days must be at least 1"));
        }
        let end = self.end.unwrap_or_else(|| Local::now().date_naive());
        trailing_window(end, days)
            .ok_or_else(|| WebError::bad_request(format!("days out of range: {days}")))
    }
}

pub async fn index() -> &'static str {
    "Welcome to Quant Trading App"
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn execute_strategy(
    Json(points): Json<Vec<PricePoint>>,
) -> Result<Json<Vec<SmaSignalPoint>>, WebError> {
    let series = PriceSeries::new(points)?;
    tracing::info!(bars = series.len(), "executing SMA strategy");
    Ok(Json(compute_sma_signal(&series)))
}

pub async fn list_stocks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StockQuote>>, WebError> {
    let quotes = state
        .snapshot()
        .get_or_refresh(state.clock.as_ref(), state.provider.as_ref())?;
    Ok(Json(quotes))
}

pub async fn get_stock(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<StockQuote>, WebError> {
    let quote = state
        .snapshot()
        .lookup(&symbol, state.clock.as_ref(), state.provider.as_ref())?;
    quote
        .map(Json)
        .ok_or_else(|| WebError::not_found(format!("Stock not found: {symbol}")))
}

pub async fn stock_analysis(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(window): Query<WindowQuery>,
) -> Result<Json<StockAnalysis>, WebError> {
    let (start, end) = window.resolve(state.settings.history_days)?;
    let analysis = analyze_symbol(
        state.provider.as_ref(),
        &symbol,
        start,
        end,
        state.settings.rsi_window,
        &state.settings.strategy,
    )?;
    analysis
        .map(Json)
        .ok_or_else(|| WebError::not_found(format!("No data for {symbol}")))
}

pub async fn stock_backtest(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(window): Query<WindowQuery>,
) -> Result<Json<BacktestReport>, WebError> {
    let (start, end) = window.resolve(state.settings.history_days)?;
    let report = backtest_symbol(
        state.provider.as_ref(),
        &symbol,
        start,
        end,
        state.settings.rsi_window,
        &state.settings.strategy,
    )?;
    report
        .map(Json)
        .ok_or_else(|| WebError::not_found(format!("No data for {symbol}")))
}

pub async fn stock_chart(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(window): Query<WindowQuery>,
) -> Result<impl IntoResponse, WebError> {
    let (start, end) = window.resolve(state.settings.history_days)?;
    let series = load_series(state.provider.as_ref(), &symbol, start, end)?
        .ok_or_else(|| WebError::not_found(format!("No data for {symbol}")))?;

    let rsi = calculate_rsi(&series, state.settings.rsi_window);
    let trades = run_rsi_strategy(&series, &rsi, &state.settings.strategy)?;
    let svg = render_price_chart(&symbol, &series, &trades);

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

pub async fn screen_low_rsi(
    State(state): State<Arc<AppState>>,
    Query(window): Query<WindowQuery>,
) -> Result<Json<Vec<LowRsiHit>>, WebError> {
    let (start, end) = window.resolve(state.settings.history_days)?;
    let hits = screen::screen_low_rsi(
        state.provider.as_ref(),
        state.settings.screen_codes.as_slice(),
        start,
        end,
        state.settings.rsi_window,
        state.settings.screen_threshold,
    );
    Ok(Json(hits))
}

pub async fn not_found() -> WebError {
    WebError::not_found("Not Found")
}
