#![cfg(feature = "web")]
//! Web handler integration tests.
//!
//! Tests cover:
//! - Public routes: index, health, quotes, analysis, backtest, chart
//! - Token check on the /api routes
//! - Error bodies for unknown symbols, bad input and provider failures

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use quantdesk::adapters::web::{AppState, build_router};
use quantdesk::domain::settings::Settings;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use common::*;

const TOKEN: &str = "test-token";

fn settings() -> Settings {
    Settings {
        auth_token: Some(TOKEN.to_string()),
        rsi_window: 2,
        screen_codes: vec!["600519".into(), "000001".into(), "601318".into()],
        ..Settings::default()
    }
}

fn provider() -> MockDataPort {
    MockDataPort::new()
        .with_closes("600519", "2024-01-01", &[100.0, 101.0, 96.0, 99.0, 104.0])
        .with_closes("000001", "2024-01-01", &rising_closes(5, 10.0))
        .with_error("601318", "upstream timeout")
        .with_quote("600519", "Kweichow Moutai", 1700.0, 1.2)
        .with_quote("000001", "Ping An Bank", 10.5, -0.4)
}

fn create_test_app() -> Router {
    build_router(AppState::new(Arc::new(provider()), settings()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

mod public_routes {
    use super::*;

    #[tokio::test]
    async fn index_returns_welcome_text() {
        let (status, body) = get(create_test_app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Welcome to Quant Trading App");
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = get(create_test_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body), json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn stocks_lists_snapshot() {
        let (status, body) = get(create_test_app(), "/stocks").await;
        assert_eq!(status, StatusCode::OK);
        let quotes = json_body(&body);
        assert_eq!(quotes.as_array().unwrap().len(), 2);
        assert_eq!(quotes[0]["symbol"], "600519");
        assert_eq!(quotes[0]["name"], "Kweichow Moutai");
        assert_eq!(quotes[0]["last_price"], 1700.0);
    }

    #[tokio::test]
    async fn snapshot_is_cached_between_requests() {
        let provider = Arc::new(provider());
        let app = build_router(AppState::new(provider.clone(), settings()));

        let (status, _) = get(app.clone(), "/stocks").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get(app, "/stocks/000001").await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(provider.snapshot_calls(), 1);
    }

    #[tokio::test]
    async fn unknown_quote_is_404() {
        let (status, body) = get(create_test_app(), "/stocks/999999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json_body(&body)["error"].as_str().unwrap().contains("999999"));
    }

    #[tokio::test]
    async fn analysis_has_all_columns() {
        let (status, body) =
            get(create_test_app(), "/stocks/600519/analysis?end=2024-01-31").await;
        assert_eq!(status, StatusCode::OK);

        let analysis = json_body(&body);
        assert_eq!(analysis["symbol"], "600519");
        for key in ["kline", "volume", "macd", "macd_signal", "macd_diff", "rsi"] {
            assert_eq!(analysis[key].as_array().unwrap().len(), 5, "column {key}");
        }
        assert_eq!(analysis["kline"][0]["date"], "2024-01-01");
        assert_eq!(analysis["signals"][0]["exit_reason"], "overbought");
    }

    #[tokio::test]
    async fn analysis_without_history_is_404() {
        // the mock data sits outside this window
        let (status, _) = get(create_test_app(), "/stocks/600519/analysis?end=2023-06-30").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn backtest_returns_trades_and_stats() {
        let (status, body) =
            get(create_test_app(), "/stocks/600519/backtest?end=2024-01-31").await;
        assert_eq!(status, StatusCode::OK);

        let report = json_body(&body);
        assert_eq!(report["trades"].as_array().unwrap().len(), 1);
        assert_eq!(report["trades"][0]["sell_price"], 104.0);
        assert_eq!(report["stats"]["closed_trades"], 1);
    }

    #[tokio::test]
    async fn provider_failure_is_500_without_detail() {
        let (status, body) =
            get(create_test_app(), "/stocks/601318/backtest?end=2024-01-31").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(&body), json!({ "error": "Internal Server Error" }));
    }

    #[tokio::test]
    async fn bad_days_is_400() {
        let (status, _) = get(create_test_app(), "/stocks/600519/backtest?days=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn huge_days_is_400() {
        for uri in [
            "/stocks/600519/analysis?days=9223372036854775",
            "/stocks/600519/chart?end=2024-01-31&days=1000000000",
        ] {
            let (status, body) = get(create_test_app(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(json_body(&body)["error"].as_str().unwrap().contains("out of range"));
        }
    }

    #[tokio::test]
    async fn chart_is_svg() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/stocks/600519/chart?end=2024-01-31")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).starts_with("<svg"));
    }

    #[tokio::test]
    async fn unknown_route_is_404_json() {
        let (status, body) = get(create_test_app(), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_body(&body), json!({ "error": "Not Found" }));
    }
}

mod protected_routes {
    use super::*;

    fn execute_request(auth: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/execute_strategy")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn price_body(count: usize) -> Value {
        let points: Vec<Value> = points_from_closes("2024-01-01", &rising_closes(count, 10.0))
            .iter()
            .map(|p| json!({ "date": p.date.to_string(), "close": p.close }))
            .collect();
        Value::Array(points)
    }

    #[tokio::test]
    async fn missing_token_is_401() {
        let (status, body) = send(create_test_app(), execute_request(None, price_body(3))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(&body), json!({ "message": "Unauthorized" }));
    }

    #[tokio::test]
    async fn wrong_token_is_401() {
        let (status, _) = send(
            create_test_app(),
            execute_request(Some("Bearer wrong"), price_body(3)),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unconfigured_token_rejects_everything() {
        let settings = Settings {
            auth_token: None,
            ..settings()
        };
        let app = build_router(AppState::new(Arc::new(provider()), settings));
        let (status, _) = send(app, execute_request(Some(TOKEN), price_body(3))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn execute_strategy_returns_signals() {
        let (status, body) = send(
            create_test_app(),
            execute_request(Some(&format!("Bearer {TOKEN}")), price_body(60)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let signals = json_body(&body);
        let signals = signals.as_array().unwrap();
        assert_eq!(signals.len(), 60);
        assert!(signals[0]["position_delta"].is_null());
        assert!(signals[0]["sma_short"].is_null());
        // volume was omitted from the request body
        assert_eq!(signals[0]["volume"], 0);
        // rising prices: short SMA above long once both exist
        assert_eq!(signals[59]["signal"], 1);
    }

    #[tokio::test]
    async fn bare_token_is_accepted() {
        let (status, _) = send(create_test_app(), execute_request(Some(TOKEN), price_body(3))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn unordered_series_is_400() {
        let body = json!([
            { "date": "2024-01-02", "close": 10.0 },
            { "date": "2024-01-01", "close": 11.0 }
        ]);
        let (status, body) = send(create_test_app(), execute_request(Some(TOKEN), body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json_body(&body)["error"].as_str().unwrap().contains("invalid price series"));
    }

    #[tokio::test]
    async fn screen_requires_token_and_skips_failures() {
        let (status, _) = get(create_test_app(), "/api/screen/low_rsi").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri("/api/screen/low_rsi?end=2024-01-03")
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(create_test_app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body), json!([{ "code": "600519", "rsi": 17 }]));
    }
}
