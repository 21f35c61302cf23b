//! CLI definition and dispatch.
//!
//! Every command reads market data from the CSV directory named in the
//! config file and prints its result as JSON on stdout.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{
    BacktestReport, StockAnalysis, analyze_symbol, backtest_symbol, load_series, trailing_window,
};
use crate::domain::error::QuantError;
use crate::domain::screen::{LowRsiHit, screen_low_rsi};
use crate::domain::settings::{Settings, build_settings, parse_codes};
use crate::domain::strategy::{SmaSignalPoint, compute_sma_signal};
use crate::logging::init_logging;
use crate::ports::data_port::MarketDataProvider;

#[derive(Parser, Debug)]
#[command(name = "quantdesk", about = "Stock indicator analysis and RSI backtesting")]
pub struct Cli {
    /// INI config file; built-in defaults apply when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug-level logging unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Trailing history window, ending today unless `--end` is given.
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    #[arg(long)]
    pub end: Option<NaiveDate>,
    #[arg(long)]
    pub days: Option<i64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API
    Serve {
        /// Overrides [web] listen
        #[arg(long)]
        listen: Option<String>,
    },
    /// MACD, RSI and RSI-strategy signals for one symbol
    Analyze {
        symbol: String,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// RSI strategy trades and summary statistics for one symbol
    Backtest {
        symbol: String,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// SMA crossover signal records for one symbol
    Signal {
        symbol: String,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Symbols whose latest RSI is below the threshold
    Screen {
        /// Comma-separated codes; overrides [screen] codes
        #[arg(long)]
        codes: Option<String>,
        #[arg(long)]
        threshold: Option<f64>,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Check the config file and print the resolved settings
    Validate,
}

pub fn run(cli: Cli) -> ExitCode {
    let settings = match load_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    init_logging(settings.log_format, cli.verbose);

    match dispatch(cli.command, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn dispatch(command: Command, settings: Settings) -> Result<(), QuantError> {
    let provider = CsvAdapter::new(settings.csv_dir.clone());

    match command {
        Command::Serve { listen } => run_serve(settings, listen),
        Command::Analyze { symbol, window } => {
            print_json(&run_analyze(&provider, &settings, &symbol, &window)?)
        }
        Command::Backtest { symbol, window } => {
            print_json(&run_backtest(&provider, &settings, &symbol, &window)?)
        }
        Command::Signal { symbol, window } => {
            print_json(&run_signal(&provider, &settings, &symbol, &window)?)
        }
        Command::Screen {
            codes,
            threshold,
            window,
        } => print_json(&run_screen(
            &provider,
            &settings,
            codes.as_deref(),
            threshold,
            &window,
        )?),
        Command::Validate => run_validate(&settings),
    }
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings, QuantError> {
    match path {
        Some(path) => build_settings(&FileConfigAdapter::from_file(path)?),
        None => Ok(Settings::default()),
    }
}

pub fn resolve_window(
    window: &WindowArgs,
    settings: &Settings,
) -> Result<(NaiveDate, NaiveDate), QuantError> {
    let days = window.days.unwrap_or(settings.history_days);
    let invalid_days = |reason: String| QuantError::ConfigInvalid {
        section: "cli".to_string(),
        key: "days".to_string(),
        reason,
    };
    if days < 1 {
        return Err(invalid_days("days must be at least 1".to_string()));
    }
    let end = window.end.unwrap_or_else(|| Local::now().date_naive());
    trailing_window(end, days).ok_or_else(|| invalid_days(format!("days out of range: {days}")))
}

pub fn run_analyze(
    provider: &dyn MarketDataProvider,
    settings: &Settings,
    symbol: &str,
    window: &WindowArgs,
) -> Result<StockAnalysis, QuantError> {
    let (start, end) = resolve_window(window, settings)?;
    analyze_symbol(
        provider,
        symbol,
        start,
        end,
        settings.rsi_window,
        &settings.strategy,
    )?
    .ok_or_else(|| no_data(symbol))
}

pub fn run_backtest(
    provider: &dyn MarketDataProvider,
    settings: &Settings,
    symbol: &str,
    window: &WindowArgs,
) -> Result<BacktestReport, QuantError> {
    let (start, end) = resolve_window(window, settings)?;
    backtest_symbol(
        provider,
        symbol,
        start,
        end,
        settings.rsi_window,
        &settings.strategy,
    )?
    .ok_or_else(|| no_data(symbol))
}

pub fn run_signal(
    provider: &dyn MarketDataProvider,
    settings: &Settings,
    symbol: &str,
    window: &WindowArgs,
) -> Result<Vec<SmaSignalPoint>, QuantError> {
    let (start, end) = resolve_window(window, settings)?;
    let series = load_series(provider, symbol, start, end)?.ok_or_else(|| no_data(symbol))?;
    Ok(compute_sma_signal(&series))
}

pub fn run_screen(
    provider: &dyn MarketDataProvider,
    settings: &Settings,
    codes_override: Option<&str>,
    threshold: Option<f64>,
    window: &WindowArgs,
) -> Result<Vec<LowRsiHit>, QuantError> {
    let (start, end) = resolve_window(window, settings)?;
    let codes = match codes_override {
        Some(raw) => parse_codes(raw)?,
        None => settings.screen_codes.clone(),
    };
    tracing::info!(codes = codes.len(), %start, %end, "screening for low RSI");
    Ok(screen_low_rsi(
        provider,
        codes.as_slice(),
        start,
        end,
        settings.rsi_window,
        threshold.unwrap_or(settings.screen_threshold),
    ))
}

fn run_validate(settings: &Settings) -> Result<(), QuantError> {
    println!("Configuration OK");
    println!("  csv_dir:          {}", settings.csv_dir.display());
    println!("  listen:           {}", settings.listen);
    println!(
        "  auth token:       {}",
        if settings.auth_token.is_some() { "set" } else { "not set" }
    );
    println!("  rsi_window:       {}", settings.rsi_window);
    println!("  history_days:     {}", settings.history_days);
    println!(
        "  strategy:         entry < {}, exit > {}, stop at {:.0}% of cost",
        settings.strategy.entry_below,
        settings.strategy.exit_above,
        settings.strategy.stop_loss_ratio * 100.0
    );
    println!("  snapshot ttl:     {}s", settings.snapshot_ttl.as_secs());
    println!(
        "  screen:           {} codes, threshold {}",
        settings.screen_codes.len(),
        settings.screen_threshold
    );
    Ok(())
}

fn run_serve(settings: Settings, listen: Option<String>) -> Result<(), QuantError> {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::sync::Arc;

        let addr = listen.unwrap_or_else(|| settings.listen.clone());
        if settings.auth_token.is_none() {
            tracing::warn!("no [auth] token configured; /api routes will reject every request");
        }
        let provider = Arc::new(CsvAdapter::new(settings.csv_dir.clone()));
        let router = build_router(AppState::new(provider, settings));

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, "listening");
            axum::serve(listener, router).await?;
            Ok::<(), QuantError>(())
        })
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = (settings, listen);
        Err(QuantError::ConfigInvalid {
            section: "web".to_string(),
            key: "listen".to_string(),
            reason: "built without the web feature".to_string(),
        })
    }
}

fn no_data(symbol: &str) -> QuantError {
    QuantError::NoData {
        symbol: symbol.to_string(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), QuantError> {
    let text = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    println!("{text}");
    Ok(())
}
