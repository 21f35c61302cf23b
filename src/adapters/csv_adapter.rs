//! CSV directory market data adapter.
//!
//! One file per symbol, `<dir>/<SYMBOL>.csv`, with a header row naming at
//! least `date` and `close`. `volume` is optional and any other columns are
//! ignored. An optional `<dir>/names.csv` (`symbol,name`) supplies display
//! names for snapshot quotes.

use crate::domain::error::QuantError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::domain::snapshot::StockQuote;
use crate::ports::data_port::MarketDataProvider;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

const NAMES_FILE: &str = "names.csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    date: NaiveDate,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NameRow {
    symbol: String,
    name: String,
}

impl CsvAdapter {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }

    /// All rows of a symbol file in date order. A missing file reads as empty,
    /// as does a symbol that is not a plain file stem.
    fn read_points(&self, symbol: &str) -> Result<Vec<PricePoint>, QuantError> {
        if !is_plain_symbol(symbol) {
            tracing::warn!(symbol, "rejecting symbol outside the data directory");
            return Ok(Vec::new());
        }
        let path = self.csv_path(symbol);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(symbol, path = %path.display(), "no csv file for symbol");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(QuantError::provider(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut points = Vec::new();

        for (line, result) in rdr.deserialize::<PriceRow>().enumerate() {
            let row = result.map_err(|e| {
                QuantError::provider(format!("{}: row {}: {}", path.display(), line + 2, e))
            })?;
            points.push(PricePoint {
                date: row.date,
                close: row.close,
                volume: row.volume.map(|v| v.round() as i64).unwrap_or(0),
            });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }

    fn read_names(&self) -> Result<HashMap<String, String>, QuantError> {
        let path = self.base_path.join(NAMES_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(QuantError::provider(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut names = HashMap::new();
        for result in rdr.deserialize::<NameRow>() {
            let row = result
                .map_err(|e| QuantError::provider(format!("{}: {}", path.display(), e)))?;
            names.insert(row.symbol, row.name);
        }
        Ok(names)
    }
}

/// ASCII letters, digits, `.` and `-` only, and never `..`.
fn is_plain_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && !symbol.contains("..")
        && symbol
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
}

impl MarketDataProvider for CsvAdapter {
    fn fetch_daily_history(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, QuantError> {
        let mut points = self.read_points(symbol)?;
        points.retain(|p| p.date >= start_date && p.date <= end_date);
        Ok(points)
    }

    fn fetch_snapshot(&self) -> Result<Vec<StockQuote>, QuantError> {
        let names = self.read_names()?;
        let mut quotes = Vec::new();

        for symbol in self.list_symbols()? {
            let series = match self.read_points(&symbol).and_then(PriceSeries::new) {
                Ok(series) => series,
                Err(e) => {
                    tracing::warn!(symbol, error = %e, "skipping symbol in snapshot");
                    continue;
                }
            };
            let Some(last) = series.last() else {
                continue;
            };
            quotes.push(StockQuote {
                name: names.get(&symbol).cloned().unwrap_or_else(|| symbol.clone()),
                last_price: last.close,
                change_percent: series.last_change_percent(),
                symbol,
            });
        }

        Ok(quotes)
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            QuantError::provider(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| QuantError::provider(format!("directory entry error: {}", e)))?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if name_str == NAMES_FILE {
                continue;
            }
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
