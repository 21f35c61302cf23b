//! Market snapshot quotes and their time-to-live cache.
//!
//! The cache is an explicit value owned by whoever serves quotes (the web
//! state); expiry is judged against an injected [`Clock`].

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::domain::error::QuantError;
use crate::ports::clock_port::Clock;
use crate::ports::data_port::MarketDataProvider;

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub symbol: String,
    pub name: String,
    pub last_price: f64,
    pub change_percent: f64,
}

#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    entry: Option<(Instant, Vec<StockQuote>)>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        match &self.entry {
            Some((fetched_at, _)) => now.saturating_duration_since(*fetched_at) < self.ttl,
            None => false,
        }
    }

    /// Cached quotes while fresh, otherwise a new fetch. A failed fetch leaves
    /// the previous entry untouched.
    pub fn get_or_refresh(
        &mut self,
        clock: &dyn Clock,
        provider: &dyn MarketDataProvider,
    ) -> Result<Vec<StockQuote>, QuantError> {
        let now = clock.now();
        if self.is_fresh(now) {
            if let Some((_, quotes)) = &self.entry {
                return Ok(quotes.clone());
            }
        }

        let quotes = provider.fetch_snapshot()?;
        tracing::debug!(quotes = quotes.len(), "snapshot refreshed");
        self.entry = Some((now, quotes.clone()));
        Ok(quotes)
    }

    pub fn lookup(
        &mut self,
        symbol: &str,
        clock: &dyn Clock,
        provider: &dyn MarketDataProvider,
    ) -> Result<Option<StockQuote>, QuantError> {
        let quotes = self.get_or_refresh(clock, provider)?;
        Ok(quotes.into_iter().find(|q| q.symbol == symbol))
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
