//! Daily price points and the validated price series the engines consume.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::QuantError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
    #[serde(default)]
    pub volume: i64,
}

/// Ordered daily history. Dates are strictly increasing and every close is finite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, QuantError> {
        for (i, point) in points.iter().enumerate() {
            if !point.close.is_finite() {
                return Err(QuantError::invalid_series(format!(
                    "non-finite close on {} (index {})",
                    point.date, i
                )));
            }
            if i > 0 && point.date <= points[i - 1].date {
                return Err(QuantError::invalid_series(format!(
                    "dates not strictly increasing at index {} ({} after {})",
                    i,
                    point.date,
                    points[i - 1].date
                )));
            }
        }
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Percent change of the last close over the one before it; 0 with fewer than two points.
    pub fn last_change_percent(&self) -> f64 {
        match self.points.as_slice() {
            [.., prev, last] if prev.close != 0.0 => (last.close - prev.close) / prev.close * 100.0,
            _ => 0.0,
        }
    }
}
