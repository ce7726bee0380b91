// src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily trading record. Dates in a series are ascending and unique;
/// numeric fields are passed through from upstream without validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Price bar plus computed fields. `ma20`/`ma50` are `None` until the
/// trailing window is full (first 19 and 49 rows respectively).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub date: NaiveDate,
    pub day_offset: i64,
    pub close: f64,
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub horizon_days: u32,
    pub predicted_close: f64,
}

impl Prediction {
    pub fn headline(&self) -> String {
        format!(
            "Predicted Price after {} days: ${:.2}",
            self.horizon_days, self.predicted_close
        )
    }
}

/// Date range common to both endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PredictionQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Defaults to 5 days when omitted; bounded to [1, 30].
    pub horizon: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub ticker: String,
    /// First 5 rows, for the data table widget.
    pub preview: Vec<PriceBar>,
    /// Full normalized series: close line, OHLC multi-series, volume bars.
    pub bars: Vec<PriceBar>,
    /// Derived series: close + MA20 + MA50 overlay.
    pub derived: Vec<DerivedRow>,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub ticker: String,
    pub horizon_days: u32,
    pub predicted_close: f64,
    pub headline: String,
}
