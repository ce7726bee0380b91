// src/services/normalize.rs
use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use crate::models::PriceBar;

pub const CANONICAL_FIELDS: [&str; 5] = ["Open", "High", "Low", "Close", "Volume"];

/// Column label as the fetcher reports it. Upstream groups columns per
/// ticker, so a logical field may carry a second-level ticker label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLabel {
    pub field: String,
    pub sublevel: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub label: ColumnLabel,
    pub values: Vec<f64>,
}

/// Un-normalized table straight from the fetcher: a shared date index
/// plus one column per logical field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrame {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<RawColumn>,
}

impl RawFrame {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Collapse compound column labels to their first level, discarding the
/// ticker sublevel. Already-flat frames pass through unchanged, so
/// normalizing twice equals normalizing once.
pub fn normalize_columns(frame: &mut RawFrame) {
    for column in &mut frame.columns {
        column.label.sublevel = None;
    }
}

/// Convert a normalized frame into typed price bars. Every canonical
/// field must be present and as long as the date index.
pub fn to_price_bars(frame: &RawFrame) -> Result<Vec<PriceBar>> {
    let column = |field: &str| -> Result<&[f64]> {
        let col = frame
            .columns
            .iter()
            .find(|c| c.label.field == field)
            .ok_or_else(|| anyhow!("Missing '{}' column in price frame", field))?;
        if col.values.len() != frame.dates.len() {
            return Err(anyhow!(
                "'{}' column has {} values for {} dates",
                field,
                col.values.len(),
                frame.dates.len()
            ));
        }
        Ok(&col.values)
    };

    let open = column("Open")?;
    let high = column("High")?;
    let low = column("Low")?;
    let close = column("Close")?;
    let volume = column("Volume")?;

    Ok(frame
        .dates
        .iter()
        .enumerate()
        .map(|(i, date)| PriceBar {
            date: *date,
            open: open[i],
            high: high[i],
            low: low[i],
            close: close[i],
            volume: volume[i] as u64,
        })
        .collect())
}
