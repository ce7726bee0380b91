// src/services/predictor.rs
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::fmt;

use crate::models::{DerivedRow, Prediction};

/// Fixed shuffle seed so repeated fits on identical input produce
/// identical splits and therefore bit-identical predictions.
pub const SPLIT_SEED: u64 = 42;

pub const DEFAULT_HORIZON_DAYS: u32 = 5;
pub const MAX_HORIZON_DAYS: u32 = 30;

const TEST_FRACTION: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictorError {
    InsufficientData,
}

impl fmt::Display for PredictorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PredictorError::InsufficientData => write!(
                f,
                "Not enough trading data to fit a trend; need at least 2 distinct days"
            ),
        }
    }
}

impl std::error::Error for PredictorError {}

/// Ordinary least-squares line of close price against day offset.
#[derive(Debug, Clone)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
    pub max_offset: i64,
    /// Root-mean-square residual on the held-out 20%, when one exists.
    /// Logged for diagnostics, not surfaced in the API payload.
    pub holdout_rmse: Option<f64>,
}

impl TrendModel {
    pub fn extrapolate(&self, target_offset: f64) -> f64 {
        self.slope * target_offset + self.intercept
    }
}

/// Fit the trend on a reproducible 80/20 train/holdout split of the
/// derived series.
pub fn fit_trend(rows: &[DerivedRow]) -> Result<TrendModel, PredictorError> {
    let distinct_offsets: BTreeSet<i64> = rows.iter().map(|r| r.day_offset).collect();
    if distinct_offsets.len() < 2 {
        return Err(PredictorError::InsufficientData);
    }

    let pairs: Vec<(f64, f64)> = rows
        .iter()
        .map(|r| (r.day_offset as f64, r.close))
        .collect();

    let mut indices: Vec<usize> = (0..pairs.len()).collect();
    let mut rng = StdRng::seed_from_u64(SPLIT_SEED);
    indices.shuffle(&mut rng);

    // test_size = 0.2, rounded up, but training keeps at least 2 rows
    // so the fit never degenerates on short series
    let test_len = ((pairs.len() as f64) * TEST_FRACTION).ceil() as usize;
    let test_len = test_len.min(pairs.len() - 2);
    let (test_idx, train_idx) = indices.split_at(test_len);

    let n = train_idx.len() as f64;
    let x_mean = train_idx.iter().map(|&i| pairs[i].0).sum::<f64>() / n;
    let y_mean = train_idx.iter().map(|&i| pairs[i].1).sum::<f64>() / n;

    let mut num = 0.0;
    let mut den = 0.0;
    for &i in train_idx {
        let (x, y) = pairs[i];
        num += (x - x_mean) * (y - y_mean);
        den += (x - x_mean) * (x - x_mean);
    }
    if den.abs() < 1e-12 {
        return Err(PredictorError::InsufficientData);
    }

    let slope = num / den;
    let intercept = y_mean - slope * x_mean;

    let holdout_rmse = if test_idx.is_empty() {
        None
    } else {
        let sse: f64 = test_idx
            .iter()
            .map(|&i| {
                let (x, y) = pairs[i];
                let residual = y - (slope * x + intercept);
                residual * residual
            })
            .sum();
        Some((sse / test_idx.len() as f64).sqrt())
    };

    if let Some(rmse) = holdout_rmse {
        debug!(
            "Fitted trend: slope={:.6}, intercept={:.6}, holdout RMSE={:.4} ({} held out)",
            slope,
            intercept,
            rmse,
            test_idx.len()
        );
    }

    Ok(TrendModel {
        slope,
        intercept,
        max_offset: rows.iter().map(|r| r.day_offset).max().unwrap_or(0),
        holdout_rmse,
    })
}

/// Fit and extrapolate `horizon_days` past the last observed day.
pub fn predict_close(
    rows: &[DerivedRow],
    horizon_days: u32,
) -> Result<Prediction, PredictorError> {
    let model = fit_trend(rows)?;
    let target_offset = (model.max_offset + horizon_days as i64) as f64;

    Ok(Prediction {
        horizon_days,
        predicted_close: model.extrapolate(target_offset),
    })
}
