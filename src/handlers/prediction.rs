// src/handlers/prediction.rs
use log::{error, info};
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use super::load_price_series;
use crate::models::{PredictionQuery, PredictionResponse};
use crate::services::metrics;
use crate::services::predictor::{self, DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS};

pub async fn get_prediction(
    ticker: String,
    query: PredictionQuery,
) -> Result<Json, Rejection> {
    let horizon = query.horizon.unwrap_or(DEFAULT_HORIZON_DAYS);
    info!(
        "Handling prediction request for {} ({} to {}), horizon {} days",
        ticker, query.start, query.end, horizon
    );

    if !(1..=MAX_HORIZON_DAYS).contains(&horizon) {
        return Err(warp::reject::custom(ApiError::bad_request(format!(
            "horizon must be between 1 and {} days",
            MAX_HORIZON_DAYS
        ))));
    }

    let bars = load_price_series(&ticker, query.start, query.end).await?;
    let derived = metrics::derive_metrics(&bars);

    match predictor::predict_close(&derived, horizon) {
        Ok(prediction) => {
            let headline = prediction.headline();
            info!("{} for {}", headline, ticker);
            Ok(warp::reply::json(&PredictionResponse {
                ticker,
                horizon_days: prediction.horizon_days,
                predicted_close: prediction.predicted_close,
                headline,
            }))
        }
        Err(e) => {
            error!("Regression not attempted for {}: {}", ticker, e);
            Err(warp::reject::custom(ApiError::insufficient_data(
                e.to_string(),
            )))
        }
    }
}
