pub mod error;
pub mod history;
pub mod prediction;

use chrono::NaiveDate;
use log::{error, info};
use warp::Rejection;

use crate::models::PriceBar;
use crate::services::{normalize, yahoo};
use self::error::ApiError;

/// Shared front half of the pipeline: fetch, empty-result check,
/// normalize, convert to typed bars. An empty fetch short-circuits with
/// the user-facing "no data" warning and skips everything downstream.
pub(crate) async fn load_price_series(
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PriceBar>, Rejection> {
    if start > end {
        return Err(warp::reject::custom(ApiError::bad_request(
            "start date must not be after end date",
        )));
    }

    let mut frame = yahoo::fetch_daily_history(ticker, start, end)
        .await
        .map_err(|e| {
            error!("Failed to fetch history for {}: {}", ticker, e);
            warp::reject::custom(ApiError::internal(e.to_string()))
        })?;

    if frame.is_empty() {
        info!("Empty result for {} ({} to {})", ticker, start, end);
        return Err(warp::reject::custom(ApiError::no_data()));
    }

    normalize::normalize_columns(&mut frame);
    normalize::to_price_bars(&frame).map_err(|e| {
        error!("Failed to shape price frame for {}: {}", ticker, e);
        warp::reject::custom(ApiError::internal(e.to_string()))
    })
}
