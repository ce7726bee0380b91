// src/handlers/history.rs
use log::info;
use warp::reply::Json;
use warp::Rejection;

use super::load_price_series;
use crate::models::{HistoryResponse, RangeQuery};
use crate::services::metrics;

pub async fn get_history(ticker: String, query: RangeQuery) -> Result<Json, Rejection> {
    info!(
        "Handling history request for {} ({} to {})",
        ticker, query.start, query.end
    );

    let bars = load_price_series(&ticker, query.start, query.end).await?;
    let derived = metrics::derive_metrics(&bars);
    let preview = bars.iter().take(5).cloned().collect();

    info!("Returning {} bars for {}", bars.len(), ticker);
    Ok(warp::reply::json(&HistoryResponse {
        ticker,
        preview,
        bars,
        derived,
    }))
}
