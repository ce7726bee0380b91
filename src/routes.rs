// src/routes.rs
use crate::handlers::{history::get_history, prediction::get_prediction};
use log::info;

use crate::handlers::error::ApiError;
use crate::models::{PredictionQuery, RangeQuery};
use std::convert::Infallible;
use warp::reject::Rejection;
use warp::{Filter, Reply};

// Recovery handling for our custom errors
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status();
        message = api_error.message.clone();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Invalid query parameters; expected start and end dates".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes() -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let history_route = warp::path!("api" / "v1" / "stocks" / String / "history")
        .and(warp::get())
        .and(warp::query::<RangeQuery>())
        .and_then(get_history);

    let prediction_route = warp::path!("api" / "v1" / "stocks" / String / "prediction")
        .and(warp::get())
        .and(warp::query::<PredictionQuery>())
        .and_then(get_prediction);

    info!("All routes configured successfully.");

    history_route
        .or(prediction_route)
        .recover(handle_rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::http::StatusCode;

    fn rejecting_filter(
        err: ApiError,
    ) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
        warp::any()
            .and_then(move || {
                let err = err.clone();
                async move { Err::<&'static str, Rejection>(warp::reject::custom(err)) }
            })
            .recover(handle_rejection)
    }

    #[tokio::test]
    async fn empty_result_maps_to_404_with_warning() {
        let filter = rejecting_filter(ApiError::no_data());
        let resp = warp::test::request().reply(&filter).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(
            body["error"],
            "No data found! Please enter a valid stock symbol."
        );
    }

    #[tokio::test]
    async fn insufficient_data_maps_to_422() {
        let filter = rejecting_filter(ApiError::insufficient_data("single-day range"));
        let resp = warp::test::request().reply(&filter).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn bad_request_maps_to_400() {
        let filter = rejecting_filter(ApiError::bad_request("horizon out of range"));
        let resp = warp::test::request().reply(&filter).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let api = routes();
        let resp = warp::test::request()
            .method("GET")
            .path("/api/v1/nope")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_query_dates_are_rejected_as_400() {
        let api = routes();
        let resp = warp::test::request()
            .method("GET")
            .path("/api/v1/stocks/AAPL/history")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
