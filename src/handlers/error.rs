// src/handlers/error.rs
use std::fmt;
use warp::http::StatusCode;
use warp::reject::Reject;

/// Shown when the fetcher returns zero rows; matches the dashboard's
/// warning banner text.
pub const NO_DATA_MESSAGE: &str = "No data found! Please enter a valid stock symbol.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Fetcher returned zero rows for the ticker/date range.
    NoData,
    /// Too few observations for the regression to be defined.
    InsufficientData,
    BadRequest,
    Internal,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn no_data() -> Self {
        ApiError {
            kind: ApiErrorKind::NoData,
            message: NO_DATA_MESSAGE.to_string(),
        }
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::InsufficientData,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::BadRequest,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::Internal,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            ApiErrorKind::NoData => StatusCode::NOT_FOUND,
            ApiErrorKind::InsufficientData => StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ApiErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
