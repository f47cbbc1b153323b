//! Error types for the REST API server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::month_day::MonthDayError;
use crate::price_series::SeasonalError;
use crate::tickers::TickerListError;
use crate::yahoo_finance::DownloadError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// ISIN not present in the ticker reference list
    TickerNotFound(String),
    /// Neither the ISIN nor the fallback symbol returned price rows
    NoDataFound { isin: String, symbol: String },
    /// Too little price history to compute returns
    EmptySeries,
    /// Invalid parameter in request
    InvalidParameter(String),
    /// Invalid date range
    InvalidDateRange(String),
    /// Upstream data provider failure
    UpstreamError(String),
    /// Internal server error
    InternalError(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::TickerNotFound(isin) => write!(f, "Ticker not found: {}", isin),
            ApiError::NoDataFound { isin, symbol } => {
                write!(f, "No data found for ISIN {} or symbol {}", isin, symbol)
            }
            ApiError::EmptySeries => write!(f, "Insufficient price history"),
            ApiError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            ApiError::InvalidDateRange(msg) => write!(f, "Invalid date range: {}", msg),
            ApiError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::TickerNotFound(isin) => (
                StatusCode::NOT_FOUND,
                "TickerNotFound",
                format!("ISIN '{}' is not in the reference list", isin),
            ),
            ApiError::NoDataFound { isin, symbol } => (
                StatusCode::NOT_FOUND,
                "NoDataFound",
                format!(
                    "No price history for ISIN '{}' or symbol '{}'",
                    isin, symbol
                ),
            ),
            ApiError::EmptySeries => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EmptySeries",
                "Not enough price history to compute daily returns".to_string(),
            ),
            ApiError::InvalidParameter(msg) => {
                (StatusCode::BAD_REQUEST, "InvalidParameter", msg.clone())
            }
            ApiError::InvalidDateRange(msg) => {
                (StatusCode::BAD_REQUEST, "InvalidDateRange", msg.clone())
            }
            ApiError::UpstreamError(msg) => (
                StatusCode::BAD_GATEWAY,
                "UpstreamError",
                msg.clone(),
            ),
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalError",
                msg.clone(),
            ),
        };

        let body = Json(json!({
            "error": error_type,
            "message": message,
        }));

        (status, body).into_response()
    }
}

// Conversions from other error types

impl From<SeasonalError> for ApiError {
    fn from(err: SeasonalError) -> Self {
        match err {
            SeasonalError::EmptySeries => ApiError::EmptySeries,
            SeasonalError::UnsortedSeries { .. } => ApiError::UpstreamError(err.to_string()),
        }
    }
}

impl From<DownloadError> for ApiError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::NoDataFound { isin, symbol } => {
                ApiError::NoDataFound { isin, symbol }
            }
            DownloadError::InvalidDate(msg) => ApiError::InvalidDateRange(msg),
            DownloadError::NetworkError(_) | DownloadError::ApiError(_) | DownloadError::ParseError(_) => {
                ApiError::UpstreamError(err.to_string())
            }
            DownloadError::ClientCreation(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<TickerListError> for ApiError {
    fn from(err: TickerListError) -> Self {
        match err {
            TickerListError::UnknownIsin(isin) => ApiError::TickerNotFound(isin),
            _ => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<MonthDayError> for ApiError {
    fn from(err: MonthDayError) -> Self {
        ApiError::InvalidParameter(err.to_string())
    }
}

impl From<chrono::ParseError> for ApiError {
    fn from(err: chrono::ParseError) -> Self {
        ApiError::InvalidDateRange(format!("Date parse error: {}", err))
    }
}
