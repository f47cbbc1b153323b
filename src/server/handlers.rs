//! HTTP request handlers for API endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;
use crate::month_day::MonthDay;
use crate::seasonal::{
    AnalysisConfig, CumulativeYearlyReturn, SeasonalAnalysis, SeasonalPoint, SelectionWindow,
    SummaryStats, YearlyReturn,
};
use crate::tickers::InstrumentType;

/// Health check endpoint
///
/// Returns a simple status response to verify the server is running
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}

// Ticker listing

/// Query parameters for the ticker listing endpoint
#[derive(Debug, Deserialize)]
pub struct TickersQueryParams {
    pub country: Option<String>,
    pub instrument_type: Option<String>,
}

/// Information about a single ticker
#[derive(Debug, Serialize)]
pub struct TickerInfo {
    pub country: String,
    pub company: String,
    pub isin: String,
    pub symbol: String,
    /// "Company | ISIN" picker label
    pub combined: String,
    pub instrument_type: InstrumentType,
}

/// Response for ticker listing
#[derive(Debug, Serialize)]
pub struct TickersResponse {
    pub tickers: Vec<TickerInfo>,
}

/// GET /tickers - List reference tickers, optionally filtered by country and
/// instrument type
pub async fn list_tickers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TickersQueryParams>,
) -> Result<Json<TickersResponse>, ApiError> {
    let instrument_type = params
        .instrument_type
        .as_deref()
        .map(|s| {
            InstrumentType::parse(s).ok_or_else(|| {
                ApiError::InvalidParameter(format!("Unknown instrument type: {}", s))
            })
        })
        .transpose()?;

    let tickers = state
        .tickers
        .filter(params.country.as_deref(), instrument_type)
        .into_iter()
        .map(|r| TickerInfo {
            country: r.country.clone(),
            company: r.company.clone(),
            isin: r.isin.clone(),
            symbol: r.symbol.clone(),
            combined: r.combined_label(),
            instrument_type: r.instrument_type(),
        })
        .collect();

    Ok(Json(TickersResponse { tickers }))
}

// Seasonal analysis

/// Query parameters for the seasonal analysis endpoint
#[derive(Debug, Deserialize)]
pub struct SeasonalQueryParams {
    /// First date to fetch, "YYYY-MM-DD" (default 1900-01-01)
    pub start: Option<String>,
    /// Last date to fetch, "YYYY-MM-DD" (default today)
    pub end: Option<String>,
    /// Comma-separated calendar years to exclude, e.g. "2008,2020"
    pub exclude: Option<String>,
    /// Selection window start, "MM-DD" (default 01-01)
    pub window_start: Option<String>,
    /// Selection window end, "MM-DD" (default 12-31)
    pub window_end: Option<String>,
}

/// The selection window as it appeared in the request
#[derive(Debug, Serialize)]
pub struct WindowInfo {
    pub start: String,
    pub end: String,
}

/// Response for the seasonal analysis endpoint
#[derive(Debug, Serialize)]
pub struct SeasonalResponse {
    pub isin: String,
    pub symbol: String,
    /// "Company | ISIN" display label
    pub label: String,
    /// Earliest date in the data actually used
    pub data_from: String,
    /// Latest date in the data actually used
    pub data_to: String,
    pub window: WindowInfo,
    pub excluded_years: Vec<i32>,
    /// Day-of-year average-return and growth curve, calendar ordered
    pub curve: Vec<SeasonalPoint>,
    pub min_growth: f64,
    pub max_growth: f64,
    /// Compounded pattern return per year, ascending
    pub yearly_returns: Vec<YearlyReturn>,
    /// Running sum of yearly pattern returns
    pub cumulative_yearly: Vec<CumulativeYearlyReturn>,
    pub summary: SummaryStats,
    /// Highest-returning years, for chart highlighting
    pub top_years: Vec<YearlyReturn>,
}

fn parse_excluded_years(raw: Option<&str>) -> Result<BTreeSet<i32>, ApiError> {
    let mut years = BTreeSet::new();
    if let Some(raw) = raw {
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let year = part.parse::<i32>().map_err(|_| {
                ApiError::InvalidParameter(format!("Invalid year in exclude list: '{}'", part))
            })?;
            years.insert(year);
        }
    }
    Ok(years)
}

fn parse_window(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<SelectionWindow, ApiError> {
    let start = match start {
        Some(s) => MonthDay::parse(s)?,
        None => MonthDay::first(),
    };
    let end = match end {
        Some(s) => MonthDay::parse(s)?,
        None => MonthDay::last(),
    };
    Ok(SelectionWindow::new(start, end))
}

/// GET /seasonal/{isin} - Download price history and run the full seasonal
/// analysis pipeline
///
/// Stateless: each request fetches and recomputes from scratch. The window
/// and exclusion parameters mirror the dashboard's brush and multiselect.
pub async fn get_seasonal_analysis(
    State(state): State<Arc<AppState>>,
    Path(isin): Path<String>,
    Query(params): Query<SeasonalQueryParams>,
) -> Result<Json<SeasonalResponse>, ApiError> {
    // Resolve the instrument first so an unknown ISIN never hits the network
    let record = state.tickers.resolve_isin(&isin)?.clone();

    let start_date = match &params.start {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| ApiError::InvalidDateRange(format!("Invalid start date: {}", e)))?,
        None => NaiveDate::from_ymd_opt(1900, 1, 1).expect("static date"),
    };
    let end_date = match &params.end {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| ApiError::InvalidDateRange(format!("Invalid end date: {}", e)))?,
        None => Utc::now().date_naive(),
    };

    if start_date > end_date {
        return Err(ApiError::InvalidDateRange(
            "Start date must be before or equal to end date".to_string(),
        ));
    }

    let excluded_years = parse_excluded_years(params.exclude.as_deref())?;
    let window = parse_window(params.window_start.as_deref(), params.window_end.as_deref())?;

    let prices = state
        .downloader
        .fetch_with_fallback(&record.isin, &record.symbol, start_date, end_date)
        .await?;

    tracing::debug!(
        isin = %record.isin,
        rows = prices.len(),
        "Fetched price history"
    );

    let config = AnalysisConfig {
        excluded_years: excluded_years.clone(),
        window,
        top_k: 3,
    };
    let analysis = SeasonalAnalysis::compute(&prices, &config)?;

    Ok(Json(SeasonalResponse {
        isin: record.isin.clone(),
        symbol: record.symbol.clone(),
        label: record.combined_label(),
        data_from: analysis.first_date.to_string(),
        data_to: analysis.last_date.to_string(),
        window: WindowInfo {
            start: window.start.to_string(),
            end: window.end.to_string(),
        },
        excluded_years: excluded_years.into_iter().collect(),
        min_growth: analysis.curve.min_growth,
        max_growth: analysis.curve.max_growth,
        curve: analysis.curve.points,
        yearly_returns: analysis.yearly_returns,
        cumulative_yearly: analysis.cumulative_yearly,
        summary: analysis.summary,
        top_years: analysis.top_years,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_excluded_years() {
        let years = parse_excluded_years(Some("2008, 2020,2022")).unwrap();
        assert_eq!(years.into_iter().collect::<Vec<_>>(), vec![2008, 2020, 2022]);
    }

    #[test]
    fn test_parse_excluded_years_empty_and_missing() {
        assert!(parse_excluded_years(None).unwrap().is_empty());
        assert!(parse_excluded_years(Some("")).unwrap().is_empty());
        assert!(parse_excluded_years(Some(" , ")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_excluded_years_invalid() {
        assert!(parse_excluded_years(Some("2008,soon")).is_err());
    }

    #[test]
    fn test_parse_window_defaults_to_full_year() {
        let window = parse_window(None, None).unwrap();
        assert_eq!(window, SelectionWindow::full_year());
    }

    #[test]
    fn test_parse_window_explicit_bounds() {
        let window = parse_window(Some("03-15"), Some("06-01")).unwrap();
        assert_eq!(window.start, MonthDay::new(3, 15).unwrap());
        assert_eq!(window.end, MonthDay::new(6, 1).unwrap());
    }

    #[test]
    fn test_parse_window_invalid_is_rejected() {
        assert!(parse_window(Some("13-01"), None).is_err());
        assert!(parse_window(None, Some("June 1")).is_err());
    }
}
