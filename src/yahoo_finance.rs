use crate::price_series::PricePoint;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Configuration for the price history downloader
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Maximum number of retry attempts (default: 3)
    pub max_retries: u32,
    /// Rate limit: requests per second (default: 1.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        DownloaderConfig {
            max_retries: 3,
            requests_per_second: 1.0,
            timeout_seconds: 30,
        }
    }
}

/// Yahoo Finance price history downloader.
///
/// Downloads daily OHLCV history and reduces it to the date/close pairs the
/// seasonal pipeline consumes. Instruments are looked up by ISIN first and by
/// exchange symbol as a fallback, since Yahoo resolves some ISINs directly
/// and others only via the symbol.
#[derive(Debug)]
pub struct PriceDownloader {
    client: Client,
    config: DownloaderConfig,
}

impl PriceDownloader {
    /// Creates a new downloader with default configuration.
    ///
    /// # Errors
    /// Returns `DownloadError::ClientCreation` if the HTTP client cannot be
    /// built.
    pub fn new() -> Result<Self, DownloadError> {
        Self::with_config(DownloaderConfig::default())
    }

    /// Creates a new downloader with custom configuration.
    pub fn with_config(config: DownloaderConfig) -> Result<Self, DownloadError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DownloadError::ClientCreation(e.to_string()))?;

        Ok(PriceDownloader { client, config })
    }

    /// Fetches raw historical data CSV from the Yahoo Finance API.
    ///
    /// # Arguments
    /// * `identifier` - ISIN or exchange symbol (e.g. "US0378331005", "AAPL")
    /// * `start_date` - Start date for historical data (inclusive)
    /// * `end_date` - End date for historical data (inclusive)
    ///
    /// # Errors
    /// Returns `DownloadError` if the request fails, a network error occurs,
    /// or the response body cannot be read.
    pub async fn fetch_historical_data(
        &self,
        identifier: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<String, DownloadError> {
        // Yahoo Finance historical data endpoint:
        // https://query1.finance.yahoo.com/v7/finance/download/{symbol}?period1={start}&period2={end}&interval=1d&events=history
        let start_timestamp = start_date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| DownloadError::InvalidDate("Invalid start date".to_string()))?
            .and_utc()
            .timestamp();

        let end_timestamp = end_date
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| DownloadError::InvalidDate("Invalid end date".to_string()))?
            .and_utc()
            .timestamp();

        let url = format!(
            "https://query1.finance.yahoo.com/v7/finance/download/{}?period1={}&period2={}&interval=1d&events=history",
            identifier, start_timestamp, end_timestamp
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DownloadError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Yahoo answers 404 for identifiers it cannot resolve; the
            // fallback path treats that as "no rows" rather than a failure.
            if status.as_u16() == 404 {
                return Ok(String::new());
            }
            return Err(DownloadError::ApiError(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DownloadError::ParseError(e.to_string()))?;

        Ok(text)
    }

    /// Fetches and parses daily close prices for a single identifier.
    ///
    /// An identifier Yahoo does not know yields an empty vector, not an
    /// error, so callers can drive the fallback lookup.
    pub async fn fetch_daily_closes(
        &self,
        identifier: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, DownloadError> {
        let body = self
            .fetch_historical_data(identifier, start_date, end_date)
            .await?;
        parse_price_csv(&body)
    }

    /// Fetches daily closes by ISIN, falling back to the exchange symbol when
    /// the ISIN yields no rows.
    ///
    /// # Errors
    /// Returns `DownloadError::NoDataFound` when both identifiers come back
    /// empty.
    pub async fn fetch_with_fallback(
        &self,
        isin: &str,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, DownloadError> {
        let by_isin = self.fetch_daily_closes(isin, start_date, end_date).await?;
        if !by_isin.is_empty() {
            return Ok(by_isin);
        }

        tracing::debug!(isin, symbol, "No rows for ISIN, falling back to symbol");

        let by_symbol = self
            .fetch_daily_closes(symbol, start_date, end_date)
            .await?;
        if !by_symbol.is_empty() {
            return Ok(by_symbol);
        }

        Err(DownloadError::NoDataFound {
            isin: isin.to_string(),
            symbol: symbol.to_string(),
        })
    }

    /// Returns a reference to the HTTP client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }
}

// CSV row shape of the Yahoo v7 download endpoint. Close comes in as a
// string because Yahoo writes literal "null" for non-trading gaps.
#[derive(Debug, Deserialize)]
struct RawPriceRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Close")]
    close: String,
}

/// Parses a Yahoo historical-data CSV body into date/close pairs.
///
/// Rows with a "null" close are skipped; output is sorted ascending by date.
/// An empty body (unresolved identifier) parses to an empty vector.
pub fn parse_price_csv(body: &str) -> Result<Vec<PricePoint>, DownloadError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let mut points = Vec::new();

    for row in reader.deserialize::<RawPriceRow>() {
        let row = row.map_err(|e| DownloadError::ParseError(e.to_string()))?;
        if row.close == "null" {
            continue;
        }
        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
            .map_err(|e| DownloadError::ParseError(format!("Bad date '{}': {}", row.date, e)))?;
        let close = row
            .close
            .parse::<f64>()
            .map_err(|e| DownloadError::ParseError(format!("Bad close '{}': {}", row.close, e)))?;
        points.push(PricePoint::new(date, close));
    }

    points.sort_by_key(|p| p.date);
    Ok(points)
}

/// Errors that can occur during price history downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    /// HTTP client creation failed
    ClientCreation(String),
    /// Network error occurred
    NetworkError(String),
    /// API returned an error response
    ApiError(String),
    /// Failed to parse response data
    ParseError(String),
    /// Invalid date provided
    InvalidDate(String),
    /// Neither the ISIN nor the fallback symbol returned any rows
    NoDataFound { isin: String, symbol: String },
}

impl std::fmt::Display for DownloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadError::ClientCreation(msg) => write!(f, "Client creation error: {}", msg),
            DownloadError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DownloadError::ApiError(msg) => write!(f, "API error: {}", msg),
            DownloadError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DownloadError::InvalidDate(msg) => write!(f, "Invalid date: {}", msg),
            DownloadError::NoDataFound { isin, symbol } => {
                write!(f, "No data found for ISIN {} or symbol {}", isin, symbol)
            }
        }
    }
}

impl std::error::Error for DownloadError {}
