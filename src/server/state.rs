//! Shared application state for the API server

use crate::tickers::TickerList;
use crate::yahoo_finance::PriceDownloader;

/// Shared application state.
///
/// Holds only the immutable collaborators: the ticker reference list loaded
/// at startup and the price downloader. Analysis results are never cached
/// here; every request recomputes its pipeline from scratch.
pub struct AppState {
    /// Static ticker reference list
    pub tickers: TickerList,
    /// Yahoo Finance price history downloader
    pub downloader: PriceDownloader,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(tickers: TickerList, downloader: PriceDownloader) -> Self {
        AppState {
            tickers,
            downloader,
        }
    }
}
