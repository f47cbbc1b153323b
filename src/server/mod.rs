//! REST API server for the seasonal analysis dashboard

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use state::AppState;

use crate::tickers::TickerList;
use crate::yahoo_finance::PriceDownloader;
use std::sync::Arc;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address (default: "127.0.0.1")
    pub host: String,
    /// Server port (default: 3000)
    pub port: u16,
    /// Path to the ticker reference list CSV
    pub tickers_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            tickers_path: "all_stocks.csv".to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a new server configuration
    pub fn new(host: impl Into<String>, port: u16, tickers_path: impl Into<String>) -> Self {
        ServerConfig {
            host: host.into(),
            port,
            tickers_path: tickers_path.into(),
        }
    }
}

/// Runs the API server
///
/// # Arguments
/// * `config` - Server configuration
///
/// # Returns
/// Returns an error if the ticker list cannot be loaded or the server fails
/// to start
///
/// # Example
/// ```rust,no_run
/// use pulse::server::{run_server, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ServerConfig::default();
///     run_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    // Load the ticker reference list once at startup
    let tickers = TickerList::load_csv(&config.tickers_path)?;
    tracing::info!(
        count = tickers.len(),
        path = %config.tickers_path,
        "Loaded ticker reference list"
    );

    let downloader = PriceDownloader::new()?;

    // Create application state
    let state = Arc::new(AppState::new(tickers, downloader));

    // Create router
    let app = routes::create_router(state);

    // Build server address
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    // Run server
    axum::serve(listener, app).await?;

    Ok(())
}
