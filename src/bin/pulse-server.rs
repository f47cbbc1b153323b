//! Seasonal Analysis API Server Binary
//!
//! Run with: `cargo run --bin pulse-server`

use pulse::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Note: Tracing is initialized in run_server()
    // Set RUST_LOG environment variable to control log level:
    //   RUST_LOG=debug cargo run --bin pulse-server

    // Create configuration from environment variables or defaults
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or(3000);
    let tickers_path =
        std::env::var("TICKERS_CSV").unwrap_or_else(|_| "all_stocks.csv".to_string());

    let config = ServerConfig::new(host, port, tickers_path);

    println!("Starting Pulse seasonal analysis server...");
    println!("   Host: {}", config.host);
    println!("   Port: {}", config.port);
    println!("   Tickers: {}", config.tickers_path);
    println!();
    println!(
        "Server will be available at: http://{}:{}",
        config.host, config.port
    );
    println!();
    println!("Available endpoints:");
    println!("  GET  /health           - Health check");
    println!("  GET  /tickers          - Ticker reference list");
    println!("  GET  /seasonal/:isin   - Seasonal pattern analysis");
    println!();

    // Run server
    run_server(config).await?;

    Ok(())
}
