//! Main entry point for the RateDesk backend.
//!
//! This file initializes the Axum web server, sets up the database
//! connection, and registers all API routes and middleware. Configuration
//! is loaded once here; an unreachable database aborts startup.

use backend::app;
use backend::config::Config;
use backend::database::Database;
use backend::services::market_data::MarketDataService;
use backend::utils::jwt::JwtUtils;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let db = Database::new(&config).await.unwrap();
    let jwt_utils = JwtUtils::new(&config);
    let market = MarketDataService::new(&config);

    let app = app(db.pool().clone(), jwt_utils, market);

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Starting RateDesk server on port {}", config.server_port);
    axum::serve(listener, app).await.unwrap();
}
