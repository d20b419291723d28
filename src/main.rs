use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crossmarket_backend::app;
use crossmarket_backend::config::{DatabaseConfig, ServerConfig};
use crossmarket_backend::external::mysql_source::MySqlSource;
use crossmarket_backend::logging::{init_logging, LoggingConfig};
use crossmarket_backend::services::data_loader::DataLoader;
use crossmarket_backend::services::market_service::MarketService;
use crossmarket_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(&LoggingConfig::from_env())?;

    let db_config = DatabaseConfig::from_env();
    db_config.validate().map_err(anyhow::Error::msg)?;
    let server_config = ServerConfig::from_env().map_err(anyhow::Error::msg)?;

    // Lazy pool: a database outage degrades requests instead of blocking startup.
    let source = MySqlSource::connect_lazy(&db_config)
        .context("Failed to configure MySQL data source")?;
    tracing::info!(
        "Using MySQL data source at {}:{}/{}",
        db_config.host,
        db_config.port,
        db_config.database
    );

    let loader = DataLoader::new(Arc::new(source));
    let state = AppState {
        market: MarketService::new(loader),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(server_config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", server_config.addr))?;
    tracing::info!("Cross-market backend running at http://{}/", server_config.addr);
    axum::serve(listener, app).await?;

    Ok(())
}
