use product_api::infra::telemetry;
use product_api::transport;
use product_api::{Config, PgProductStore, ProductStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing()?;

    let config = Config::from_env()?;

    // --- Store Initialization ---
    tracing::info!(max_connections = config.max_connections, "connecting to database");
    let store = PgProductStore::connect(&config).await?;
    store.ensure_schema().await?;
    tracing::info!("Products table ready");

    // --- API Server Initialization ---
    let app = transport::http::create_app(transport::http::AppState::new(Arc::new(store)));
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "API server listening");
    tracing::info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
