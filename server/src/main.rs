//! ecoactivate HTTP server: reads settings from the environment, prepares Postgres and S3, serves the API.

use ecoactivate::{
    app, create_pool, ensure_database_exists, ensure_schema, AppState, PgEventStore, S3BlobStore, Settings,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ecoactivate=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    ensure_database_exists(&settings.database_url).await?;
    let pool = create_pool(&settings).await?;
    ensure_schema(&pool).await?;

    let store = PgEventStore::new(pool);
    let blobs = S3BlobStore::from_settings(&settings.storage).await;
    let state = AppState::new(Arc::new(store), Arc::new(blobs));

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state, settings.max_upload_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
