use std::sync::Arc;

use marketplace_recs::{
    config::{CacheBackend, Config},
    db::{self, redis::cache::CacheWriterHandle, CatalogStore, RecommendationCache},
    routes::{create_router, AppState},
    services::{EngineSettings, RecommendationEngine},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("marketplace_recs=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    if config.run_migrations {
        db::postgres::run_migrations(&pool).await?;
        tracing::info!("Development schema applied");
    }
    let store: Arc<dyn CatalogStore> = Arc::new(db::PgCatalogStore::new(pool));

    let (cache, writer): (Arc<dyn RecommendationCache>, Option<CacheWriterHandle>) =
        match config.cache_backend {
            CacheBackend::Redis => {
                let client = db::create_redis_client(&config.redis_url)?;
                let (cache, writer) = db::Cache::new(client);
                (Arc::new(cache), Some(writer))
            }
            CacheBackend::Memory => (
                Arc::new(db::MemoryCache::new(config.memory_cache_capacity)),
                None,
            ),
        };

    let engine = RecommendationEngine::new(store, cache, EngineSettings::from(&config));
    let state = Arc::new(AppState::new(engine, config.max_limit));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(writer) = writer {
        writer.shutdown().await;
    }
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
