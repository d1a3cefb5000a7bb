use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use movie_rec_api::{
    artifacts::Artifacts,
    cache::{create_redis_client, Cache},
    config::Config,
    routes::{create_router, AppState},
    services::providers::TmdbProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let artifacts = Artifacts::load(&config.data_dir)
        .with_context(|| format!("Failed to load artifacts from {}", config.data_dir.display()))?;

    let mut provider = TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_base_url.clone(),
    )?;

    let mut cache_handle = None;
    if let Some(redis_url) = &config.redis_url {
        let (cache, handle) = Cache::new(create_redis_client(redis_url)?);
        provider = provider.with_cache(cache, config.poster_cache_ttl);
        cache_handle = Some(handle);
        tracing::info!("Poster cache enabled");
    }

    let state = AppState::new(artifacts, Arc::new(provider));
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
