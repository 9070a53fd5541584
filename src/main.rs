use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newswire::cache::ArticleCache;
use newswire::config::Config;
use newswire::fetcher::Fetcher;
use newswire::routes::{self, AppState};
use newswire::scheduler::RefreshScheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newswire=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::var("NEWSWIRE_CONFIG").unwrap_or_else(|_| "feeds.toml".to_string());
    let config = Config::load_or_default(&config_path)?.with_overrides(
        std::env::var("PORT").ok().as_deref(),
        std::env::var("POLL_INTERVAL_MS").ok().as_deref(),
    );
    info!(
        "Loaded {} feeds, refreshing every {} ms",
        config.feeds.len(),
        config.refresh_interval_ms
    );

    let cache = ArticleCache::new();
    let fetcher = Arc::new(Fetcher::new(
        config.feeds.clone(),
        cache.clone(),
        config.request_timeout(),
    )?);

    // Start background refresh task
    let scheduler = RefreshScheduler::start(fetcher, config.refresh_interval());

    let state = Arc::new(AppState { cache });
    let app = routes::router(state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    scheduler.stop().await;

    Ok(())
}
