use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::task::JoinHandle;

use nextflix::{Ctx, app, config::AppConfig, logging, middleware::RateLimiter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = AppConfig::load().context("Failed to load configuration")?;

    // --- Tracing ---
    let _guard = logging::init(&config.log);

    let ip: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.server.host))?;
    let addr = SocketAddr::new(ip, config.server.port);

    // --- App state ---
    let ctx = Ctx::new(config).context("Failed to initialize movie provider")?;
    tracing::info!(
        provider = ctx.movies.provider_id(),
        prefix = %ctx.config.server.base_path(),
        cache_ttl_secs = ctx.config.cache.ttl.as_secs(),
        rate_limit = ctx.config.rate_limit.limit,
        "Loaded configuration"
    );

    let purge_handle = spawn_limiter_purge(Arc::clone(&ctx.rate_limiter));

    // --- Start server ---
    let app = app::build_router(ctx);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!(%addr, "Starting server");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    if let Some(handle) = purge_handle {
        handle.abort();
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Periodically forget clients that have been idle for a whole window
fn spawn_limiter_purge(limiter: Arc<RateLimiter>) -> Option<JoinHandle<()>> {
    let config = limiter.config();
    if !config.enabled() {
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.window.max(Duration::from_secs(1)));
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let purged = limiter.purge_idle();
            if purged > 0 {
                tracing::debug!(purged, "Purged idle rate-limit clients");
            }
        }
    }))
}

/// Wait for SIGINT or SIGTERM.
///
/// A handler that cannot be installed never resolves, leaving the other
/// signal in charge.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
