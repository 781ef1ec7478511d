#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod api;
mod app;
mod config;
mod session;

use anyhow::Context;
use config::ServerConfig;
use speakercoach_core::AppCore;
use std::sync::Arc;
use std::time::Duration;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,speakercoach_server=debug".into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting SpeakerCoach server");

    let config = ServerConfig::load()?;
    let db_path = config
        .resolve_database_path()
        .context("Failed to determine SpeakerCoach database path")?;
    let core = Arc::new(
        AppCore::new(&db_path, config.core_config()).context("Failed to initialize app core")?,
    );

    let purge_core = core.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        // The first tick fires immediately and startup already purged.
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = purge_core.purge_expired_sessions() {
                tracing::warn!(error = %e, "Failed to purge expired sessions");
            }
        }
    });

    let app = app::router(core);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("SpeakerCoach running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await
        .context("Server error")?;

    Ok(())
}
