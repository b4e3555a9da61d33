use chore_tracker::{AppState, Config, Tracker, load_snapshot, router};
use std::time::Duration;
use tokio::fs;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let snapshot = load_snapshot(&config.data_path).await?;
    let state = AppState::new(config.data_path.clone(), Tracker::from_snapshot(snapshot));

    if let Err(err) = state.check_daily_reset().await {
        error!("startup reset could not be saved: {}", err.message);
    }
    tokio::spawn(reset_loop(state.clone(), config.reset_interval));

    let addr = config.addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn reset_loop(state: AppState, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    // The first tick completes immediately; startup already ran the check.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        if let Err(err) = state.check_daily_reset().await {
            error!("daily reset could not be saved: {}", err.message);
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
