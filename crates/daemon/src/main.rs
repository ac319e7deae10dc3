//! Quiesce demo daemon.
//!
//! Composition root: wires four independent workers to one cancellation
//! channel and one live-worker registry, then waits for Ctrl+C and drives
//! the graceful shutdown sequence.

mod workers;

use anyhow::Result;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quiesce_core::constants::DEFAULT_DRAIN_TIMEOUT;
use quiesce_core::{
    cancellation_channel, LiveWorkerRegistry, ShutdownController, WorkerRunner,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("QUIESCE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("quiesce=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Quiesce v{} starting...", VERSION);

    // 2. Load configuration
    let drain_timeout = std::env::var("QUIESCE_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_DRAIN_TIMEOUT);

    // 3. Shared coordination state (injected, no globals)
    let registry = LiveWorkerRegistry::new();
    let (source, token) = cancellation_channel();

    // 4. Spawn workers
    info!("Starting workers...");
    let handles = vec![
        WorkerRunner::new("counting-up", registry.clone(), token.clone())
            .spawn(workers::counting_up),
        WorkerRunner::new("counting-down", registry.clone(), token.clone())
            .spawn(workers::counting_down),
        WorkerRunner::new("fruit-cycle", registry.clone(), token.clone())
            .spawn(workers::fruit_cycle),
        WorkerRunner::new("shrinking-story", registry.clone(), token.clone())
            .spawn(workers::shrinking_story),
    ];

    info!(workers = handles.len(), "All workers running");
    info!("Press Ctrl+C to shutdown");

    // 5. Wait for shutdown trigger
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Draining workers...");

    // 6. Graceful shutdown: signal, then wait for the registry to drain
    let controller = ShutdownController::new(source, registry).with_drain_timeout(drain_timeout);
    controller.shutdown().await?;

    // 7. Join worker handles so body failures are surfaced, not dropped
    for result in futures::future::join_all(handles.into_iter().map(|h| h.join())).await {
        if let Err(e) = result {
            error!(error = %e, "Worker finished with error");
        }
    }

    info!("Shutdown complete.");
    Ok(())
}
