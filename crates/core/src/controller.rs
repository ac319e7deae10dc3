// Shutdown controller: signal cancellation, then wait for the drain

use std::time::Duration;
use tracing::{info, warn};

use crate::cancellation::CancellationSource;
use crate::error::{AppError, Result};
use crate::registry::LiveWorkerRegistry;

/// Orchestrates group shutdown: broadcast the stop signal, then block until
/// every live worker has deregistered.
pub struct ShutdownController {
    source: CancellationSource,
    registry: LiveWorkerRegistry,
    drain_timeout: Option<Duration>,
}

impl ShutdownController {
    pub fn new(source: CancellationSource, registry: LiveWorkerRegistry) -> Self {
        Self {
            source,
            registry,
            drain_timeout: None,
        }
    }

    /// Bound the drain wait. Without this the controller waits forever on a
    /// worker that never polls its token.
    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = Some(timeout);
        self
    }

    /// Signal cancellation and wait for all workers to exit.
    ///
    /// Consumes the controller: shutdown happens exactly once per run, there
    /// is no re-arming the signal. Workers that registered before the call
    /// are guaranteed to be waited for; the wait returns only after the last
    /// deregistration.
    pub async fn shutdown(self) -> Result<()> {
        info!(live = self.registry.live_count(), "signaling cancellation");
        self.source.signal();

        match self.drain_timeout {
            None => self.registry.await_all_deregistered().await,
            Some(limit) => {
                if tokio::time::timeout(limit, self.registry.await_all_deregistered())
                    .await
                    .is_err()
                {
                    let live = self.registry.live_count();
                    warn!(live, waited_ms = limit.as_millis() as u64, "drain timed out");
                    return Err(AppError::ShutdownTimedOut {
                        waited: limit,
                        live,
                    });
                }
            }
        }

        info!("all workers drained");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancellation::cancellation_channel;

    #[tokio::test]
    async fn shutdown_with_no_workers_completes() {
        let (source, _token) = cancellation_channel();
        let registry = LiveWorkerRegistry::new();

        let controller = ShutdownController::new(source, registry);
        controller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_waits_for_registered_workers() {
        let (source, mut token) = cancellation_channel();
        let registry = LiveWorkerRegistry::new();

        let guard = registry.register("straggler");
        let worker = tokio::spawn(async move {
            token.signaled().await;
            // linger after observing the signal before deregistering
            tokio::time::sleep(Duration::from_millis(50)).await;
            drop(guard);
        });

        let controller = ShutdownController::new(source, registry.clone());
        controller.shutdown().await.unwrap();

        assert_eq!(registry.live_count(), 0);
        worker.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn drain_timeout_reports_stalled_workers() {
        let (source, _token) = cancellation_channel();
        let registry = LiveWorkerRegistry::new();

        // never deregisters
        let _stuck = registry.register("stuck");

        let controller = ShutdownController::new(source, registry)
            .with_drain_timeout(Duration::from_millis(100));

        match controller.shutdown().await {
            Err(AppError::ShutdownTimedOut { live, .. }) => assert_eq!(live, 1),
            other => panic!("expected ShutdownTimedOut, got {other:?}"),
        }
    }
}
