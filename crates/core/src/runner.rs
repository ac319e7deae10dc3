// Worker runner: supervised execution of one worker body

use std::future::Future;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::cancellation::CancellationToken;
use crate::error::{AppError, Result};
use crate::registry::LiveWorkerRegistry;

/// Wraps one worker body for supervised execution: registered with the
/// live-worker registry before the task starts, deregistered on every exit
/// path out of the body.
pub struct WorkerRunner {
    name: String,
    registry: LiveWorkerRegistry,
    token: CancellationToken,
}

impl WorkerRunner {
    pub fn new(
        name: impl Into<String>,
        registry: LiveWorkerRegistry,
        token: CancellationToken,
    ) -> Self {
        Self {
            name: name.into(),
            registry,
            token,
        }
    }

    /// Spawn the worker body on the runtime.
    ///
    /// Registration happens before the task is spawned, so a controller that
    /// signals cancellation immediately afterwards still waits for this
    /// worker. The guard lives inside the task: a body that returns, breaks
    /// out of its loop, or panics deregisters exactly once.
    pub fn spawn<F, Fut>(self, body: F) -> WorkerHandle
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let Self {
            name,
            registry,
            token,
        } = self;

        let guard = registry.register(&name);
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            let _guard = guard;
            info!(worker = %task_name, "worker started");

            let result = body(token).await;
            match &result {
                Ok(()) => info!(worker = %task_name, "worker stopped"),
                Err(e) => error!(worker = %task_name, error = %e, "worker failed"),
            }
            result
        });

        WorkerHandle { name, handle }
    }
}

/// Supervised handle to a spawned worker. Replaces fire-and-forget detached
/// tasks: completion is observable and failures have somewhere to go.
pub struct WorkerHandle {
    name: String,
    handle: JoinHandle<Result<()>>,
}

impl WorkerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Join the worker, surfacing body errors and panics.
    pub async fn join(self) -> Result<()> {
        match self.handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                let payload = join_err.into_panic();
                let message = if let Some(s) = payload.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                Err(AppError::WorkerPanicked {
                    worker: self.name,
                    message,
                })
            }
            Err(_) => Err(AppError::WorkerAborted { worker: self.name }),
        }
    }
}
