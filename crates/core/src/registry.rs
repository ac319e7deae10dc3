// Live-worker registry: counted registrations with a wait-until-zero drain

use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Shared count of currently-running workers.
///
/// Handles are cheap clones over the same counter; one is constructed in the
/// composition root and passed to every runner and the controller. There is
/// no global instance.
#[derive(Clone)]
pub struct LiveWorkerRegistry {
    count: Arc<watch::Sender<usize>>,
}

impl LiveWorkerRegistry {
    pub fn new() -> Self {
        let (count, _) = watch::channel(0);
        Self {
            count: Arc::new(count),
        }
    }

    /// Number of workers currently registered.
    pub fn live_count(&self) -> usize {
        *self.count.borrow()
    }

    /// Register a worker. Deregistration happens when the returned guard is
    /// dropped, on every exit path out of the worker body.
    pub fn register(&self, name: &str) -> RegistrationGuard {
        self.count.send_modify(|count| *count += 1);
        debug!(worker = name, live = self.live_count(), "worker registered");
        RegistrationGuard {
            registry: self.clone(),
            name: name.to_string(),
        }
    }

    /// Wait until every registered worker has deregistered.
    ///
    /// This is a guarded predicate wait: it re-checks the count rather than
    /// trusting a wakeup, so it returns immediately when the count is already
    /// zero and cannot miss a zero-transition that raced the call.
    pub async fn await_all_deregistered(&self) {
        let mut rx = self.count.subscribe();
        // the registry itself keeps the sender alive, so this cannot error
        let _ = rx.wait_for(|&count| count == 0).await;
    }

    fn deregister(&self, name: &str) {
        self.count.send_modify(|count| {
            // driving the count negative is a coordination bug, never wrap
            *count = count
                .checked_sub(1)
                .unwrap_or_else(|| panic!("worker '{name}' deregistered without a matching registration"));
        });
        debug!(worker = name, live = self.live_count(), "worker deregistered");
    }
}

impl Default for LiveWorkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped registration: decrements the live count exactly once on drop,
/// including when the worker body panics and unwinds through it.
pub struct RegistrationGuard {
    registry: LiveWorkerRegistry,
    name: String,
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        self.registry.deregister(&self.name);
    }
}
