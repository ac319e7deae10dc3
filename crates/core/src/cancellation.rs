// Cancellation signal: one publisher, many observers

use std::time::Duration;
use tokio::sync::watch;

/// Outcome of a bounded wait on a [`CancellationToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Cancellation was signaled before the timeout elapsed.
    Signaled,
    /// The timeout elapsed first.
    TimedOut,
}

impl WaitOutcome {
    pub fn is_signaled(self) -> bool {
        matches!(self, WaitOutcome::Signaled)
    }
}

/// Write side of the cancellation channel. Held by the shutdown controller;
/// deliberately not `Clone` so there is exactly one publisher.
pub struct CancellationSource {
    tx: watch::Sender<bool>,
}

impl CancellationSource {
    /// Signal cancellation to every observer.
    ///
    /// The transition is monotonic: calling this more than once is a no-op,
    /// never an error.
    pub fn signal(&self) {
        let _ = self.tx.send(true);
    }

    /// Check whether cancellation has been signaled.
    pub fn is_signaled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Hand out another observer for the same signal.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side handed to worker bodies. Level-triggered: once signaled, every
/// observer sees `Signaled` on every subsequent call, forever. There is no
/// consuming read, so polling repeatedly is always safe.
#[derive(Clone)]
pub struct CancellationToken {
    rx: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Non-blocking check, callable from any task any number of times.
    pub fn is_signaled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until cancellation is signaled. For `tokio::select!` arms.
    pub async fn signaled(&mut self) {
        // wait_for returns immediately once the value is already true
        let _ = self.rx.wait_for(|&signaled| signaled).await;
    }

    /// Wait up to `timeout` for cancellation, whichever comes first.
    ///
    /// A dropped publisher counts as signaled: workers must not keep
    /// spinning once the controller is gone.
    pub async fn wait_for(&mut self, timeout: Duration) -> WaitOutcome {
        match tokio::time::timeout(timeout, self.rx.wait_for(|&signaled| signaled)).await {
            Ok(_) => WaitOutcome::Signaled,
            Err(_) => WaitOutcome::TimedOut,
        }
    }
}

/// Create a connected source/token pair.
pub fn cancellation_channel() -> (CancellationSource, CancellationToken) {
    let (tx, rx) = watch::channel(false);
    (CancellationSource { tx }, CancellationToken { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsignaled_until_signal() {
        let (source, token) = cancellation_channel();
        assert!(!token.is_signaled());
        assert!(!source.is_signaled());

        source.signal();
        assert!(token.is_signaled());
        // level-triggered: the read never consumes the signal
        assert!(token.is_signaled());
    }

    #[test]
    fn signal_is_idempotent() {
        let (source, token) = cancellation_channel();
        source.signal();
        source.signal();
        assert!(token.is_signaled());
    }

    #[test]
    fn clones_observe_the_same_signal() {
        let (source, token) = cancellation_channel();
        let clone = token.clone();
        let late = source.token();

        source.signal();
        assert!(token.is_signaled());
        assert!(clone.is_signaled());
        assert!(late.is_signaled());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_times_out_when_unsignaled() {
        let (_source, mut token) = cancellation_channel();
        let outcome = token.wait_for(Duration::from_millis(10)).await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_observes_signal_repeatedly() {
        let (source, mut token) = cancellation_channel();
        source.signal();

        // every poll after the transition reports Signaled
        for _ in 0..3 {
            let outcome = token.wait_for(Duration::from_secs(1)).await;
            assert!(outcome.is_signaled());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_unblocks_on_signal_from_another_task() {
        let (source, mut token) = cancellation_channel();

        let waiter = tokio::spawn(async move {
            token.wait_for(Duration::from_secs(60)).await
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        source.signal();

        let outcome = waiter.await.unwrap();
        assert_eq!(outcome, WaitOutcome::Signaled);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_source_counts_as_signaled() {
        let (source, mut token) = cancellation_channel();
        drop(source);
        let outcome = token.wait_for(Duration::from_secs(1)).await;
        assert!(outcome.is_signaled());
    }
}
