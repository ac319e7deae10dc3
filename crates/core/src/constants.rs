// Coordination constants (no magic values)
use std::time::Duration;

/// Poll interval for tight worker loops (1ms)
pub const FAST_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Poll interval for slow, periodic workers (500ms)
pub const SLOW_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default bound on waiting for workers to drain during shutdown (5s)
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
