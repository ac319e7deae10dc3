// Quiesce Core - cooperative cancellation & graceful shutdown coordination
// NO runtime wiring here; the daemon crate is the composition root

pub mod cancellation;
pub mod constants;
pub mod controller;
pub mod error;
pub mod registry;
pub mod runner;

pub use cancellation::{cancellation_channel, CancellationSource, CancellationToken, WaitOutcome};
pub use controller::ShutdownController;
pub use error::{AppError, Result};
pub use registry::{LiveWorkerRegistry, RegistrationGuard};
pub use runner::{WorkerHandle, WorkerRunner};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
