//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGQUIT → status log, keep serving
//!     SIGINT/SIGTERM → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger observed → stop accepting → drain connections
//!     → exceed SHUTDOWN_DEADLINE → fatal
//! ```
//!
//! # Design Decisions
//! - Signal registration happens before the listener starts (fail fast)
//! - The drain deadline is fixed, not configurable; exceeding it is fatal

use std::time::Duration;

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::Signals;

/// How long in-flight connections get to finish after shutdown is requested.
pub const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(5);
