//! Observability subsystem: structured logging over the tracing stack.

pub mod logging;

pub use logging::{init as init_logging, LoggingError};
