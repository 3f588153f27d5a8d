//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, graceful shutdown)
//!     → middleware/origin.rs (origin gate, access log)
//!     → handlers.rs (root health probe, version info)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod server;

pub use handlers::ServiceInfo;
pub use server::{AppState, HttpServer, ServerError};
