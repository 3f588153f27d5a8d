//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → CLI flag overrides (applied by the binary)
//!     → validation.rs (semantic checks on the merged result)
//!     → ServiceConfig (validated, immutable)
//!     → shared via Arc with the router and lifecycle
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults so a minimal (or absent) file works
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AccessConfig, LoggingConfig, RunMode, ServerConfig, ServiceConfig, TlsConfig};
pub use validation::{validate_config, ValidationError};
