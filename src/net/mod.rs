//! Network-level helpers: TLS material loading for the listener.

pub mod tls;

pub use tls::load_tls_config;
