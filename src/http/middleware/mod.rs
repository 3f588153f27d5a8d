//! Middleware applied to every request.

pub mod origin;

pub use origin::origin_gate;
