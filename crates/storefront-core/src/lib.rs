//! Cross-service plumbing: configuration loading, tracing, HTTP middleware,
//! health probes and shared serde helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
