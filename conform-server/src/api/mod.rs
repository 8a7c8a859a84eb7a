//! HTTP API: generation endpoint and health check.

pub mod generate;
pub mod types;
