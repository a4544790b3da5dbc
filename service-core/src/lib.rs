//! service-core: Shared infrastructure for the gemini-gateway service.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
