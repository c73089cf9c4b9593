//! service-core: shared configuration, error, middleware and telemetry plumbing.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
