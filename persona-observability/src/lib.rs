//! # persona-observability
//!
//! Subscriber setup for the `tracing` ecosystem plus the named events the
//! other crates emit.

pub mod tracing_setup;

pub use tracing_setup::{events, init_tracing, init_tracing_from_config, try_init_tracing};
