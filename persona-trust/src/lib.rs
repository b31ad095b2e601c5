//! # persona-trust
//!
//! Reduces the rating events matching a [`TrustFilter`] to a single trust
//! score with one of five strategies, and records new rating events.
//!
//! [`TrustFilter`]: persona_core::models::TrustFilter

pub mod aggregator;
pub mod recorder;
pub mod strategies;

pub use aggregator::TrustAggregator;
pub use recorder::{validate_rating, RatingRecorder};
pub use strategies::aggregate_ratings;
