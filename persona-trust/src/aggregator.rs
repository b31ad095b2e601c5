//! TrustAggregator: filter push-down to the rating store, then a strategy.

use std::sync::Arc;

use persona_core::config::TrustConfig;
use persona_core::errors::{PersonaResult, TrustError};
use persona_core::models::{RatingOrder, RatingQuery, TrustFilter, TrustQuery, TrustStrategy};
use persona_core::traits::IRatingStorage;
use persona_observability::events;

/// Computes a trust value from the rating events a filter selects.
pub struct TrustAggregator {
    ratings: Arc<dyn IRatingStorage>,
    config: TrustConfig,
}

impl TrustAggregator {
    /// Aggregator reading from `ratings`. Recency averages
    /// `config.recency_window` events.
    pub fn new(ratings: Arc<dyn IRatingStorage>, config: TrustConfig) -> Self {
        Self { ratings, config }
    }

    /// Evaluate a query. A missing strategy is an `InvalidStrategy` error.
    pub fn evaluate(&self, query: &TrustQuery) -> PersonaResult<f64> {
        self.aggregate(&query.filter, query.strategy)
    }

    /// Aggregate with a strategy given by name, e.g. `"RECENCY_BASED"`.
    pub fn aggregate_named(&self, filter: &TrustFilter, strategy: &str) -> PersonaResult<f64> {
        let strategy: TrustStrategy = strategy.parse()?;
        self.aggregate(filter, Some(strategy))
    }

    /// Aggregate the events matching `filter` with `strategy`.
    ///
    /// Fails with `InvalidStrategy` when no strategy is given and with
    /// `NoMatchingEvents` when the filter selects nothing.
    pub fn aggregate(
        &self,
        filter: &TrustFilter,
        strategy: Option<TrustStrategy>,
    ) -> PersonaResult<f64> {
        let strategy = strategy.ok_or_else(|| TrustError::InvalidStrategy {
            name: String::new(),
        })?;

        // Recency only ever looks at the newest few events.
        let query = match strategy {
            TrustStrategy::RecencyBased => {
                RatingQuery::new(filter.clone()).most_recent(self.config.recency_window.max(1))
            }
            _ => RatingQuery::new(filter.clone()),
        };
        let mut matched = self.ratings.find_ratings(&query)?;
        // Strategies take events in insertion order.
        if query.order == RatingOrder::MostRecentFirst {
            matched.reverse();
        }
        let value = crate::strategies::aggregate_ratings(
            &matched,
            strategy,
            self.config.recency_window,
        )?;

        events::trust_aggregated(strategy.as_str(), matched.len(), value);
        Ok(value)
    }
}
