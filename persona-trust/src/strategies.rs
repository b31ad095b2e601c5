//! Aggregation strategies.
//!
//! - MAXIMUM / MINIMUM / AVERAGE: the usual reductions over every rating
//! - MEDIAN: the lower median; for an even count, sorted index `n/2 - 1`
//! - RECENCY_BASED: mean of the `window` most recently reported ratings

use std::cmp::Reverse;

use persona_core::errors::TrustError;
use persona_core::models::{RatingEvent, TrustStrategy};

/// Reduce `events` with `strategy`. Fails on an empty set.
///
/// `events` are expected in insertion order. For RECENCY_BASED, equal
/// report times favour the later inserted event, whatever order the report
/// times themselves come in.
pub fn aggregate_ratings(
    events: &[RatingEvent],
    strategy: TrustStrategy,
    recency_window: usize,
) -> Result<f64, TrustError> {
    if events.is_empty() {
        return Err(TrustError::NoMatchingEvents);
    }
    let ratings = || events.iter().map(|e| e.rating);

    let value = match strategy {
        TrustStrategy::Maximum => ratings().fold(f64::NEG_INFINITY, f64::max),
        TrustStrategy::Minimum => ratings().fold(f64::INFINITY, f64::min),
        TrustStrategy::Average => mean(ratings()),
        TrustStrategy::Median => {
            let mut sorted: Vec<f64> = ratings().collect();
            sorted.sort_by(f64::total_cmp);
            sorted[(sorted.len() - 1) / 2]
        }
        TrustStrategy::RecencyBased => {
            let mut recent: Vec<(usize, &RatingEvent)> = events.iter().enumerate().collect();
            recent.sort_unstable_by_key(|(position, e)| Reverse((e.report_time, *position)));
            let window = recency_window.max(1).min(recent.len());
            mean(recent[..window].iter().map(|(_, e)| e.rating))
        }
    };
    Ok(value)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    sum / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(ratings: &[f64]) -> Vec<RatingEvent> {
        ratings
            .iter()
            .enumerate()
            .map(|(i, r)| RatingEvent::new("s", "t", *r).at(i as i64))
            .collect()
    }

    #[test]
    fn empty_set_has_no_matching_events() {
        for strategy in TrustStrategy::ALL {
            assert!(matches!(
                aggregate_ratings(&[], strategy, 5),
                Err(TrustError::NoMatchingEvents)
            ));
        }
    }

    #[test]
    fn median_odd_is_middle() {
        let e = events(&[1.0, 0.0, 0.75, 0.25, 0.5]);
        assert_eq!(aggregate_ratings(&e, TrustStrategy::Median, 5).unwrap(), 0.5);
    }

    #[test]
    fn median_even_is_lower_central() {
        let e = events(&[0.0, 0.25, 0.75, 1.0]);
        assert_eq!(aggregate_ratings(&e, TrustStrategy::Median, 5).unwrap(), 0.25);
    }

    #[test]
    fn single_event_is_every_strategy() {
        let e = events(&[0.3]);
        for strategy in TrustStrategy::ALL {
            assert_eq!(aggregate_ratings(&e, strategy, 5).unwrap(), 0.3);
        }
    }

    #[test]
    fn recency_ties_prefer_later_events() {
        let e = vec![
            RatingEvent::new("s", "t", 0.0).at(10),
            RatingEvent::new("s", "t", 1.0).at(10),
        ];
        assert_eq!(aggregate_ratings(&e, TrustStrategy::RecencyBased, 1).unwrap(), 1.0);
    }

    #[test]
    fn recency_ties_inside_a_larger_set_keep_the_newest_insertions() {
        let e = vec![
            RatingEvent::new("s", "t", 0.9).at(30),
            RatingEvent::new("s", "t", 0.0).at(10),
            RatingEvent::new("s", "t", 0.5).at(10),
            RatingEvent::new("s", "t", 1.0).at(10),
        ];
        let value = aggregate_ratings(&e, TrustStrategy::RecencyBased, 3).unwrap();
        assert!((value - 0.8).abs() < 1e-12);
    }

    #[test]
    fn recency_window_larger_than_set_uses_all() {
        let e = events(&[0.2, 0.4]);
        let value = aggregate_ratings(&e, TrustStrategy::RecencyBased, 5).unwrap();
        assert!((value - 0.3).abs() < 1e-12);
    }
}
