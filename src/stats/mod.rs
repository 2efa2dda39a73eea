//! Statistical aggregation of latency samples

use crate::{
    error::{AppError, Result},
    models::metrics::{Percentile, RunSummary, SampleSet},
};

/// Percentile ranks reported for every run
pub const DECILES: [u8; 9] = [10, 20, 30, 40, 50, 60, 70, 80, 90];

/// Calculate a specific percentile of an ascending slice
///
/// The rank is `p / 100 * (n - 1)`; values between order statistics are
/// linearly interpolated. Returns 0.0 for an empty slice.
pub fn percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let index = (percentile / 100.0) * (sorted_values.len() as f64 - 1.0);
    let lower_index = index.floor() as usize;
    let upper_index = index.ceil() as usize;

    if lower_index == upper_index {
        sorted_values[lower_index]
    } else {
        let lower_value = sorted_values[lower_index];
        let upper_value = sorted_values[upper_index];
        let weight = index - lower_index as f64;
        lower_value + weight * (upper_value - lower_value)
    }
}

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Aggregate a sample set into a run summary
///
/// Fails with a statistics error when the set is empty; callers produce the
/// no-data outcome instead of calling this.
pub fn summarize(
    label: &str,
    url: &str,
    attempted: u32,
    samples: &SampleSet,
) -> Result<RunSummary> {
    if samples.is_empty() {
        return Err(AppError::statistics(format!(
            "No successful samples to aggregate for {}",
            label
        )));
    }

    let mut values = samples.seconds();
    let average = mean(&values);
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let percentiles = DECILES
        .iter()
        .map(|&rank| Percentile {
            rank,
            seconds: percentile(&values, rank as f64),
        })
        .collect();

    Ok(RunSummary {
        label: label.to_string(),
        url: url.to_string(),
        attempted,
        successful: samples.len() as u32,
        mean_secs: average,
        min_secs: values[0],
        max_secs: values[values.len() - 1],
        percentiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn set_of(millis: &[u64]) -> SampleSet {
        millis.iter().map(|&ms| Duration::from_millis(ms)).collect()
    }

    #[test]
    fn test_percentile_calculation() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

        assert_eq!(percentile(&values, 50.0), 5.5);
        assert!((percentile(&values, 90.0) - 9.1).abs() < 1e-9);
        assert_eq!(percentile(&values, 100.0), 10.0);
        assert_eq!(percentile(&values, 0.0), 1.0);
    }

    #[test]
    fn test_percentile_edge_cases() {
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(percentile(&[0.25], 10.0), 0.25);
        assert_eq!(percentile(&[0.25], 90.0), 0.25);
    }

    #[test]
    fn test_summarize_orders_unsorted_samples() {
        let summary = summarize("local", "http://127.0.0.1/", 5, &set_of(&[300, 100, 200])).unwrap();

        assert_eq!(summary.successful, 3);
        assert_eq!(summary.attempted, 5);
        assert!((summary.min_secs - 0.1).abs() < 1e-9);
        assert!((summary.max_secs - 0.3).abs() < 1e-9);
        assert!((summary.mean_secs - 0.2).abs() < 1e-9);
        assert_eq!(summary.percentiles.len(), DECILES.len());
        assert!((summary.percentile(50).unwrap() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_empty_is_error() {
        let result = summarize("local", "http://127.0.0.1/", 3, &SampleSet::new());
        assert!(matches!(result, Err(AppError::Statistics(_))));
    }

    proptest! {
        #[test]
        fn prop_percentiles_bounded_and_monotonic(millis in prop::collection::vec(1u64..5_000, 1..200)) {
            let summary = summarize("p", "http://p/", millis.len() as u32, &set_of(&millis)).unwrap();

            let mut previous = summary.min_secs;
            for p in &summary.percentiles {
                prop_assert!(p.seconds >= summary.min_secs - 1e-12);
                prop_assert!(p.seconds <= summary.max_secs + 1e-12);
                prop_assert!(p.seconds >= previous - 1e-12);
                previous = p.seconds;
            }
        }

        #[test]
        fn prop_mean_within_extrema(millis in prop::collection::vec(1u64..5_000, 1..200)) {
            let summary = summarize("p", "http://p/", millis.len() as u32, &set_of(&millis)).unwrap();

            prop_assert!(summary.mean_secs >= summary.min_secs - 1e-9);
            prop_assert!(summary.mean_secs <= summary.max_secs + 1e-9);
            prop_assert!(summary.successful <= summary.attempted);
        }
    }
}
