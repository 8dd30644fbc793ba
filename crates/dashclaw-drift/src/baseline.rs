//! Baseline statistics over a period of metric observations.

use serde::{Deserialize, Serialize};

use crate::round3;
use crate::stats::{mean, percentile, stddev};

/// Minimum observations before a baseline is trusted.
pub const MIN_BASELINE_SAMPLES: usize = 5;

const BUCKET_COUNT: usize = 10;

/// One histogram bucket of the baseline distribution. The last bucket is
/// closed on both ends so the maximum value is counted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub low: f64,
    pub high: f64,
    pub count: usize,
}

/// Summary statistics of a baseline period, rounded to three decimals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaselineStats {
    pub sample_count: usize,
    pub mean: f64,
    pub stddev: f64,
    pub median: f64,
    pub p5: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
    pub min: f64,
    pub max: f64,
    pub distribution: Vec<DistributionBucket>,
}

/// Compute baseline statistics. Returns `None` under
/// [`MIN_BASELINE_SAMPLES`] observations rather than a baseline too noisy
/// to compare against.
pub fn compute_baseline(values: &[f64]) -> Option<BaselineStats> {
    if values.len() < MIN_BASELINE_SAMPLES {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let m = mean(&sorted);
    let min = round3(sorted[0]);
    let max = round3(sorted[sorted.len() - 1]);

    let range = if max - min == 0.0 { 1.0 } else { max - min };
    let bucket_size = range / BUCKET_COUNT as f64;
    let distribution = (0..BUCKET_COUNT)
        .map(|i| {
            let low = round3(min + i as f64 * bucket_size);
            let high = round3(min + (i + 1) as f64 * bucket_size);
            let last = i == BUCKET_COUNT - 1;
            let count = sorted
                .iter()
                .filter(|&&v| v >= low && if last { v <= high } else { v < high })
                .count();
            DistributionBucket { low, high, count }
        })
        .collect();

    Some(BaselineStats {
        sample_count: sorted.len(),
        mean: round3(m),
        stddev: round3(stddev(&sorted, m)),
        median: round3(percentile(&sorted, 50.0)),
        p5: round3(percentile(&sorted, 5.0)),
        p25: round3(percentile(&sorted, 25.0)),
        p75: round3(percentile(&sorted, 75.0)),
        p95: round3(percentile(&sorted, 95.0)),
        min,
        max,
        distribution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_samples_is_none() {
        assert!(compute_baseline(&[1.0, 2.0, 3.0, 4.0]).is_none());
        assert!(compute_baseline(&[]).is_none());
    }

    #[test]
    fn stats_over_a_simple_series() {
        let baseline = compute_baseline(&[10.0, 20.0, 30.0, 40.0, 50.0]).unwrap();
        assert_eq!(baseline.sample_count, 5);
        assert_eq!(baseline.mean, 30.0);
        assert_eq!(baseline.median, 30.0);
        assert_eq!(baseline.min, 10.0);
        assert_eq!(baseline.max, 50.0);
        // sample stddev of 10..50 step 10
        assert!((baseline.stddev - 15.811).abs() < 1e-9);
    }

    #[test]
    fn histogram_covers_the_range_and_counts_the_max() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0];
        let baseline = compute_baseline(&values).unwrap();
        assert_eq!(baseline.distribution.len(), 10);
        let total: usize = baseline.distribution.iter().map(|b| b.count).sum();
        assert_eq!(total, values.len());
        assert_eq!(baseline.distribution[9].count, 1);
        assert_eq!(baseline.distribution[0].low, 0.0);
        assert_eq!(baseline.distribution[9].high, 10.0);
    }

    #[test]
    fn constant_series_gets_a_unit_range_histogram() {
        let baseline = compute_baseline(&[7.0; 6]).unwrap();
        assert_eq!(baseline.stddev, 0.0);
        let total: usize = baseline.distribution.iter().map(|b| b.count).sum();
        assert_eq!(total, 6);
    }
}
