//! Statistical primitives for drift detection. Pure functions, no I/O.

use serde::{Deserialize, Serialize};

/// Arithmetic mean. Empty input yields 0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator). Fewer than 2 samples
/// yields 0.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Linear-interpolated percentile over a sorted slice. `pct` is 0-100.
/// Empty input yields 0.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (pct / 100.0) * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * (idx - lo as f64)
}

/// How many baseline standard deviations the current mean sits from the
/// baseline mean. A flat baseline (stddev 0) yields 0 when the means
/// agree and the 999 sentinel when they do not, so any shift off a
/// perfectly stable baseline always classifies as critical.
pub fn z_score(current_mean: f64, baseline_mean: f64, baseline_stddev: f64) -> f64 {
    if baseline_stddev == 0.0 {
        if current_mean == baseline_mean {
            0.0
        } else {
            999.0
        }
    } else {
        (current_mean - baseline_mean) / baseline_stddev
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftSeverity {
    Info,
    Warning,
    Critical,
}

/// Z-score bands for severity classification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub info: f64,
    pub warning: f64,
    pub critical: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            info: 1.5,
            warning: 2.0,
            critical: 3.0,
        }
    }
}

impl SeverityThresholds {
    /// Classify an absolute z-score. Below the info band is not drift at
    /// all.
    pub fn classify(&self, abs_z: f64) -> Option<DriftSeverity> {
        if abs_z >= self.critical {
            Some(DriftSeverity::Critical)
        } else if abs_z >= self.warning {
            Some(DriftSeverity::Warning)
        } else if abs_z >= self.info {
            Some(DriftSeverity::Info)
        } else {
            None
        }
    }
}

/// Classify an absolute z-score with the default bands.
pub fn classify_severity(abs_z: f64) -> Option<DriftSeverity> {
    SeverityThresholds::default().classify(abs_z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_stddev_basics() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0, 6.0]), 4.0);
        assert_eq!(stddev(&[5.0], 5.0), 0.0);
        // sample stddev of [2,4,6] around 4 is 2
        assert_eq!(stddev(&[2.0, 4.0, 6.0], 4.0), 2.0);
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&sorted, 0.0), 10.0);
        assert_eq!(percentile(&sorted, 100.0), 40.0);
        assert_eq!(percentile(&sorted, 50.0), 25.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn flat_baseline_uses_the_sentinel() {
        assert_eq!(z_score(50.0, 50.0, 0.0), 0.0);
        assert_eq!(z_score(51.0, 50.0, 0.0), 999.0);
        assert_eq!(z_score(60.0, 50.0, 5.0), 2.0);
    }

    #[test]
    fn severity_bands() {
        assert_eq!(classify_severity(1.4), None);
        assert_eq!(classify_severity(1.5), Some(DriftSeverity::Info));
        assert_eq!(classify_severity(2.0), Some(DriftSeverity::Warning));
        assert_eq!(classify_severity(3.0), Some(DriftSeverity::Critical));
        assert_eq!(classify_severity(999.0), Some(DriftSeverity::Critical));
    }
}
