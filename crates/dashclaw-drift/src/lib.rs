//! # dashclaw-drift
//!
//! Statistical drift detection for agent behavior metrics. Compares a
//! recent window of metric values against a longer baseline period and
//! raises z-score-classified alerts when an agent's behavior shifts.
//!
//! The crate owns no storage. Metric values arrive through the injected
//! [`DriftStore`] capability and per-(agent, metric) checks run
//! concurrently against it.

#![deny(unsafe_code)]

pub mod baseline;
pub mod detector;
pub mod error;
pub mod stats;

pub use baseline::{compute_baseline, BaselineStats, DistributionBucket};
pub use detector::{DriftAlert, DriftConfig, DriftDetector, DriftMetric, DriftStore};
pub use error::DriftError;
pub use stats::{
    classify_severity, mean, percentile, stddev, z_score, DriftSeverity, SeverityThresholds,
};

/// Round to three decimal places, the precision used across drift outputs.
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
