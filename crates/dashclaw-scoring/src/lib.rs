//! # dashclaw-scoring
//!
//! Weighted multi-dimension scoring with user-defined quality profiles,
//! automatic risk templates, and statistical auto-calibration.
//!
//! Zero LLM dependencies; all scoring is rule-based math. The engine never
//! performs I/O: callers fetch action records and persist results.
//!
//! Scoring degrades instead of failing. Missing data becomes a `no_data`
//! dimension result, malformed user expressions become `None` plus an
//! error message on the affected dimension, and only structural problems
//! (a profile with no dimensions, an action with no scoreable data) reach
//! the caller as [`ScoringError`].

#![deny(unsafe_code)]

pub mod calibrate;
pub mod composite;
pub mod condition;
pub mod error;
pub mod expr;
pub mod extract;
pub mod path;
pub mod profile;
pub mod risk;
pub mod scale;

pub use calibrate::{
    auto_calibrate, CalibrateOptions, CalibrationReport, CalibrationStatus, MetricDistribution,
    ScaleSuggestion,
};
pub use composite::{compute_composite, WeightedScore};
pub use condition::evaluate_condition;
pub use error::ScoringError;
pub use extract::{extract_raw_value, Extraction};
pub use path::resolve_path;
pub use profile::{
    batch_score_actions, score_action, ActionScore, BatchScoreResult, BatchSummary,
    DimensionResult,
};
pub use risk::compute_auto_risk;
pub use scale::{score_dimension_value, DimensionScore};

/// Round to two decimal places, the precision used across score outputs.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
