//! # dashclaw-signals
//!
//! The seven cross-cutting governance risk signals: autonomy spikes,
//! ungoverned high-impact decisions, repeated failures, stale open loops,
//! assumption drift, stale assumptions, and stalled running actions.
//!
//! Queries run through the injected [`SignalStore`] capability and are
//! fanned out concurrently; classification against the threshold table
//! happens here.

#![deny(unsafe_code)]

pub mod compute;
pub mod error;
pub mod store;
pub mod thresholds;
pub mod types;

pub use compute::compute_signals;
pub use error::SignalError;
pub use store::{
    AssumptionDriftRow, AutonomySpikeRow, FailureRow, HighImpactRow, SignalStore,
    StaleAssumptionRow, StaleLoopRow, StaleRunningRow,
};
pub use thresholds::SignalThresholds;
pub use types::{Severity, Signal, SignalType};
