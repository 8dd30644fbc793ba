//! The signal threshold table.

use serde::{Deserialize, Serialize};

/// Qualifying and escalation thresholds for each signal type. The
/// qualifying value gates which rows the store returns; the red value
/// escalates a qualifying row from amber.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    /// Actions per hour above which an agent qualifies as a spike.
    pub autonomy_qualify: u64,
    pub autonomy_red: u64,
    /// Minimum risk score for an ungoverned running action to qualify.
    pub high_impact_qualify: f64,
    pub high_impact_red: f64,
    /// Failures in 24h above which an agent qualifies.
    pub failures_qualify: u64,
    pub failures_red: u64,
    /// Open-loop age in hours beyond which a loop qualifies.
    pub stale_loop_qualify_hours: u64,
    pub stale_loop_red_hours: u64,
    /// Invalidations in 7 days at or above which an agent qualifies.
    pub drift_qualify: u64,
    pub drift_red: u64,
    /// Unvalidated assumption age in days beyond which it qualifies.
    pub stale_assumption_qualify_days: u64,
    pub stale_assumption_red_days: u64,
    /// Running-action age in hours beyond which it qualifies.
    pub stale_running_qualify_hours: u64,
    pub stale_running_red_hours: u64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            autonomy_qualify: 10,
            autonomy_red: 20,
            high_impact_qualify: 70.0,
            high_impact_red: 90.0,
            failures_qualify: 3,
            failures_red: 5,
            stale_loop_qualify_hours: 48,
            stale_loop_red_hours: 96,
            drift_qualify: 2,
            drift_red: 4,
            stale_assumption_qualify_days: 14,
            stale_assumption_red_days: 30,
            stale_running_qualify_hours: 4,
            stale_running_red_hours: 24,
        }
    }
}
