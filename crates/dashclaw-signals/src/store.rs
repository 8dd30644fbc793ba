//! The read-only query capability signals are computed from.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// An agent that crossed the hourly decision-rate threshold.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AutonomySpikeRow {
    pub agent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    pub action_count: u64,
}

/// An irreversible running action at or above the qualifying risk score
/// with no authorization scope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HighImpactRow {
    pub action_id: String,
    pub agent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_goal: Option<String>,
    pub risk_score: f64,
    pub action_type: String,
}

/// An agent exceeding the 24-hour failure threshold.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FailureRow {
    pub agent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    pub failure_count: u64,
}

/// An open loop older than the qualifying age.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaleLoopRow {
    pub loop_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}

/// An agent whose assumptions were invalidated at or above the qualifying
/// count in the trailing week.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssumptionDriftRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    pub invalidation_count: u64,
}

/// An assumption neither validated nor invalidated past the qualifying
/// age.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaleAssumptionRow {
    pub assumption_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assumption: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}

/// A running action older than the qualifying age.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaleRunningRow {
    pub action_id: String,
    pub agent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_goal: Option<String>,
    pub timestamp_start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
}

/// The seven governance queries. Each method applies the passed
/// qualifying threshold at the query; severity escalation happens in
/// [`compute_signals`](crate::compute_signals).
#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Agents with more than `min_actions` actions in the last hour.
    async fn autonomy_spikes(&self, min_actions: u64) -> Result<Vec<AutonomySpikeRow>, SignalError>;

    /// Irreversible running actions with risk at or above `min_risk` and
    /// no authorization scope, highest risk first.
    async fn high_impact_running(&self, min_risk: f64) -> Result<Vec<HighImpactRow>, SignalError>;

    /// Agents with more than `min_failures` failed actions in 24 hours.
    async fn repeated_failures(&self, min_failures: u64) -> Result<Vec<FailureRow>, SignalError>;

    /// Open loops older than `older_than_hours`, oldest first.
    async fn stale_open_loops(&self, older_than_hours: u64)
        -> Result<Vec<StaleLoopRow>, SignalError>;

    /// Agents with at least `min_invalidations` assumption invalidations
    /// in the last 7 days.
    async fn assumption_drift(
        &self,
        min_invalidations: u64,
    ) -> Result<Vec<AssumptionDriftRow>, SignalError>;

    /// Unvalidated assumptions older than `older_than_days`, oldest first.
    async fn stale_assumptions(
        &self,
        older_than_days: u64,
    ) -> Result<Vec<StaleAssumptionRow>, SignalError>;

    /// Running actions started more than `older_than_hours` ago, oldest
    /// first.
    async fn stale_running_actions(
        &self,
        older_than_hours: u64,
    ) -> Result<Vec<StaleRunningRow>, SignalError>;
}
