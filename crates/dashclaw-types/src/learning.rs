//! Learning-loop input records.

use serde::{Deserialize, Serialize};

use crate::action::ActionStatus;

/// Snapshot of one completed action as fed into the learning loop.
///
/// `invalidated_assumptions` and `open_loops` are counts joined in by the
/// caller; the core never queries for them itself.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EpisodeSnapshot {
    pub action_id: String,
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub reversible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub invalidated_assumptions: u32,
    #[serde(default)]
    pub open_loops: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_defaults_are_sparse() {
        let snapshot: EpisodeSnapshot =
            serde_json::from_str(r#"{"action_id":"act_9"}"#).unwrap();
        assert_eq!(snapshot.status, ActionStatus::Pending);
        assert_eq!(snapshot.invalidated_assumptions, 0);
        assert!(snapshot.risk_score.is_none());
    }
}
