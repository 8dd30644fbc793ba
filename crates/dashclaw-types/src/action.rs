//! Action records reported by agents through the SDK.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle status of a reported agent action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    #[default]
    Pending,
    Running,
    PendingApproval,
    Completed,
    Failed,
    Cancelled,
}

impl ActionStatus {
    /// Whether the action has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ActionStatus::Completed | ActionStatus::Failed | ActionStatus::Cancelled
        )
    }
}

/// One audited agent action, as fetched from storage by the caller.
///
/// Numeric telemetry fields are optional; the scoring engines treat a
/// missing field as "no data" rather than zero. `metadata` is free-form
/// JSON supplied by the reporting agent and is resolved with dot-paths
/// (`result.latency`) by the scoring primitives.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action_id: String,
    #[serde(default)]
    pub agent_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
    #[serde(default)]
    pub reversible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Value,
}

impl ActionRecord {
    /// Total token usage, treating missing counters as zero.
    pub fn tokens_total(&self) -> u64 {
        self.prompt_tokens.unwrap_or(0) + self.completion_tokens.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_terminal_predicate() {
        assert!(ActionStatus::Completed.is_terminal());
        assert!(ActionStatus::Failed.is_terminal());
        assert!(!ActionStatus::Running.is_terminal());
        assert!(!ActionStatus::PendingApproval.is_terminal());
    }

    #[test]
    fn deserializes_sparse_record() {
        let record: ActionRecord =
            serde_json::from_str(r#"{"action_id":"act_1","status":"completed"}"#).unwrap();
        assert_eq!(record.status, ActionStatus::Completed);
        assert!(record.risk_score.is_none());
        assert_eq!(record.tokens_total(), 0);
    }

    #[test]
    fn tokens_total_sums_both_sides() {
        let record = ActionRecord {
            prompt_tokens: Some(1200),
            completion_tokens: Some(300),
            ..Default::default()
        };
        assert_eq!(record.tokens_total(), 1500);
    }
}
