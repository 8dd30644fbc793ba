//! Signal computation through the facade against a stubbed store.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashclaw::signals::{
    compute_signals, AssumptionDriftRow, AutonomySpikeRow, FailureRow, HighImpactRow, Severity,
    SignalError, SignalStore, SignalThresholds, SignalType, StaleAssumptionRow, StaleLoopRow,
    StaleRunningRow,
};

struct StubStore;

#[async_trait]
impl SignalStore for StubStore {
    async fn autonomy_spikes(
        &self,
        _min_actions: u64,
    ) -> Result<Vec<AutonomySpikeRow>, SignalError> {
        Ok(vec![AutonomySpikeRow {
            agent_id: "agent-a".into(),
            agent_name: Some("Atlas".into()),
            action_count: 15,
        }])
    }

    async fn high_impact_running(
        &self,
        _min_risk: f64,
    ) -> Result<Vec<HighImpactRow>, SignalError> {
        Ok(vec![HighImpactRow {
            action_id: "act_7".into(),
            agent_id: "agent-b".into(),
            agent_name: None,
            declared_goal: Some("rotate production credentials".into()),
            risk_score: 95.0,
            action_type: "secrets.rotate".into(),
        }])
    }

    async fn repeated_failures(&self, _min_failures: u64) -> Result<Vec<FailureRow>, SignalError> {
        Ok(Vec::new())
    }

    async fn stale_open_loops(
        &self,
        _older_than_hours: u64,
    ) -> Result<Vec<StaleLoopRow>, SignalError> {
        Ok(vec![StaleLoopRow {
            loop_id: "loop_3".into(),
            description: Some("waiting on schema review".into()),
            created_at: Utc::now() - Duration::hours(60),
            agent_id: Some("agent-a".into()),
            agent_name: Some("Atlas".into()),
        }])
    }

    async fn assumption_drift(
        &self,
        _min_invalidations: u64,
    ) -> Result<Vec<AssumptionDriftRow>, SignalError> {
        Ok(Vec::new())
    }

    async fn stale_assumptions(
        &self,
        _older_than_days: u64,
    ) -> Result<Vec<StaleAssumptionRow>, SignalError> {
        Ok(Vec::new())
    }

    async fn stale_running_actions(
        &self,
        _older_than_hours: u64,
    ) -> Result<Vec<StaleRunningRow>, SignalError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn red_signals_sort_ahead_of_amber() {
    let signals = compute_signals(&StubStore, None, &SignalThresholds::default())
        .await
        .unwrap();

    assert_eq!(signals.len(), 3);
    // risk 95 crosses the red escalation at 90; the rest stay amber
    assert_eq!(signals[0].severity, Severity::Red);
    assert_eq!(signals[0].signal_type, SignalType::HighImpactLowOversight);
    assert!(signals[0].label.contains("rotate production credentials"));
    assert_eq!(signals[0].action_id.as_deref(), Some("act_7"));

    assert_eq!(signals[1].severity, Severity::Amber);
    assert!(signals[1].label.contains("Atlas"));
    assert_eq!(signals[2].signal_type, SignalType::StaleLoop);
    assert!(signals[2].label.contains("(60h)"));
}

#[tokio::test]
async fn agent_filter_narrows_to_one_agent() {
    let signals = compute_signals(&StubStore, Some("agent-b"), &SignalThresholds::default())
        .await
        .unwrap();

    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].agent_id.as_deref(), Some("agent-b"));
}
