//! Signal computation: fan out the seven queries, classify each row.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::SignalError;
use crate::store::SignalStore;
use crate::thresholds::SignalThresholds;
use crate::types::{Severity, Signal, SignalType};

fn display_name(agent_name: Option<&str>, agent_id: Option<&str>) -> String {
    agent_name
        .filter(|n| !n.is_empty())
        .or(agent_id)
        .unwrap_or("unknown agent")
        .to_string()
}

fn truncate(text: Option<&str>, max_chars: usize, fallback: &str) -> String {
    match text.filter(|t| !t.is_empty()) {
        Some(t) => t.chars().take(max_chars).collect(),
        None => fallback.to_string(),
    }
}

fn hours_since(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    let minutes = (now - then).num_minutes() as f64;
    (minutes / 60.0).round() as i64
}

fn days_since(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    let hours = (now - then).num_hours() as f64;
    (hours / 24.0).round() as i64
}

/// Compute all seven signal types.
///
/// The queries run concurrently. Signals are optionally narrowed to one
/// agent after classification and sorted red before amber.
pub async fn compute_signals<S: SignalStore>(
    store: &S,
    filter_agent_id: Option<&str>,
    thresholds: &SignalThresholds,
) -> Result<Vec<Signal>, SignalError> {
    let (
        autonomy_spikes,
        high_impact,
        repeated_failures,
        stale_loops,
        assumption_drift,
        stale_assumptions,
        stale_running,
    ) = tokio::join!(
        store.autonomy_spikes(thresholds.autonomy_qualify),
        store.high_impact_running(thresholds.high_impact_qualify),
        store.repeated_failures(thresholds.failures_qualify),
        store.stale_open_loops(thresholds.stale_loop_qualify_hours),
        store.assumption_drift(thresholds.drift_qualify),
        store.stale_assumptions(thresholds.stale_assumption_qualify_days),
        store.stale_running_actions(thresholds.stale_running_qualify_hours),
    );

    let now = Utc::now();
    let mut signals = Vec::new();

    for spike in autonomy_spikes? {
        let severity = if spike.action_count > thresholds.autonomy_red {
            Severity::Red
        } else {
            Severity::Amber
        };
        let who = display_name(spike.agent_name.as_deref(), Some(&spike.agent_id));
        let mut signal = Signal::new(
            SignalType::AutonomySpike,
            severity,
            format!(
                "Governance alert: {who} — {} ungoverned decisions/hr",
                spike.action_count
            ),
            format!(
                "This agent made {} decisions in the last hour without proportional oversight, exceeding the governance threshold of {}.",
                spike.action_count, thresholds.autonomy_qualify
            ),
            "High decision frequency without oversight may indicate ungoverned autonomy. Review recent decisions and enforce policy throttling.",
        );
        signal.agent_id = Some(spike.agent_id);
        signals.push(signal);
    }

    for action in high_impact? {
        let severity = if action.risk_score >= thresholds.high_impact_red {
            Severity::Red
        } else {
            Severity::Amber
        };
        let who = display_name(action.agent_name.as_deref(), Some(&action.agent_id));
        let mut signal = Signal::new(
            SignalType::HighImpactLowOversight,
            severity,
            format!(
                "Ungoverned high-risk decision: {}",
                truncate(action.declared_goal.as_deref(), 50, "Unknown")
            ),
            format!(
                "{who} is executing an irreversible decision (risk: {}) without governance authorization.",
                action.risk_score
            ),
            "High-risk irreversible decisions must have explicit authorization_scope. Enforce policy compliance before execution.",
        );
        signal.agent_id = Some(action.agent_id);
        signal.action_id = Some(action.action_id);
        signals.push(signal);
    }

    for fail in repeated_failures? {
        let severity = if fail.failure_count > thresholds.failures_red {
            Severity::Red
        } else {
            Severity::Amber
        };
        let who = display_name(fail.agent_name.as_deref(), Some(&fail.agent_id));
        let mut signal = Signal::new(
            SignalType::RepeatedFailures,
            severity,
            format!(
                "Decision reliability degraded: {who} — {} failures in 24h",
                fail.failure_count
            ),
            format!(
                "This agent's decision reliability has degraded with {} failures in the last 24 hours, exceeding the integrity threshold of {}.",
                fail.failure_count, thresholds.failures_qualify
            ),
            "Repeated decision failures indicate degraded reliability. Review decision rationale and underlying assumptions.",
        );
        signal.agent_id = Some(fail.agent_id);
        signals.push(signal);
    }

    for open_loop in stale_loops? {
        let hours_old = hours_since(now, open_loop.created_at);
        let severity = if hours_old > thresholds.stale_loop_red_hours as i64 {
            Severity::Red
        } else {
            Severity::Amber
        };
        let who = display_name(
            open_loop.agent_name.as_deref(),
            open_loop.agent_id.as_deref(),
        );
        let mut signal = Signal::new(
            SignalType::StaleLoop,
            severity,
            format!(
                "Unresolved dependency ({hours_old}h): {}",
                truncate(open_loop.description.as_deref(), 50, "Unknown")
            ),
            format!(
                "Unresolved dependency for {who} has been blocking decision completion for {hours_old} hours."
            ),
            "Unresolved dependencies weaken decision integrity. Resolve or cancel to restore the governance chain.",
        );
        signal.agent_id = open_loop.agent_id;
        signal.loop_id = Some(open_loop.loop_id);
        signals.push(signal);
    }

    for drift in assumption_drift? {
        let severity = if drift.invalidation_count >= thresholds.drift_red {
            Severity::Red
        } else {
            Severity::Amber
        };
        let who = display_name(drift.agent_name.as_deref(), drift.agent_id.as_deref());
        let mut signal = Signal::new(
            SignalType::AssumptionDrift,
            severity,
            format!(
                "Decision basis degrading: {who} — {} assumptions invalidated",
                drift.invalidation_count
            ),
            format!(
                "{} assumptions invalidated in the last 7 days, indicating the decision basis for this agent is eroding.",
                drift.invalidation_count
            ),
            "Frequent assumption invalidations degrade the decision basis. Review and re-validate the foundational assumptions.",
        );
        signal.agent_id = drift.agent_id;
        signals.push(signal);
    }

    for assumption in stale_assumptions? {
        let days_old = days_since(now, assumption.created_at);
        let severity = if days_old > thresholds.stale_assumption_red_days as i64 {
            Severity::Red
        } else {
            Severity::Amber
        };
        let mut signal = Signal::new(
            SignalType::StaleAssumption,
            severity,
            format!(
                "Unverified decision basis ({days_old}d): {}",
                truncate(assumption.assumption.as_deref(), 50, "Unknown")
            ),
            format!(
                "This assumption has not been verified for {days_old} days and may no longer support sound decisions."
            ),
            "Unverified assumptions weaken the decision basis. Validate or invalidate to maintain decision integrity.",
        );
        signal.agent_id = assumption.agent_id;
        signal.assumption_id = Some(assumption.assumption_id);
        signals.push(signal);
    }

    for action in stale_running? {
        let hours_running = hours_since(now, action.timestamp_start);
        let severity = if hours_running > thresholds.stale_running_red_hours as i64 {
            Severity::Red
        } else {
            Severity::Amber
        };
        let who = display_name(action.agent_name.as_deref(), Some(&action.agent_id));
        let mut signal = Signal::new(
            SignalType::StaleRunningAction,
            severity,
            format!(
                "Stalled decision ({hours_running}h): {}",
                truncate(action.declared_goal.as_deref(), 60, "Unknown goal")
            ),
            format!(
                "{who} has had this decision executing for {hours_running} hours without resolution. The governance record is incomplete."
            ),
            "Stalled decisions leave the audit trail incomplete. Investigate whether the decision is stuck or should be finalized.",
        );
        signal.agent_id = Some(action.agent_id);
        signal.action_id = Some(action.action_id);
        signals.push(signal);
    }

    if let Some(agent_id) = filter_agent_id {
        signals.retain(|s| s.agent_id.as_deref() == Some(agent_id));
    }

    // Red first; stable within a severity.
    signals.sort_by_key(|s| match s.severity {
        Severity::Red => 0,
        Severity::Amber => 1,
    });

    debug!(count = signals.len(), "computed signals");
    Ok(signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::*;
    use async_trait::async_trait;
    use chrono::Duration;

    #[derive(Default)]
    struct MemoryStore {
        spikes: Vec<AutonomySpikeRow>,
        high_impact: Vec<HighImpactRow>,
        failures: Vec<FailureRow>,
        loops: Vec<StaleLoopRow>,
        drift: Vec<AssumptionDriftRow>,
        assumptions: Vec<StaleAssumptionRow>,
        running: Vec<StaleRunningRow>,
    }

    #[async_trait]
    impl SignalStore for MemoryStore {
        async fn autonomy_spikes(&self, _: u64) -> Result<Vec<AutonomySpikeRow>, SignalError> {
            Ok(self.spikes.clone())
        }
        async fn high_impact_running(&self, _: f64) -> Result<Vec<HighImpactRow>, SignalError> {
            Ok(self.high_impact.clone())
        }
        async fn repeated_failures(&self, _: u64) -> Result<Vec<FailureRow>, SignalError> {
            Ok(self.failures.clone())
        }
        async fn stale_open_loops(&self, _: u64) -> Result<Vec<StaleLoopRow>, SignalError> {
            Ok(self.loops.clone())
        }
        async fn assumption_drift(&self, _: u64) -> Result<Vec<AssumptionDriftRow>, SignalError> {
            Ok(self.drift.clone())
        }
        async fn stale_assumptions(&self, _: u64) -> Result<Vec<StaleAssumptionRow>, SignalError> {
            Ok(self.assumptions.clone())
        }
        async fn stale_running_actions(&self, _: u64) -> Result<Vec<StaleRunningRow>, SignalError> {
            Ok(self.running.clone())
        }
    }

    #[tokio::test]
    async fn autonomy_spike_escalates_past_red_threshold() {
        let store = MemoryStore {
            spikes: vec![
                AutonomySpikeRow {
                    agent_id: "a1".into(),
                    agent_name: Some("deployer".into()),
                    action_count: 25,
                },
                AutonomySpikeRow {
                    agent_id: "a2".into(),
                    agent_name: None,
                    action_count: 12,
                },
            ],
            ..Default::default()
        };
        let signals = compute_signals(&store, None, &SignalThresholds::default())
            .await
            .unwrap();

        assert_eq!(signals.len(), 2);
        // red sorts first
        assert_eq!(signals[0].severity, Severity::Red);
        assert!(signals[0]
            .label
            .contains("deployer — 25 ungoverned decisions/hr"));
        assert_eq!(signals[1].severity, Severity::Amber);
        assert!(signals[1].label.contains("a2"));
        assert!(signals[1]
            .detail
            .contains("exceeding the governance threshold of 10"));
    }

    #[tokio::test]
    async fn high_impact_signal_carries_action_identity() {
        let store = MemoryStore {
            high_impact: vec![HighImpactRow {
                action_id: "act_9".into(),
                agent_id: "a1".into(),
                agent_name: None,
                declared_goal: Some("drop the production database and rebuild it from scratch".into()),
                risk_score: 92.0,
                action_type: "delete".into(),
            }],
            ..Default::default()
        };
        let signals = compute_signals(&store, None, &SignalThresholds::default())
            .await
            .unwrap();

        assert_eq!(signals[0].severity, Severity::Red);
        assert_eq!(signals[0].action_id.as_deref(), Some("act_9"));
        // goal truncated to 50 chars in the label
        assert!(signals[0]
            .label
            .ends_with("drop the production database and rebuild it from s"));
        assert!(signals[0].detail.contains("(risk: 92)"));
    }

    #[tokio::test]
    async fn age_based_signals_classify_on_elapsed_time() {
        let now = Utc::now();
        let store = MemoryStore {
            loops: vec![StaleLoopRow {
                loop_id: "ol_1".into(),
                description: Some("waiting on approval".into()),
                created_at: now - Duration::hours(100),
                agent_id: Some("a1".into()),
                agent_name: None,
            }],
            assumptions: vec![StaleAssumptionRow {
                assumption_id: "as_1".into(),
                assumption: Some("rate limits stay fixed".into()),
                created_at: now - Duration::days(20),
                agent_id: Some("a1".into()),
                agent_name: None,
            }],
            running: vec![StaleRunningRow {
                action_id: "act_1".into(),
                agent_id: "a1".into(),
                agent_name: None,
                declared_goal: None,
                timestamp_start: now - Duration::hours(30),
                risk_score: None,
            }],
            ..Default::default()
        };
        let signals = compute_signals(&store, None, &SignalThresholds::default())
            .await
            .unwrap();

        assert_eq!(signals.len(), 3);
        let by_type = |t: SignalType| signals.iter().find(|s| s.signal_type == t).unwrap();
        // 100h > 96h red; 20d <= 30d amber; 30h > 24h red
        assert_eq!(by_type(SignalType::StaleLoop).severity, Severity::Red);
        assert_eq!(by_type(SignalType::StaleAssumption).severity, Severity::Amber);
        assert_eq!(by_type(SignalType::StaleRunningAction).severity, Severity::Red);
        assert!(by_type(SignalType::StaleRunningAction)
            .label
            .contains("Unknown goal"));
    }

    #[tokio::test]
    async fn agent_filter_applies_after_classification() {
        let store = MemoryStore {
            failures: vec![
                FailureRow {
                    agent_id: "a1".into(),
                    agent_name: None,
                    failure_count: 6,
                },
                FailureRow {
                    agent_id: "a2".into(),
                    agent_name: None,
                    failure_count: 4,
                },
            ],
            drift: vec![AssumptionDriftRow {
                agent_id: None,
                agent_name: None,
                invalidation_count: 5,
            }],
            ..Default::default()
        };
        let signals = compute_signals(&store, Some("a1"), &SignalThresholds::default())
            .await
            .unwrap();

        // a2 row and the agent-less drift row are filtered out
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].signal_type, SignalType::RepeatedFailures);
        assert_eq!(signals[0].severity, Severity::Red);
    }

    #[tokio::test]
    async fn drift_red_boundary_is_inclusive() {
        let store = MemoryStore {
            drift: vec![
                AssumptionDriftRow {
                    agent_id: Some("a1".into()),
                    agent_name: None,
                    invalidation_count: 4,
                },
                AssumptionDriftRow {
                    agent_id: Some("a2".into()),
                    agent_name: None,
                    invalidation_count: 3,
                },
            ],
            ..Default::default()
        };
        let signals = compute_signals(&store, None, &SignalThresholds::default())
            .await
            .unwrap();
        assert_eq!(signals[0].severity, Severity::Red);
        assert_eq!(signals[1].severity, Severity::Amber);
    }
}
