//! Signal output types.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    AutonomySpike,
    HighImpactLowOversight,
    RepeatedFailures,
    StaleLoop,
    AssumptionDrift,
    StaleAssumption,
    StaleRunningAction,
}

/// Two-level severity. Red signals demand attention now; amber signals
/// crossed the qualifying threshold but not the escalation one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Red,
    Amber,
}

/// One governance signal, ready for display or delivery.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub severity: Severity,
    pub label: String,
    pub detail: String,
    pub help: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loop_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assumption_id: Option<String>,
}

impl Signal {
    pub(crate) fn new(
        signal_type: SignalType,
        severity: Severity,
        label: String,
        detail: String,
        help: &str,
    ) -> Self {
        Self {
            signal_type,
            severity,
            label,
            detail,
            help: help.to_string(),
            agent_id: None,
            action_id: None,
            loop_id: None,
            assumption_id: None,
        }
    }
}
