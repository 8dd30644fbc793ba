//! Compliance framework definitions (SOC 2, ISO 27001, ...).
//!
//! A framework is a list of controls, each mapping to guardrail policy
//! shapes. Framework definitions are supplied by the caller as JSON; the
//! closed enums here reject unknown patterns at parse time rather than
//! silently skipping them at mapping time.

use serde::{Deserialize, Serialize};

/// How relevant a control is to autonomous-agent operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRelevance {
    Low,
    Medium,
    High,
    Critical,
}

impl AgentRelevance {
    /// Remediation ordering: critical first.
    pub fn priority_rank(&self) -> u8 {
        match self {
            AgentRelevance::Critical => 0,
            AgentRelevance::High => 1,
            AgentRelevance::Medium => 2,
            AgentRelevance::Low => 3,
        }
    }
}

/// Rule-shape signature a control mapping looks for in the policy set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyPattern {
    Block,
    RequireApproval,
    Allowlist,
    RateLimit,
    RiskThreshold,
    DryRun,
    AnyActivePolicy,
}

/// Coverage a mapping grants when it matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingCoverage {
    Full,
    Partial,
}

/// One policy-to-control mapping rule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyMapping {
    pub policy_pattern: PolicyPattern,
    #[serde(default)]
    pub tool_patterns: Vec<String>,
    pub coverage: MappingCoverage,
    #[serde(default)]
    pub rationale: String,
}

/// One control from a compliance framework.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComplianceControl {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub agent_relevance: AgentRelevance,
    #[serde(default)]
    pub policy_mappings: Vec<PolicyMapping>,
    #[serde(default)]
    pub gap_recommendations: Vec<String>,
}

/// A full framework definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Framework {
    pub framework: String,
    #[serde(default)]
    pub version: String,
    pub controls: Vec<ComplianceControl>,
}

impl Framework {
    /// Parse and structurally validate a framework definition.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
