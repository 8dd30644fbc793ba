//! Guardrail policies: stored source form and the canonical portable form.
//!
//! `PolicyDocument` is the interchange shape consumed by external test
//! generators (Jest/pytest). Field names, including the `_dashclaw_*`
//! extension keys, are stable and must round-trip unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The policy types an organization can store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    RequireApproval,
    BlockActionType,
    RiskThreshold,
    RateLimit,
    WebhookCheck,
    Allowlist,
}

/// A policy as stored by the dashboard, before conversion to the canonical
/// form. `rules` arrives either as a JSON object or as a JSON-encoded
/// string, depending on which storage path wrote it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourcePolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub policy_type: PolicyType,
    #[serde(default)]
    pub rules: Value,
    #[serde(default = "default_active", deserialize_with = "bool_or_int")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Storage drivers write `active` as 0/1; the SDK writes a bool.
fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        _ => false,
    })
}

/// Canonical rule body. Optional fields are omitted from serialization so
/// each policy type produces exactly the shape external tooling expects.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PolicyRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowlist: Option<Vec<String>>,
    #[serde(
        rename = "_dashclaw_type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dashclaw_type: Option<String>,
    #[serde(rename = "_threshold", default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(
        rename = "_max_actions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_actions: Option<u64>,
    #[serde(
        rename = "_window_minutes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub window_minutes: Option<u64>,
    #[serde(rename = "_url", default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "_timeout_ms", default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl PolicyRule {
    pub fn is_block(&self) -> bool {
        self.block == Some(true)
    }

    pub fn requires_approval(&self) -> bool {
        self.require.as_deref() == Some("approval")
    }
}

/// Tool patterns a policy applies to. Patterns are exact tool names,
/// trailing-`*` prefixes, or the bare `*` wildcard.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppliesTo {
    #[serde(default)]
    pub tools: Vec<String>,
}

/// A behavioral test attached to a policy, preserved verbatim for the
/// external test generators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyTest {
    pub name: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub expect: Value,
}

/// A policy in canonical form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuardrailPolicy {
    pub id: String,
    pub description: String,
    pub rule: PolicyRule,
    pub applies_to: AppliesTo,
    #[serde(default)]
    pub tests: Vec<PolicyTest>,
}

/// The portable policy document: `{ version, project, policies }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub version: u32,
    pub project: String,
    pub policies: Vec<GuardrailPolicy>,
}
