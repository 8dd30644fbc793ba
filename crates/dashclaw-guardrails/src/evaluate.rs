//! Deterministic policy evaluation.

use dashclaw_types::GuardrailPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::pattern::tool_matches;

/// The action under evaluation. `context.approved` carries approval
/// granted out of band (e.g. by a human reviewer in the calling system).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PolicyInput {
    pub tool: String,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub approval: bool,
    #[serde(default)]
    pub context: Value,
}

impl PolicyInput {
    pub fn for_tool(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            ..Default::default()
        }
    }

    fn approved(&self) -> bool {
        self.approval || self.context.get("approved") == Some(&Value::Bool(true))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyEvalResult {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PolicyEvalResult {
    fn new(allowed: bool, policy_id: &str, reason: &str) -> Self {
        Self {
            allowed,
            policy_id: Some(policy_id.to_string()),
            reason: Some(reason.to_string()),
        }
    }
}

/// Evaluate one policy against an input action.
///
/// A policy whose tool patterns do not match is an allow, not a skip, so
/// callers always get a per-policy verdict. Allowlist membership is
/// checked before the block rule.
pub fn evaluate_policy(policy: &GuardrailPolicy, input: &PolicyInput) -> PolicyEvalResult {
    let applies = policy
        .applies_to
        .tools
        .iter()
        .any(|pattern| tool_matches(pattern, &input.tool));
    if !applies {
        return PolicyEvalResult::new(true, &policy.id, "policy does not apply");
    }

    if let Some(allowlist) = &policy.rule.allowlist {
        if allowlist.iter().any(|t| t == &input.tool) {
            return PolicyEvalResult::new(true, &policy.id, "allowlisted");
        }
    }

    if policy.rule.is_block() {
        return PolicyEvalResult::new(false, &policy.id, "blocked by policy");
    }

    if policy.rule.requires_approval() {
        if input.approved() {
            return PolicyEvalResult::new(true, &policy.id, "approved");
        }
        return PolicyEvalResult::new(false, &policy.id, "approval required");
    }

    PolicyEvalResult {
        allowed: true,
        policy_id: Some(policy.id.clone()),
        reason: None,
    }
}

/// Evaluate policies in declaration order; the first denial wins. An
/// empty list allows.
pub fn evaluate_policies(policies: &[GuardrailPolicy], input: &PolicyInput) -> PolicyEvalResult {
    for policy in policies {
        let result = evaluate_policy(policy, input);
        if !result.allowed {
            debug!(policy = %policy.id, tool = %input.tool, "action denied");
            return result;
        }
    }
    PolicyEvalResult {
        allowed: true,
        policy_id: None,
        reason: Some("all policies passed".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashclaw_types::{AppliesTo, PolicyRule};
    use serde_json::json;

    fn policy(id: &str, tools: &[&str], rule: PolicyRule) -> GuardrailPolicy {
        GuardrailPolicy {
            id: id.into(),
            description: id.into(),
            rule,
            applies_to: AppliesTo {
                tools: tools.iter().map(|t| t.to_string()).collect(),
            },
            tests: Vec::new(),
        }
    }

    fn block_rule() -> PolicyRule {
        PolicyRule {
            block: Some(true),
            ..Default::default()
        }
    }

    fn approval_rule() -> PolicyRule {
        PolicyRule {
            require: Some("approval".into()),
            ..Default::default()
        }
    }

    #[test]
    fn non_matching_tool_allows_with_reason() {
        let result = evaluate_policy(
            &policy("p1", &["deploy"], block_rule()),
            &PolicyInput::for_tool("read"),
        );
        assert!(result.allowed);
        assert_eq!(result.reason.as_deref(), Some("policy does not apply"));
    }

    #[test]
    fn block_rule_denies_matching_tool() {
        let result = evaluate_policy(
            &policy("p1", &["deploy"], block_rule()),
            &PolicyInput::for_tool("deploy"),
        );
        assert!(!result.allowed);
        assert_eq!(result.reason.as_deref(), Some("blocked by policy"));
    }

    #[test]
    fn allowlist_beats_block() {
        let rule = PolicyRule {
            block: Some(true),
            allowlist: Some(vec!["safe_tool".into()]),
            ..Default::default()
        };
        let p = policy("p1", &["*"], rule);

        let safe = evaluate_policy(&p, &PolicyInput::for_tool("safe_tool"));
        assert!(safe.allowed);
        assert_eq!(safe.reason.as_deref(), Some("allowlisted"));

        let danger = evaluate_policy(&p, &PolicyInput::for_tool("danger_tool"));
        assert!(!danger.allowed);
    }

    #[test]
    fn approval_flow() {
        let p = policy("p1", &["deploy"], approval_rule());

        let denied = evaluate_policy(&p, &PolicyInput::for_tool("deploy"));
        assert!(!denied.allowed);
        assert_eq!(denied.reason.as_deref(), Some("approval required"));

        let approved = evaluate_policy(
            &p,
            &PolicyInput {
                approval: true,
                ..PolicyInput::for_tool("deploy")
            },
        );
        assert!(approved.allowed);
        assert_eq!(approved.reason.as_deref(), Some("approved"));

        let via_context = evaluate_policy(
            &p,
            &PolicyInput {
                context: json!({"approved": true}),
                ..PolicyInput::for_tool("deploy")
            },
        );
        assert!(via_context.allowed);
    }

    #[test]
    fn wildcard_patterns_gate_applicability() {
        let p = policy("p1", &["exec.*"], block_rule());
        assert!(!evaluate_policy(&p, &PolicyInput::for_tool("exec.run")).allowed);
        assert!(evaluate_policy(&p, &PolicyInput::for_tool("read.file")).allowed);
    }

    #[test]
    fn first_denial_wins_across_policies() {
        let policies = vec![
            policy("p1", &["deploy"], block_rule()),
            policy("p2", &["deploy"], approval_rule()),
        ];
        let result = evaluate_policies(&policies, &PolicyInput::for_tool("deploy"));
        assert!(!result.allowed);
        assert_eq!(result.policy_id.as_deref(), Some("p1"));
    }

    #[test]
    fn all_passing_and_empty_lists_allow() {
        let policies = vec![policy("p1", &["delete"], block_rule())];
        let result = evaluate_policies(&policies, &PolicyInput::for_tool("read"));
        assert!(result.allowed);
        assert_eq!(result.reason.as_deref(), Some("all policies passed"));

        assert!(evaluate_policies(&[], &PolicyInput::for_tool("anything")).allowed);
    }
}
