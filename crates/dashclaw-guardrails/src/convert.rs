//! Conversion from stored policies to the canonical document form.

use dashclaw_types::{
    AppliesTo, GuardrailPolicy, PolicyDocument, PolicyRule, PolicyTest, PolicyType, SourcePolicy,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("policy {policy} has unparseable rules: {source}")]
    InvalidRules {
        policy: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convert one stored policy to canonical form.
///
/// `rules` is accepted as a JSON object or a JSON-encoded string. A
/// missing id becomes a slug of the name. Policies that arrive without
/// tests get one generated placeholder so downstream test generators
/// always emit a suite.
pub fn convert_policy(source: &SourcePolicy) -> Result<GuardrailPolicy, ConvertError> {
    let rules = parse_rules(source)?;
    let action_types = string_list(&rules, "action_types");

    let tools_or_wildcard = |list: &[String]| {
        if list.is_empty() {
            vec!["*".to_string()]
        } else {
            list.to_vec()
        }
    };

    let (rule, tools) = match source.policy_type {
        PolicyType::RequireApproval => (
            PolicyRule {
                require: Some("approval".into()),
                ..Default::default()
            },
            tools_or_wildcard(&action_types),
        ),
        PolicyType::BlockActionType => (
            PolicyRule {
                block: Some(true),
                ..Default::default()
            },
            tools_or_wildcard(&action_types),
        ),
        PolicyType::RiskThreshold => (
            PolicyRule {
                block: Some(true),
                dashclaw_type: Some("risk_threshold".into()),
                threshold: rules.get("threshold").and_then(Value::as_f64),
                ..Default::default()
            },
            vec!["*".to_string()],
        ),
        PolicyType::RateLimit => (
            PolicyRule {
                dashclaw_type: Some("rate_limit".into()),
                max_actions: rules.get("max_actions").and_then(Value::as_u64),
                window_minutes: rules.get("window_minutes").and_then(Value::as_u64),
                ..Default::default()
            },
            tools_or_wildcard(&action_types),
        ),
        PolicyType::WebhookCheck => (
            PolicyRule {
                dashclaw_type: Some("webhook_check".into()),
                url: rules
                    .get("url")
                    .and_then(Value::as_str)
                    .map(String::from),
                timeout_ms: rules.get("timeout_ms").and_then(Value::as_u64),
                ..Default::default()
            },
            vec!["*".to_string()],
        ),
        PolicyType::Allowlist => {
            let mut allowed = string_list(&rules, "allowlist");
            if allowed.is_empty() {
                allowed = action_types.clone();
            }
            (
                PolicyRule {
                    allowlist: Some(allowed),
                    ..Default::default()
                },
                vec!["*".to_string()],
            )
        }
    };

    let id = source
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| slug(&source.name));

    let tests = match rules.get("tests") {
        Some(explicit) => serde_json::from_value(explicit.clone()).unwrap_or_default(),
        None => Vec::new(),
    };
    let tests = if tests.is_empty() {
        vec![placeholder_test(source.policy_type, &rule, &tools)]
    } else {
        tests
    };

    Ok(GuardrailPolicy {
        id,
        description: source.name.clone(),
        rule,
        applies_to: AppliesTo { tools },
        tests,
    })
}

/// Convert a list of stored policies into a portable document. Inactive
/// policies are dropped; conversion failures are logged and skipped so
/// one bad row never blocks an export.
pub fn convert_policies(sources: &[SourcePolicy], project: &str) -> PolicyDocument {
    let policies = sources
        .iter()
        .filter(|s| s.active)
        .filter_map(|s| match convert_policy(s) {
            Ok(policy) => Some(policy),
            Err(err) => {
                warn!(policy = %s.name, error = %err, "skipping unconvertible policy");
                None
            }
        })
        .collect();

    PolicyDocument {
        version: 1,
        project: project.to_string(),
        policies,
    }
}

fn parse_rules(source: &SourcePolicy) -> Result<Value, ConvertError> {
    match &source.rules {
        Value::String(raw) => {
            serde_json::from_str(raw).map_err(|e| ConvertError::InvalidRules {
                policy: source.name.clone(),
                source: e,
            })
        }
        Value::Object(_) => Ok(source.rules.clone()),
        _ => Ok(json!({})),
    }
}

fn string_list(rules: &Value, key: &str) -> Vec<String> {
    rules
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Lowercase slug of a policy name: `High Risk Block` -> `high_risk_block`.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_sep = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_sep = false;
        } else if !last_sep {
            out.push('_');
            last_sep = true;
        }
    }
    out.trim_end_matches('_').to_string()
}

fn placeholder_test(policy_type: PolicyType, rule: &PolicyRule, tools: &[String]) -> PolicyTest {
    let first_tool = tools
        .iter()
        .find(|t| *t != "*")
        .cloned()
        .unwrap_or_else(|| "example_tool".to_string());

    match policy_type {
        PolicyType::BlockActionType => PolicyTest {
            name: "blocks_action_type".into(),
            input: json!({ "tool": first_tool }),
            expect: json!({ "allowed": false, "reason": "blocked" }),
        },
        PolicyType::RequireApproval => PolicyTest {
            name: "requires_approval".into(),
            input: json!({ "tool": first_tool, "approval": false }),
            expect: json!({ "allowed": false, "reason": "approval" }),
        },
        PolicyType::RiskThreshold => PolicyTest {
            name: "blocks_above_threshold".into(),
            input: json!({ "tool": first_tool }),
            expect: json!({ "allowed": false, "reason": "blocked" }),
        },
        PolicyType::RateLimit => PolicyTest {
            name: "rate_limit_configured".into(),
            input: json!({ "tool": first_tool }),
            expect: json!({ "allowed": true }),
        },
        PolicyType::WebhookCheck => PolicyTest {
            name: "webhook_check_configured".into(),
            input: json!({ "tool": first_tool }),
            expect: json!({ "allowed": true }),
        },
        PolicyType::Allowlist => {
            let allowed = rule
                .allowlist
                .as_ref()
                .and_then(|list| list.first().cloned())
                .unwrap_or(first_tool);
            PolicyTest {
                name: "allows_listed_tools".into(),
                input: json!({ "tool": allowed }),
                expect: json!({ "allowed": true }),
            }
        }
    }
}
