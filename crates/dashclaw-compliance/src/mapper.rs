//! Policy-to-control mapping.

use chrono::{DateTime, Utc};
use dashclaw_types::{
    AgentRelevance, ComplianceControl, Framework, GuardrailPolicy, MappingCoverage, PolicyDocument,
    PolicyMapping, PolicyPattern,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStatus {
    Covered,
    Partial,
    Gap,
}

/// Provenance of one policy that satisfied a control mapping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchedPolicy {
    pub policy_id: String,
    pub policy_description: String,
    pub mapping_coverage: MappingCoverage,
    pub rationale: String,
}

/// One control's mapping outcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ControlMapping {
    pub control_id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub agent_relevance: AgentRelevance,
    pub status: ControlStatus,
    pub matched_policies: Vec<MatchedPolicy>,
    pub gap_recommendations: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub total_controls: usize,
    pub covered: usize,
    pub partial: usize,
    pub gaps: usize,
    pub coverage_percentage: u32,
}

/// The compliance map: every framework control evaluated against the
/// policy document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComplianceMap {
    pub framework: String,
    pub framework_version: String,
    pub project: String,
    pub generated_at: DateTime<Utc>,
    pub summary: ComplianceSummary,
    pub controls: Vec<ControlMapping>,
}

/// Map a policy document onto a framework.
///
/// Coverage percentage counts a partial control as half a covered one,
/// rounded to whole percent.
pub fn map_policies(doc: &PolicyDocument, framework: &Framework) -> ComplianceMap {
    let controls: Vec<ControlMapping> = framework
        .controls
        .iter()
        .map(|control| evaluate_control(control, &doc.policies))
        .collect();

    let covered = controls
        .iter()
        .filter(|c| c.status == ControlStatus::Covered)
        .count();
    let partial = controls
        .iter()
        .filter(|c| c.status == ControlStatus::Partial)
        .count();
    let gaps = controls.len() - covered - partial;

    let coverage_percentage = if controls.is_empty() {
        0
    } else {
        ((covered as f64 + partial as f64 * 0.5) / controls.len() as f64 * 100.0).round() as u32
    };

    debug!(
        framework = %framework.framework,
        covered,
        partial,
        gaps,
        "mapped policies to controls"
    );

    ComplianceMap {
        framework: framework.framework.clone(),
        framework_version: framework.version.clone(),
        project: doc.project.clone(),
        generated_at: Utc::now(),
        summary: ComplianceSummary {
            total_controls: controls.len(),
            covered,
            partial,
            gaps,
            coverage_percentage,
        },
        controls,
    }
}

fn evaluate_control(control: &ComplianceControl, policies: &[GuardrailPolicy]) -> ControlMapping {
    let mut matched = Vec::new();
    let mut best: Option<MappingCoverage> = None;

    for mapping in &control.policy_mappings {
        for policy in policies {
            if !policy_matches_mapping(policy, mapping) {
                continue;
            }
            matched.push(MatchedPolicy {
                policy_id: policy.id.clone(),
                policy_description: policy.description.clone(),
                mapping_coverage: mapping.coverage,
                rationale: mapping.rationale.clone(),
            });
            best = match (best, mapping.coverage) {
                (_, MappingCoverage::Full) => Some(MappingCoverage::Full),
                (None, MappingCoverage::Partial) => Some(MappingCoverage::Partial),
                (prev, _) => prev,
            };
        }
    }

    let status = match best {
        _ if matched.is_empty() => ControlStatus::Gap,
        Some(MappingCoverage::Full) => ControlStatus::Covered,
        _ => ControlStatus::Partial,
    };

    ControlMapping {
        control_id: control.id.clone(),
        title: control.title.clone(),
        category: control.category.clone(),
        description: control.description.clone(),
        agent_relevance: control.agent_relevance,
        status,
        matched_policies: matched,
        gap_recommendations: if status == ControlStatus::Covered {
            Vec::new()
        } else {
            control.gap_recommendations.clone()
        },
    }
}

fn policy_matches_mapping(policy: &GuardrailPolicy, mapping: &PolicyMapping) -> bool {
    if !pattern_matches(policy, mapping.policy_pattern) {
        return false;
    }
    if mapping.tool_patterns.is_empty() {
        return true;
    }
    tool_patterns_intersect(policy, &mapping.tool_patterns)
}

fn pattern_matches(policy: &GuardrailPolicy, pattern: PolicyPattern) -> bool {
    let rule = &policy.rule;
    match pattern {
        PolicyPattern::Block => rule.is_block(),
        PolicyPattern::RequireApproval => rule.requires_approval(),
        PolicyPattern::Allowlist => rule.allowlist.is_some(),
        PolicyPattern::RateLimit => rule.dashclaw_type.as_deref() == Some("rate_limit"),
        PolicyPattern::RiskThreshold => rule.dashclaw_type.as_deref() == Some("risk_threshold"),
        PolicyPattern::DryRun => rule.dashclaw_type.as_deref() == Some("dry_run"),
        PolicyPattern::AnyActivePolicy => true,
    }
}

/// Wildcard-aware intersection: either side's `*` segments may absorb the
/// other's literal text, in both directions.
fn tool_patterns_intersect(policy: &GuardrailPolicy, patterns: &[String]) -> bool {
    for pattern in patterns {
        if pattern == "*" {
            return true;
        }
        for tool in &policy.applies_to.tools {
            if tool == pattern {
                return true;
            }
            if pattern.contains('*') && wildcard_match(pattern, tool) {
                return true;
            }
            if tool.contains('*') && wildcard_match(tool, pattern) {
                return true;
            }
        }
    }
    false
}

/// Glob-style match where `*` spans any run of characters.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    let mut pos = 0;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            if !text.starts_with(part) {
                return false;
            }
            pos = part.len();
        } else if i == parts.len() - 1 && !pattern.ends_with('*') {
            return text.len() >= pos && text[pos..].ends_with(part);
        } else {
            match text[pos..].find(part) {
                Some(idx) => pos += idx + part.len(),
                None => return false,
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashclaw_types::{AppliesTo, PolicyRule};

    fn policy(id: &str, tools: &[&str], rule: PolicyRule) -> GuardrailPolicy {
        GuardrailPolicy {
            id: id.into(),
            description: format!("{id} policy"),
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

    fn doc(policies: Vec<GuardrailPolicy>) -> PolicyDocument {
        PolicyDocument {
            version: 1,
            project: "acme".into(),
            policies,
        }
    }

    fn control(
        id: &str,
        relevance: AgentRelevance,
        mappings: Vec<PolicyMapping>,
    ) -> ComplianceControl {
        ComplianceControl {
            id: id.into(),
            title: format!("{id} title"),
            category: "Operations".into(),
            description: String::new(),
            agent_relevance: relevance,
            policy_mappings: mappings,
            gap_recommendations: vec!["Add a policy".into()],
        }
    }

    fn mapping(
        pattern: PolicyPattern,
        tools: &[&str],
        coverage: MappingCoverage,
    ) -> PolicyMapping {
        PolicyMapping {
            policy_pattern: pattern,
            tool_patterns: tools.iter().map(|t| t.to_string()).collect(),
            coverage,
            rationale: "because".into(),
        }
    }

    fn framework(controls: Vec<ComplianceControl>) -> Framework {
        Framework {
            framework: "SOC 2".into(),
            version: "2017".into(),
            controls,
        }
    }

    #[test]
    fn full_mapping_covers_a_control() {
        let fw = framework(vec![control(
            "CC6.1",
            AgentRelevance::Critical,
            vec![mapping(PolicyPattern::Block, &["exec.*"], MappingCoverage::Full)],
        )]);
        let map = map_policies(&doc(vec![policy("p1", &["exec.run"], block_rule())]), &fw);

        assert_eq!(map.summary.covered, 1);
        assert_eq!(map.summary.coverage_percentage, 100);
        assert_eq!(map.controls[0].status, ControlStatus::Covered);
        assert_eq!(map.controls[0].matched_policies[0].policy_id, "p1");
        assert!(map.controls[0].gap_recommendations.is_empty());
    }

    #[test]
    fn partial_mapping_and_coverage_percentage() {
        let fw = framework(vec![
            control(
                "CC6.1",
                AgentRelevance::Critical,
                vec![mapping(PolicyPattern::Block, &[], MappingCoverage::Full)],
            ),
            control(
                "CC7.1",
                AgentRelevance::High,
                vec![mapping(
                    PolicyPattern::RateLimit,
                    &[],
                    MappingCoverage::Partial,
                )],
            ),
        ]);
        let rate = PolicyRule {
            dashclaw_type: Some("rate_limit".into()),
            ..Default::default()
        };
        let map = map_policies(
            &doc(vec![
                policy("p1", &["deploy"], block_rule()),
                policy("p2", &["*"], rate),
            ]),
            &fw,
        );

        assert_eq!(map.summary.covered, 1);
        assert_eq!(map.summary.partial, 1);
        // (1 + 0.5) / 2 = 75%
        assert_eq!(map.summary.coverage_percentage, 75);
        assert_eq!(map.controls[1].status, ControlStatus::Partial);
        assert_eq!(map.controls[1].gap_recommendations.len(), 1);
    }

    #[test]
    fn unmatched_control_is_a_gap() {
        let fw = framework(vec![control(
            "CC9.9",
            AgentRelevance::Low,
            vec![mapping(PolicyPattern::DryRun, &[], MappingCoverage::Full)],
        )]);
        let map = map_policies(&doc(vec![policy("p1", &["deploy"], block_rule())]), &fw);
        assert_eq!(map.summary.gaps, 1);
        assert_eq!(map.controls[0].status, ControlStatus::Gap);
    }

    #[test]
    fn tool_pattern_wildcards_intersect_both_directions() {
        let fw = framework(vec![control(
            "CC6.1",
            AgentRelevance::Critical,
            vec![mapping(
                PolicyPattern::Block,
                &["db.write"],
                MappingCoverage::Full,
            )],
        )]);
        // policy tool is the wildcard side
        let map = map_policies(&doc(vec![policy("p1", &["db.*"], block_rule())]), &fw);
        assert_eq!(map.controls[0].status, ControlStatus::Covered);

        // no intersection at all
        let miss = map_policies(&doc(vec![policy("p1", &["fs.*"], block_rule())]), &fw);
        assert_eq!(miss.controls[0].status, ControlStatus::Gap);
    }

    #[test]
    fn any_active_policy_matches_everything() {
        let fw = framework(vec![control(
            "CC1.1",
            AgentRelevance::Medium,
            vec![mapping(
                PolicyPattern::AnyActivePolicy,
                &[],
                MappingCoverage::Partial,
            )],
        )]);
        let map = map_policies(&doc(vec![policy("p1", &["x"], PolicyRule::default())]), &fw);
        assert_eq!(map.controls[0].status, ControlStatus::Partial);
    }

    #[test]
    fn wildcard_match_spans_segments() {
        assert!(wildcard_match("exec.*", "exec.run"));
        assert!(wildcard_match("*.write", "db.write"));
        assert!(wildcard_match("db.*.prod", "db.write.prod"));
        assert!(!wildcard_match("exec.*", "read.file"));
        assert!(!wildcard_match("db.*.prod", "db.write.staging"));
    }
}
