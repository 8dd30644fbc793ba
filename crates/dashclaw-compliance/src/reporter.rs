//! Report rendering: audit-ready markdown and machine-readable JSON.

use serde_json::Value;

use crate::analyzer::RiskLevel;
use crate::error::ComplianceError;
use crate::mapper::{ComplianceMap, ControlMapping, ControlStatus};

const GENERATOR: &str = "DashClaw Compliance Engine";
const BAR_SLOTS: usize = 20;

fn status_icon(status: ControlStatus) -> &'static str {
    match status {
        ControlStatus::Covered => "\u{2705}",
        ControlStatus::Partial => "\u{26a0}\u{fe0f}",
        ControlStatus::Gap => "\u{274c}",
    }
}

fn relevance_str(mapping: &ControlMapping) -> String {
    serde_json::to_value(mapping.agent_relevance)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_default()
}

/// Render a compliance map as a markdown report: summary table, coverage
/// bar, controls grouped by category, remediation plan, risk level, and
/// an attestation footer.
pub fn generate_markdown_report(map: &ComplianceMap) -> String {
    let mut out = String::new();
    let summary = &map.summary;

    out.push_str(&format!("# {} Compliance Report\n\n", map.framework));
    out.push_str(&format!("**Project:** {}\n", map.project));
    out.push_str(&format!(
        "**Framework:** {} {}\n",
        map.framework, map.framework_version
    ));
    out.push_str(&format!(
        "**Generated:** {}\n\n",
        map.generated_at.to_rfc3339()
    ));

    out.push_str("## Summary\n\n");
    out.push_str("| Metric | Count |\n");
    out.push_str("| --- | --- |\n");
    out.push_str(&format!("| Total Controls | {} |\n", summary.total_controls));
    out.push_str(&format!("| Covered | {} |\n", summary.covered));
    out.push_str(&format!("| Partial | {} |\n", summary.partial));
    out.push_str(&format!("| Gaps | {} |\n\n", summary.gaps));
    out.push_str(&format!(
        "**Coverage:** **{}%**\n\n",
        summary.coverage_percentage
    ));

    let filled = ((summary.coverage_percentage as f64 / 100.0 * BAR_SLOTS as f64).round()
        as usize)
        .min(BAR_SLOTS);
    out.push_str(&format!(
        "`{}{}` {}%\n\n",
        "#".repeat(filled),
        "-".repeat(BAR_SLOTS - filled),
        summary.coverage_percentage
    ));

    out.push_str("## Controls\n");
    let mut categories: Vec<&str> = Vec::new();
    for control in &map.controls {
        if !categories.contains(&control.category.as_str()) {
            categories.push(&control.category);
        }
    }
    for category in categories {
        out.push_str(&format!("\n### {category}\n\n"));
        for control in map.controls.iter().filter(|c| c.category == category) {
            out.push_str(&format!(
                "- {} **{}** {} (relevance: {})\n",
                status_icon(control.status),
                control.control_id,
                control.title,
                relevance_str(control)
            ));
            for matched in &control.matched_policies {
                out.push_str(&format!(
                    "  - matched `{}`: {}\n",
                    matched.policy_id, matched.rationale
                ));
            }
            for recommendation in &control.gap_recommendations {
                out.push_str(&format!("  - recommendation: {recommendation}\n"));
            }
        }
    }

    let open: Vec<&ControlMapping> = map
        .controls
        .iter()
        .filter(|c| c.status != ControlStatus::Covered)
        .collect();
    if !open.is_empty() {
        out.push_str("\n## Remediation Plan\n\n");
        for (index, control) in open.iter().enumerate() {
            out.push_str(&format!(
                "{}. **{}** {} ({:?} relevance)\n",
                index + 1,
                control.control_id,
                control.title,
                control.agent_relevance
            ));
            for recommendation in &control.gap_recommendations {
                out.push_str(&format!("   - {recommendation}\n"));
            }
        }
    }

    let risk = RiskLevel::from_coverage(summary.coverage_percentage);
    out.push_str("\n## Risk Assessment\n\n");
    out.push_str(&format!("**Risk Level:** {}\n", risk.as_str()));

    out.push_str("\n## Attestation\n\n");
    out.push_str(&format!(
        "This report was generated automatically by the {GENERATOR} from the \
         active guardrail policy set. It reflects policy-to-control mapping at \
         generation time and does not constitute a formal audit opinion.\n"
    ));

    out
}

/// Serialize the map as a JSON report, tagged with its type and generator.
pub fn generate_json_report(map: &ComplianceMap) -> Result<String, ComplianceError> {
    let mut value = serde_json::to_value(map)?;
    if let Value::Object(obj) = &mut value {
        obj.insert("report_type".into(), Value::String("compliance_map".into()));
        obj.insert("generator".into(), Value::String(GENERATOR.into()));
    }
    Ok(serde_json::to_string_pretty(&value)?)
}
