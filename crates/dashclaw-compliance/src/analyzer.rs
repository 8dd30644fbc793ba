//! Gap analysis: turn a compliance map into a prioritized remediation
//! plan with effort estimates and a risk posture.

use chrono::{DateTime, Utc};
use dashclaw_types::AgentRelevance;
use serde::{Deserialize, Serialize};

use crate::mapper::{ComplianceMap, ComplianceSummary, ControlMapping, ControlStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    /// Posture from coverage percentage, shared with the reporter.
    pub fn from_coverage(pct: u32) -> Self {
        if pct >= 80 {
            RiskLevel::Low
        } else if pct >= 60 {
            RiskLevel::Medium
        } else if pct >= 40 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemediationItem {
    pub priority: usize,
    pub control_id: String,
    pub title: String,
    pub status: ControlStatus,
    pub agent_relevance: AgentRelevance,
    pub recommendations: Vec<String>,
    pub estimated_effort: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GapSummary {
    #[serde(flatten)]
    pub coverage: ComplianceSummary,
    pub critical_gaps: usize,
    pub high_gaps: usize,
    pub total_remediation_items: usize,
    pub estimated_total_effort: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk: RiskLevel,
    pub narrative: String,
    pub immediate_actions: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub framework: String,
    pub analysis_date: DateTime<Utc>,
    pub summary: GapSummary,
    pub remediation_plan: Vec<RemediationItem>,
    pub quick_wins: Vec<RemediationItem>,
    pub risk_assessment: RiskAssessment,
}

/// Analyze a compliance map.
///
/// Gaps come before partials; within each bucket controls sort by agent
/// relevance, critical first. Quick wins are items estimated at two hours
/// or less.
pub fn analyze_gaps(map: &ComplianceMap) -> GapAnalysis {
    let gaps: Vec<&ControlMapping> = map
        .controls
        .iter()
        .filter(|c| c.status == ControlStatus::Gap)
        .collect();
    let partials: Vec<&ControlMapping> = map
        .controls
        .iter()
        .filter(|c| c.status == ControlStatus::Partial)
        .collect();

    let mut prioritized: Vec<&ControlMapping> = gaps.iter().chain(partials.iter()).copied().collect();
    prioritized.sort_by_key(|c| c.agent_relevance.priority_rank());

    let remediation_plan: Vec<RemediationItem> = prioritized
        .iter()
        .enumerate()
        .map(|(index, control)| RemediationItem {
            priority: index + 1,
            control_id: control.control_id.clone(),
            title: control.title.clone(),
            status: control.status,
            agent_relevance: control.agent_relevance,
            recommendations: control.gap_recommendations.clone(),
            estimated_effort: estimate_effort(control).to_string(),
        })
        .collect();

    let total_hours: u32 = remediation_plan
        .iter()
        .map(|item| effort_hours(&item.estimated_effort))
        .sum();

    let quick_wins: Vec<RemediationItem> = remediation_plan
        .iter()
        .filter(|item| effort_hours(&item.estimated_effort) <= 2)
        .cloned()
        .collect();

    GapAnalysis {
        framework: map.framework.clone(),
        analysis_date: Utc::now(),
        summary: GapSummary {
            coverage: map.summary,
            critical_gaps: gaps
                .iter()
                .filter(|g| g.agent_relevance == AgentRelevance::Critical)
                .count(),
            high_gaps: gaps
                .iter()
                .filter(|g| g.agent_relevance == AgentRelevance::High)
                .count(),
            total_remediation_items: remediation_plan.len(),
            estimated_total_effort: format!(
                "{total_hours}-{} hours",
                (total_hours as f64 * 1.5).round() as u32
            ),
        },
        risk_assessment: risk_assessment(&map.summary, &gaps),
        remediation_plan,
        quick_wins,
    }
}

fn estimate_effort(control: &ControlMapping) -> &'static str {
    match control.gap_recommendations.len() {
        0 | 1 => "1-2 hours",
        2 => "2-4 hours",
        3 => "4-8 hours",
        _ => "8-16 hours",
    }
}

/// Leading number of an effort bucket, the optimistic bound.
fn effort_hours(effort: &str) -> u32 {
    effort
        .split(|c: char| !c.is_ascii_digit())
        .find(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
        .unwrap_or(4)
}

fn risk_assessment(summary: &ComplianceSummary, gaps: &[&ControlMapping]) -> RiskAssessment {
    let pct = summary.coverage_percentage;
    let overall_risk = RiskLevel::from_coverage(pct);
    let narrative = match overall_risk {
        RiskLevel::Low => format!(
            "Strong compliance posture with {pct}% coverage. Focus on closing remaining gaps to achieve full compliance."
        ),
        RiskLevel::Medium => format!(
            "Moderate compliance posture with {pct}% coverage. Several controls have gaps that should be addressed before the next audit cycle."
        ),
        RiskLevel::High => format!(
            "Below-target compliance posture with {pct}% coverage. Significant gaps exist that pose risk to audit readiness. Prioritize critical and high-relevance controls."
        ),
        RiskLevel::Critical => format!(
            "Critical compliance gaps with only {pct}% coverage. Immediate remediation required. Agent operations may not meet minimum regulatory requirements."
        ),
    };

    let immediate_actions = gaps
        .iter()
        .filter(|g| g.agent_relevance == AgentRelevance::Critical)
        .map(|gap| {
            format!(
                "Address {} ({}): {}",
                gap.control_id,
                gap.title,
                gap.gap_recommendations
                    .first()
                    .map(String::as_str)
                    .unwrap_or("Review and remediate")
            )
        })
        .collect();

    RiskAssessment {
        overall_risk,
        narrative,
        immediate_actions,
    }
}
