//! Automatic risk scoring from risk templates.

use dashclaw_types::{ActionRecord, ProfileStatus, RiskTemplate};
use tracing::debug;

use crate::condition::evaluate_condition;

/// Compute an automatic risk score for an action from the matching risk
/// templates.
///
/// A template matches when it is active and either carries no action_type
/// (catch-all) or its action_type equals the action's. A type-specific
/// template beats a catch-all. The score is the template's base risk plus
/// the `add` amounts of every rule whose condition holds, clamped to
/// 0-100. No matching template yields `None`.
pub fn compute_auto_risk(action: &ActionRecord, templates: &[RiskTemplate]) -> Option<f64> {
    let matching: Vec<&RiskTemplate> = templates
        .iter()
        .filter(|t| {
            t.status == ProfileStatus::Active
                && t.action_type
                    .as_deref()
                    .map_or(true, |at| at == action.action_type)
        })
        .collect();

    let template = matching
        .iter()
        .find(|t| t.action_type.as_deref() == Some(action.action_type.as_str()))
        .or_else(|| matching.first())?;

    let mut risk = template.base_risk;
    for rule in &template.rules {
        if evaluate_condition(&rule.condition, action) {
            risk += rule.add;
        }
    }

    let clamped = risk.clamp(0.0, 100.0);
    debug!(
        template = %template.id,
        action = %action.action_id,
        risk = clamped,
        "computed auto risk"
    );
    Some(clamped)
}
