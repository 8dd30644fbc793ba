//! Profile-level scoring: one action or a batch against a profile.

use dashclaw_types::{ActionRecord, CompositeMethod, RawValue, ScoringProfile};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::composite::{compute_composite, WeightedScore};
use crate::error::ScoringError;
use crate::extract::extract_raw_value;
use crate::round2;
use crate::scale::score_dimension_value;

/// Per-dimension breakdown of an action score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DimensionResult {
    pub dimension_id: String,
    pub dimension_name: String,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<RawValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Composite score of one action against one profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionScore {
    pub profile_id: String,
    pub profile_name: String,
    pub action_id: String,
    pub agent_id: String,
    pub composite_score: f64,
    pub composite_method: CompositeMethod,
    pub dimensions: Vec<DimensionResult>,
}

/// Score one action against a profile.
///
/// Returns the composite plus the full per-dimension breakdown. Fails only
/// structurally: a profile without dimensions, or an action where no
/// dimension produced a score.
pub fn score_action(
    profile: &ScoringProfile,
    action: &ActionRecord,
) -> Result<ActionScore, ScoringError> {
    if profile.dimensions.is_empty() {
        return Err(ScoringError::NoDimensions {
            profile_id: profile.id.clone(),
        });
    }

    let dimensions: Vec<DimensionResult> = profile
        .dimensions
        .iter()
        .map(|dim| {
            let extraction = extract_raw_value(action, dim);
            let scored = score_dimension_value(extraction.value.as_ref(), &dim.scale);
            DimensionResult {
                dimension_id: dim.id.clone(),
                dimension_name: dim.name.clone(),
                weight: dim.weight,
                raw_value: extraction.value,
                score: scored.score,
                label: scored.label,
                error: extraction.error,
            }
        })
        .collect();

    let weighted: Vec<WeightedScore> = dimensions
        .iter()
        .map(|d| WeightedScore {
            score: d.score,
            weight: d.weight,
        })
        .collect();

    let composite_score = compute_composite(&weighted, profile.composite_method).ok_or_else(|| {
        ScoringError::NoScoreableData {
            action_id: action.action_id.clone(),
        }
    })?;

    debug!(
        profile = %profile.id,
        action = %action.action_id,
        composite = composite_score,
        "scored action"
    );

    Ok(ActionScore {
        profile_id: profile.id.clone(),
        profile_name: profile.name.clone(),
        action_id: action.action_id.clone(),
        agent_id: action.agent_id.clone(),
        composite_score,
        composite_method: profile.composite_method,
        dimensions,
    })
}

/// One entry of a batch run: a score, or the error that kept the action
/// from scoring.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Scored(ActionScore),
    Failed { action_id: String, error: String },
}

/// Aggregate stats over a batch run. `avg_score` ignores unscored entries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub scored: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_score: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchScoreResult {
    pub results: Vec<BatchEntry>,
    pub summary: BatchSummary,
}

/// Score a list of actions against one profile. Individual failures are
/// recorded per entry; they never abort the batch.
pub fn batch_score_actions(profile: &ScoringProfile, actions: &[ActionRecord]) -> BatchScoreResult {
    let results: Vec<BatchEntry> = actions
        .iter()
        .map(|action| match score_action(profile, action) {
            Ok(score) => BatchEntry::Scored(score),
            Err(err) => BatchEntry::Failed {
                action_id: action.action_id.clone(),
                error: err.to_string(),
            },
        })
        .collect();

    let scored: Vec<f64> = results
        .iter()
        .filter_map(|entry| match entry {
            BatchEntry::Scored(s) => Some(s.composite_score),
            BatchEntry::Failed { .. } => None,
        })
        .collect();

    let avg_score = if scored.is_empty() {
        None
    } else {
        Some(round2(scored.iter().sum::<f64>() / scored.len() as f64))
    };

    BatchScoreResult {
        summary: BatchSummary {
            total: actions.len(),
            scored: scored.len(),
            avg_score,
        },
        results,
    }
}
