//! Behavior recommendations mined from scored episode history.
//!
//! Episodes are grouped by (agent_id, action_type); each group with enough
//! samples yields one recommendation whose hints are computed from the top
//! scoring slice of the group.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::episode::OutcomeLabel;

/// A persisted, already-scored episode as fed back into the loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub agent_id: String,
    pub action_type: String,
    pub score: f64,
    pub outcome_label: OutcomeLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<f64>,
    #[serde(default)]
    pub reversible: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct RecommendationOptions {
    /// Minimum episodes per group, clamped to 2..=100.
    pub min_samples: usize,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self { min_samples: 5 }
    }
}

/// Operating hints derived from the group's best episodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_risk_cap: Option<i64>,
    pub prefer_reversible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_floor: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_duration_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_cost_estimate: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recommendation {
    pub agent_id: String,
    pub action_type: String,
    pub sample_size: usize,
    pub top_sample_size: usize,
    pub success_rate: f64,
    pub avg_score: f64,
    pub confidence: i64,
    pub hints: RecommendationHints,
    pub guidance: Vec<String>,
}

/// Linear-interpolated quantile, `q` in 0..=1. Empty input yields `None`.
fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let base = pos.floor() as usize;
    let rest = pos - base as f64;
    match sorted.get(base + 1) {
        Some(next) => Some(sorted[base] + rest * (next - sorted[base])),
        None => Some(sorted[base]),
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn build_guidance(hints: &RecommendationHints, sample_size: usize, success_rate: f64) -> Vec<String> {
    let mut guidance = Vec::new();
    if let Some(cap) = hints.preferred_risk_cap {
        guidance.push(format!(
            "Keep risk_score at or below {cap} for this action type."
        ));
    }
    if hints.prefer_reversible {
        guidance.push("Prefer reversible execution strategies where possible.".to_string());
    }
    if let Some(floor) = hints.confidence_floor {
        guidance.push(format!("Target confidence >= {floor} before executing."));
    }
    if let Some(duration) = hints.expected_duration_ms {
        guidance.push(format!(
            "Typical successful runtime is around {duration}ms."
        ));
    }
    if let Some(cost) = hints.expected_cost_estimate {
        guidance.push(format!("Typical successful cost is about ${cost:.2}."));
    }
    if sample_size < 8 {
        guidance.push("Small sample size: treat this recommendation as provisional.".to_string());
    }
    if success_rate < 0.5 {
        guidance
            .push("Historical success rate is low: consider additional guard checks.".to_string());
    }
    guidance
}

/// Build recommendations from episode history.
///
/// Hints come from the top 35% of each group by score (at least 3
/// episodes), while success_rate and avg_score cover the whole group.
/// Output is sorted by confidence, then sample_size, both descending.
pub fn build_recommendations_from_episodes(
    episodes: &[EpisodeRecord],
    options: RecommendationOptions,
) -> Vec<Recommendation> {
    let min_samples = options.min_samples.clamp(2, 100);

    // Group by (agent_id, action_type), preserving first-seen order so
    // confidence ties sort stably.
    let mut order: Vec<(String, String)> = Vec::new();
    let mut grouped: std::collections::HashMap<(String, String), Vec<&EpisodeRecord>> =
        std::collections::HashMap::new();
    for episode in episodes {
        if episode.agent_id.is_empty() || episode.action_type.is_empty() {
            continue;
        }
        let key = (episode.agent_id.clone(), episode.action_type.clone());
        if !grouped.contains_key(&key) {
            order.push(key.clone());
        }
        grouped.entry(key).or_default().push(episode);
    }

    let mut recommendations = Vec::new();
    for key in &order {
        let group = &grouped[key];
        if group.len() < min_samples {
            continue;
        }

        let mut by_score: Vec<&EpisodeRecord> = group.clone();
        by_score.sort_by(|a, b| b.score.total_cmp(&a.score));
        let top_count = ((group.len() as f64 * 0.35).ceil() as usize).max(3);
        let top: Vec<&EpisodeRecord> = by_score.into_iter().take(top_count).collect();

        let risk_values: Vec<f64> = top.iter().filter_map(|e| e.risk_score).collect();
        let confidence_values: Vec<f64> = top.iter().filter_map(|e| e.confidence).collect();
        let duration_values: Vec<f64> = top.iter().filter_map(|e| e.duration_ms).collect();
        let cost_values: Vec<f64> = top.iter().filter_map(|e| e.cost_estimate).collect();
        let reversible_ratio = average(
            &top.iter()
                .map(|e| if e.reversible { 1.0 } else { 0.0 })
                .collect::<Vec<f64>>(),
        );

        let all_scores: Vec<f64> = group.iter().map(|e| e.score).collect();
        let avg_score = average(&all_scores);
        let success_rate = average(
            &group
                .iter()
                .map(|e| {
                    if e.outcome_label == OutcomeLabel::Success {
                        1.0
                    } else {
                        0.0
                    }
                })
                .collect::<Vec<f64>>(),
        );

        let hints = RecommendationHints {
            preferred_risk_cap: quantile(&risk_values, 0.75).map(|v| v.round() as i64),
            prefer_reversible: reversible_ratio >= 0.6,
            confidence_floor: quantile(&confidence_values, 0.25).map(|v| v.round() as i64),
            expected_duration_ms: quantile(&duration_values, 0.5).map(|v| v.round() as i64),
            expected_cost_estimate: quantile(&cost_values, 0.5)
                .map(|v| (v * 100.0).round() / 100.0),
        };

        let confidence = (35.0
            + (group.len() as f64 * 2.0).min(25.0)
            + success_rate * 25.0
            + (avg_score - 50.0) * 0.4)
            .round()
            .clamp(35.0, 95.0) as i64;

        recommendations.push(Recommendation {
            agent_id: key.0.clone(),
            action_type: key.1.clone(),
            sample_size: group.len(),
            top_sample_size: top.len(),
            success_rate: (success_rate * 10_000.0).round() / 10_000.0,
            avg_score: (avg_score * 100.0).round() / 100.0,
            confidence,
            guidance: build_guidance(&hints, group.len(), success_rate),
            hints,
        });
    }

    recommendations.sort_by(|a, b| {
        b.confidence
            .cmp(&a.confidence)
            .then(b.sample_size.cmp(&a.sample_size))
    });
    debug!(
        groups = order.len(),
        recommendations = recommendations.len(),
        "built recommendations"
    );
    recommendations
}
