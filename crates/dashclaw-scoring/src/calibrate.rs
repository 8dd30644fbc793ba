//! Auto-calibration: suggest dimension scales from observed distributions.
//!
//! Given a window of historical actions, compute per-metric percentile
//! distributions and turn them into suggested scale rules, so profile
//! thresholds track what the fleet actually does instead of guesses.

use dashclaw_types::{ActionRecord, DataSource, RuleValue, ScaleOp, ScaleRule};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::round2;

/// Minimum actions before calibration is attempted at all.
const MIN_ACTIONS: usize = 10;
/// Minimum samples a single metric needs to yield a suggestion.
const MIN_METRIC_SAMPLES: usize = 5;

/// Options for [`auto_calibrate`]. The engine performs no I/O: callers
/// fetch the candidate actions, and `lookback_days` is echoed into the
/// report to document the window that was queried.
#[derive(Clone, Debug)]
pub struct CalibrateOptions {
    pub action_type: Option<String>,
    pub agent_id: Option<String>,
    pub lookback_days: u32,
    pub metrics: Vec<DataSource>,
}

impl Default for CalibrateOptions {
    fn default() -> Self {
        Self {
            action_type: None,
            agent_id: None,
            lookback_days: 30,
            metrics: vec![
                DataSource::DurationMs,
                DataSource::CostEstimate,
                DataSource::TokensTotal,
                DataSource::RiskScore,
                DataSource::Confidence,
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationStatus {
    Ok,
    InsufficientData,
}

/// Percentile summary of one metric's observed values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricDistribution {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub min: f64,
    pub max: f64,
}

/// Suggested scale and weight for one metric.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScaleSuggestion {
    pub metric: String,
    pub data_source: DataSource,
    pub lower_is_better: bool,
    pub sample_size: usize,
    pub distribution: MetricDistribution,
    pub suggested_scale: Vec<ScaleRule>,
    pub suggested_weight: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub status: CalibrationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub count: usize,
    pub action_type: String,
    pub lookback_days: u32,
    pub suggestions: Vec<ScaleSuggestion>,
}

/// Derive scale suggestions from historical actions.
///
/// Actions are narrowed by `action_type` and `agent_id` when set. Each
/// requested metric with enough samples gets a percentile distribution and
/// a four-band suggested scale oriented by whether lower values are better
/// for that metric.
pub fn auto_calibrate(actions: &[ActionRecord], options: &CalibrateOptions) -> CalibrationReport {
    let filtered: Vec<&ActionRecord> = actions
        .iter()
        .filter(|a| {
            options
                .action_type
                .as_deref()
                .map_or(true, |t| t == a.action_type)
                && options
                    .agent_id
                    .as_deref()
                    .map_or(true, |id| id == a.agent_id)
        })
        .collect();

    let action_type_label = options
        .action_type
        .clone()
        .unwrap_or_else(|| "(all)".to_string());

    if filtered.len() < MIN_ACTIONS {
        return CalibrationReport {
            status: CalibrationStatus::InsufficientData,
            message: Some(format!(
                "Need at least {MIN_ACTIONS} actions, found {}",
                filtered.len()
            )),
            count: filtered.len(),
            action_type: action_type_label,
            lookback_days: options.lookback_days,
            suggestions: Vec::new(),
        };
    }

    let mut suggestions = Vec::new();
    for source in &options.metrics {
        let Some(metric) = metric_name(*source) else {
            continue;
        };
        let mut values: Vec<f64> = filtered
            .iter()
            .filter_map(|a| metric_value(a, *source))
            .filter(|v| v.is_finite())
            .collect();
        if values.len() < MIN_METRIC_SAMPLES {
            debug!(metric, samples = values.len(), "skipping sparse metric");
            continue;
        }
        values.sort_by(|a, b| a.total_cmp(b));

        let distribution = distribution_of(&values);
        let lower_is_better = is_lower_better(*source);
        suggestions.push(ScaleSuggestion {
            metric: metric.to_string(),
            data_source: *source,
            lower_is_better,
            sample_size: values.len(),
            suggested_scale: suggest_scale(&distribution, lower_is_better),
            suggested_weight: suggested_weight(*source),
            distribution,
        });
    }

    CalibrationReport {
        status: CalibrationStatus::Ok,
        message: None,
        count: filtered.len(),
        action_type: action_type_label,
        lookback_days: options.lookback_days,
        suggestions,
    }
}

fn metric_name(source: DataSource) -> Option<&'static str> {
    match source {
        DataSource::DurationMs => Some("duration_ms"),
        DataSource::CostEstimate => Some("cost_estimate"),
        DataSource::TokensTotal => Some("tokens_total"),
        DataSource::RiskScore => Some("risk_score"),
        DataSource::Confidence => Some("confidence"),
        // Metadata fields and custom functions have no fleet-wide meaning.
        DataSource::MetadataField | DataSource::CustomFunction => None,
    }
}

fn metric_value(action: &ActionRecord, source: DataSource) -> Option<f64> {
    match source {
        DataSource::DurationMs => action.duration_ms,
        DataSource::CostEstimate => action.cost_estimate,
        DataSource::TokensTotal => {
            let total = action.tokens_total();
            (total > 0).then_some(total as f64)
        }
        DataSource::RiskScore => action.risk_score,
        DataSource::Confidence => action.confidence,
        DataSource::MetadataField | DataSource::CustomFunction => None,
    }
}

fn is_lower_better(source: DataSource) -> bool {
    !matches!(source, DataSource::Confidence)
}

fn suggested_weight(source: DataSource) -> f64 {
    match source {
        DataSource::RiskScore => 0.3,
        DataSource::DurationMs | DataSource::CostEstimate | DataSource::Confidence => 0.2,
        DataSource::TokensTotal => 0.1,
        DataSource::MetadataField | DataSource::CustomFunction => 0.15,
    }
}

/// Nearest-rank percentile over a sorted slice: index floor(len * p),
/// clamped to the last element.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = ((sorted.len() as f64 * p) as usize).min(sorted.len() - 1);
    sorted[idx]
}

fn distribution_of(sorted: &[f64]) -> MetricDistribution {
    MetricDistribution {
        p10: percentile(sorted, 0.10),
        p25: percentile(sorted, 0.25),
        p50: percentile(sorted, 0.50),
        p75: percentile(sorted, 0.75),
        p90: percentile(sorted, 0.90),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    }
}

fn suggest_scale(dist: &MetricDistribution, lower_is_better: bool) -> Vec<ScaleRule> {
    let rule = |label: &str, operator: ScaleOp, value: f64, score: f64| ScaleRule {
        label: label.to_string(),
        operator,
        value: RuleValue::Number(round2(value)),
        score,
    };
    if lower_is_better {
        vec![
            rule("excellent", ScaleOp::Lte, dist.p25, 100.0),
            rule("good", ScaleOp::Lte, dist.p50, 75.0),
            rule("acceptable", ScaleOp::Lte, dist.p75, 50.0),
            rule("poor", ScaleOp::Gt, dist.p75, 20.0),
        ]
    } else {
        vec![
            rule("excellent", ScaleOp::Gte, dist.p75, 100.0),
            rule("good", ScaleOp::Gte, dist.p50, 75.0),
            rule("acceptable", ScaleOp::Gte, dist.p25, 50.0),
            rule("poor", ScaleOp::Lt, dist.p25, 20.0),
        ]
    }
}
