//! Drift detection: recent window vs baseline, per agent and metric.

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::baseline::compute_baseline;
use crate::error::DriftError;
use crate::round3;
use crate::stats::{mean, stddev, z_score, DriftSeverity, SeverityThresholds};

/// The fixed set of behavior metrics tracked for drift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftMetric {
    RiskScore,
    Confidence,
    DurationMs,
    CostEstimate,
    TokensTotal,
    LearningScore,
}

impl DriftMetric {
    pub const ALL: [DriftMetric; 6] = [
        DriftMetric::RiskScore,
        DriftMetric::Confidence,
        DriftMetric::DurationMs,
        DriftMetric::CostEstimate,
        DriftMetric::TokensTotal,
        DriftMetric::LearningScore,
    ];

    /// Human label used in alert descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            DriftMetric::RiskScore => "Risk Score",
            DriftMetric::Confidence => "Confidence",
            DriftMetric::DurationMs => "Duration (ms)",
            DriftMetric::CostEstimate => "Cost Estimate",
            DriftMetric::TokensTotal => "Total Tokens",
            DriftMetric::LearningScore => "Learning Score",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DriftMetric::RiskScore => "risk_score",
            DriftMetric::Confidence => "confidence",
            DriftMetric::DurationMs => "duration_ms",
            DriftMetric::CostEstimate => "cost_estimate",
            DriftMetric::TokensTotal => "tokens_total",
            DriftMetric::LearningScore => "learning_score",
        }
    }
}

/// Read-only capability the detector queries for metric history. The
/// caller owns storage, org scoping, and time-window resolution.
#[async_trait]
pub trait DriftStore: Send + Sync {
    /// Agents with any data for a metric.
    async fn list_agents(&self, metric: DriftMetric) -> Result<Vec<String>, DriftError>;

    /// Metric observations for an agent over the trailing `days`, oldest
    /// first. Null and non-positive duration/cost/token readings are
    /// excluded at the store.
    async fn metric_values(
        &self,
        agent_id: &str,
        metric: DriftMetric,
        days: u32,
    ) -> Result<Vec<f64>, DriftError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriftConfig {
    pub window_days: u32,
    pub baseline_days: u32,
    pub min_baseline_samples: usize,
    pub min_window_samples: usize,
    pub thresholds: SeverityThresholds,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            baseline_days: 30,
            min_baseline_samples: 5,
            min_window_samples: 3,
            thresholds: SeverityThresholds::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftDirection {
    Increasing,
    Decreasing,
}

/// One significant behavior shift.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriftAlert {
    pub metric: DriftMetric,
    pub agent_id: String,
    pub severity: DriftSeverity,
    pub z_score: f64,
    pub pct_change: f64,
    pub direction: DriftDirection,
    pub baseline_mean: f64,
    pub baseline_stddev: f64,
    pub current_mean: f64,
    pub current_stddev: f64,
    pub sample_count: usize,
    pub description: String,
}

/// Compares each agent's recent window against its baseline period for
/// every tracked metric, fanning the per-(agent, metric) checks out
/// concurrently against the store.
pub struct DriftDetector<S> {
    store: S,
    config: DriftConfig,
}

impl<S: DriftStore> DriftDetector<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, DriftConfig::default())
    }

    pub fn with_config(store: S, config: DriftConfig) -> Self {
        Self { store, config }
    }

    /// Run drift detection across all metrics, optionally narrowed to one
    /// agent. Agents or metrics without enough history are skipped, never
    /// errors.
    pub async fn detect(&self, agent_id: Option<&str>) -> Result<Vec<DriftAlert>, DriftError> {
        let mut pairs: Vec<(DriftMetric, String)> = Vec::new();
        for metric in DriftMetric::ALL {
            let agents = match agent_id {
                Some(id) => vec![id.to_string()],
                None => self.store.list_agents(metric).await?,
            };
            pairs.extend(agents.into_iter().map(|a| (metric, a)));
        }

        let checks = pairs.iter().map(|(metric, agent)| self.check(*metric, agent));
        let mut alerts = Vec::new();
        for result in join_all(checks).await {
            if let Some(alert) = result? {
                alerts.push(alert);
            }
        }
        debug!(alerts = alerts.len(), checked = pairs.len(), "drift detection pass");
        Ok(alerts)
    }

    async fn check(
        &self,
        metric: DriftMetric,
        agent_id: &str,
    ) -> Result<Option<DriftAlert>, DriftError> {
        let (baseline_values, current_values) = futures::try_join!(
            self.store
                .metric_values(agent_id, metric, self.config.baseline_days),
            self.store
                .metric_values(agent_id, metric, self.config.window_days),
        )?;

        if baseline_values.len() < self.config.min_baseline_samples {
            return Ok(None);
        }
        let Some(baseline) = compute_baseline(&baseline_values) else {
            return Ok(None);
        };
        if current_values.len() < self.config.min_window_samples {
            return Ok(None);
        }

        let current_mean = round3(mean(&current_values));
        let current_stddev = round3(stddev(&current_values, current_mean));
        let z = round3(z_score(current_mean, baseline.mean, baseline.stddev));
        let Some(severity) = self.config.thresholds.classify(z.abs()) else {
            return Ok(None);
        };

        let direction = if z > 0.0 {
            DriftDirection::Increasing
        } else {
            DriftDirection::Decreasing
        };
        let pct_change = if baseline.mean != 0.0 {
            round3((current_mean - baseline.mean) / baseline.mean * 100.0)
        } else {
            0.0
        };

        let description = format!(
            "{} for {} has {} by {}% (z-score: {}). Baseline mean: {}, current mean: {}.",
            metric.label(),
            agent_id,
            match direction {
                DriftDirection::Increasing => "increased",
                DriftDirection::Decreasing => "decreased",
            },
            fmt_num(pct_change.abs()),
            fmt_num(z),
            fmt_num(baseline.mean),
            fmt_num(current_mean),
        );

        Ok(Some(DriftAlert {
            metric,
            agent_id: agent_id.to_string(),
            severity,
            z_score: z,
            pct_change,
            direction,
            baseline_mean: baseline.mean,
            baseline_stddev: baseline.stddev,
            current_mean,
            current_stddev,
            sample_count: current_values.len(),
            description,
        }))
    }
}

fn fmt_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
