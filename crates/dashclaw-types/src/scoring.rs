//! Scoring profile definitions: profiles, dimensions, scales, risk templates.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a scoring profile or risk template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    #[default]
    Active,
    Archived,
}

/// How per-dimension scores are folded into a single composite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMethod {
    #[default]
    WeightedAverage,
    Minimum,
    GeometricMean,
}

/// Where a dimension reads its raw value from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    DurationMs,
    CostEstimate,
    TokensTotal,
    RiskScore,
    Confidence,
    MetadataField,
    CustomFunction,
}

/// Source-specific parameters for a dimension.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dot-path into action metadata, for `metadata_field` sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Expression body for `custom_function` sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_body: Option<String>,
}

/// Comparison operator for one scale rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleOp {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Between,
    Contains,
}

/// Target value of a scale rule: a scalar, a string, or a `[lo, hi]`
/// inclusive range for `between`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Number(f64),
    Text(String),
    Range([f64; 2]),
}

/// One rule in a dimension's quality scale. Rules are evaluated in
/// declaration order; the first match wins.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScaleRule {
    pub label: String,
    pub operator: ScaleOp,
    pub value: RuleValue,
    /// Quality score assigned on match (0-100).
    pub score: f64,
}

/// One scored axis of a profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dimension {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub data_source: DataSource,
    #[serde(default)]
    pub data_config: DataConfig,
    #[serde(default)]
    pub scale: Vec<ScaleRule>,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_weight() -> f64 {
    1.0
}

/// A configurable multi-dimension scoring profile.
///
/// Dimension weights need not sum to 1; weighted averaging normalizes by
/// the sum of weights that actually contributed a score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoringProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(default)]
    pub status: ProfileStatus,
    #[serde(default)]
    pub composite_method: CompositeMethod,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
}

/// A raw value extracted from an action before scale matching.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl RawValue {
    /// Numeric view; booleans coerce to 0/1, text parses when it can.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            RawValue::Text(s) => s.parse().ok(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// One additive rule of a risk template. `condition` uses the condition
/// DSL (`metadata.environment == 'production'`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskRule {
    pub condition: String,
    #[serde(default)]
    pub add: f64,
}

/// An automatic risk template: base risk plus additive condition rules.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(default)]
    pub base_risk: f64,
    #[serde(default)]
    pub rules: Vec<RiskRule>,
    #[serde(default)]
    pub status: ProfileStatus,
}
