//! Raw value extraction: dimension data source -> value from an action.

use dashclaw_types::{ActionRecord, DataSource, Dimension, RawValue};
use serde_json::Value;

use crate::expr;
use crate::path::resolve_path;

/// Outcome of extracting a dimension's raw value from an action.
///
/// `error` is populated only by the custom-function path, where a
/// malformed expression should be visible to the caller without aborting
/// the rest of the profile.
#[derive(Clone, Debug, Default)]
pub struct Extraction {
    pub value: Option<RawValue>,
    pub error: Option<String>,
}

impl Extraction {
    fn value(value: Option<RawValue>) -> Self {
        Self { value, error: None }
    }

    fn failed(message: String) -> Self {
        Self {
            value: None,
            error: Some(message),
        }
    }
}

/// Extract the raw value a dimension scores, per its data source.
///
/// Top-level telemetry fields fall back to the action's metadata under the
/// same key. `tokens_total` sums prompt and completion tokens (missing
/// treated as 0) and consults `metadata.tokens_total` only when the sum is
/// zero. Missing data resolves to `None`, never an error.
pub fn extract_raw_value(action: &ActionRecord, dimension: &Dimension) -> Extraction {
    match dimension.data_source {
        DataSource::DurationMs => {
            Extraction::value(number_with_metadata_fallback(action, action.duration_ms, "duration_ms"))
        }
        DataSource::CostEstimate => Extraction::value(number_with_metadata_fallback(
            action,
            action.cost_estimate,
            "cost_estimate",
        )),
        DataSource::TokensTotal => {
            let sum = action.tokens_total();
            if sum > 0 {
                Extraction::value(Some(RawValue::Number(sum as f64)))
            } else {
                Extraction::value(metadata_value(action, "tokens_total"))
            }
        }
        DataSource::RiskScore => Extraction::value(action.risk_score.map(RawValue::Number)),
        DataSource::Confidence => {
            Extraction::value(number_with_metadata_fallback(action, action.confidence, "confidence"))
        }
        DataSource::MetadataField => {
            let Some(field) = dimension.data_config.field.as_deref() else {
                return Extraction::value(None);
            };
            Extraction::value(
                resolve_path(&action.metadata, field).and_then(json_to_raw),
            )
        }
        DataSource::CustomFunction => {
            let Some(body) = dimension.data_config.function_body.as_deref() else {
                return Extraction::value(None);
            };
            match expr::evaluate(body, action) {
                Ok(value) => Extraction::value(Some(RawValue::Number(value))),
                Err(message) => Extraction::failed(message),
            }
        }
    }
}

fn number_with_metadata_fallback(
    action: &ActionRecord,
    field: Option<f64>,
    key: &str,
) -> Option<RawValue> {
    field
        .map(RawValue::Number)
        .or_else(|| metadata_value(action, key))
}

fn metadata_value(action: &ActionRecord, key: &str) -> Option<RawValue> {
    resolve_path(&action.metadata, key).and_then(json_to_raw)
}

/// Convert a JSON scalar into a raw value. Objects and arrays do not score.
pub(crate) fn json_to_raw(value: &Value) -> Option<RawValue> {
    match value {
        Value::Number(n) => n.as_f64().map(RawValue::Number),
        Value::String(s) => Some(RawValue::Text(s.clone())),
        Value::Bool(b) => Some(RawValue::Bool(*b)),
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    }
}

/// Loose numeric coercion, matching the comparison semantics of the
/// condition DSL: booleans become 0/1, numeric strings parse.
pub(crate) fn json_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashclaw_types::DataConfig;
    use serde_json::json;

    fn dimension(source: DataSource, config: DataConfig) -> Dimension {
        Dimension {
            id: "sd_1".into(),
            name: "test".into(),
            description: String::new(),
            weight: 1.0,
            data_source: source,
            data_config: config,
            scale: vec![],
            sort_order: 0,
        }
    }

    #[test]
    fn duration_prefers_top_level_field() {
        let action = ActionRecord {
            duration_ms: Some(1500.0),
            metadata: json!({"duration_ms": 9000}),
            ..Default::default()
        };
        let extraction = extract_raw_value(&action, &dimension(DataSource::DurationMs, DataConfig::default()));
        assert_eq!(extraction.value, Some(RawValue::Number(1500.0)));
    }

    #[test]
    fn duration_falls_back_to_metadata() {
        let action = ActionRecord {
            metadata: json!({"duration_ms": 9000}),
            ..Default::default()
        };
        let extraction = extract_raw_value(&action, &dimension(DataSource::DurationMs, DataConfig::default()));
        assert_eq!(extraction.value, Some(RawValue::Number(9000.0)));
    }

    #[test]
    fn tokens_total_sums_then_falls_back() {
        let action = ActionRecord {
            prompt_tokens: Some(100),
            completion_tokens: Some(50),
            ..Default::default()
        };
        let dim = dimension(DataSource::TokensTotal, DataConfig::default());
        assert_eq!(
            extract_raw_value(&action, &dim).value,
            Some(RawValue::Number(150.0))
        );

        let zero = ActionRecord {
            metadata: json!({"tokens_total": 800}),
            ..Default::default()
        };
        assert_eq!(
            extract_raw_value(&zero, &dim).value,
            Some(RawValue::Number(800.0))
        );
    }

    #[test]
    fn metadata_field_resolves_nested_path() {
        let action = ActionRecord {
            metadata: json!({"result": {"latency": 88}}),
            ..Default::default()
        };
        let dim = dimension(
            DataSource::MetadataField,
            DataConfig {
                field: Some("result.latency".into()),
                ..Default::default()
            },
        );
        assert_eq!(extract_raw_value(&action, &dim).value, Some(RawValue::Number(88.0)));
    }

    #[test]
    fn metadata_field_without_config_is_none() {
        let action = ActionRecord::default();
        let dim = dimension(DataSource::MetadataField, DataConfig::default());
        let extraction = extract_raw_value(&action, &dim);
        assert!(extraction.value.is_none());
        assert!(extraction.error.is_none());
    }

    #[test]
    fn custom_function_error_is_reported_not_thrown() {
        let action = ActionRecord::default();
        let dim = dimension(
            DataSource::CustomFunction,
            DataConfig {
                function_body: Some("duration_ms +".into()),
                ..Default::default()
            },
        );
        let extraction = extract_raw_value(&action, &dim);
        assert!(extraction.value.is_none());
        assert!(extraction.error.is_some());
    }

    #[test]
    fn custom_function_computes() {
        let action = ActionRecord {
            duration_ms: Some(2000.0),
            ..Default::default()
        };
        let dim = dimension(
            DataSource::CustomFunction,
            DataConfig {
                function_body: Some("duration_ms / 1000".into()),
                ..Default::default()
            },
        );
        assert_eq!(extract_raw_value(&action, &dim).value, Some(RawValue::Number(2.0)));
    }
}
