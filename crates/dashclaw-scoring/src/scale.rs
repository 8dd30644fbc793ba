//! Scale matching: raw value -> quality score via ordered rules.

use dashclaw_types::{RawValue, RuleValue, ScaleOp, ScaleRule};
use serde::{Deserialize, Serialize};

/// Result of scoring one raw value against a dimension scale.
///
/// `label` carries the matched rule's label, or one of the sentinels
/// `no_data` (no value), `unscaled` (empty scale, raw value passed
/// through), `default` (no rule matched, lowest rule score used).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub score: Option<f64>,
    pub label: String,
}

impl DimensionScore {
    fn new(score: Option<f64>, label: impl Into<String>) -> Self {
        Self {
            score,
            label: label.into(),
        }
    }
}

/// Score a raw value against a scale. Rules are evaluated in declaration
/// order and the first satisfied rule wins. An empty scale passes the raw
/// value through unscaled.
pub fn score_dimension_value(value: Option<&RawValue>, scale: &[ScaleRule]) -> DimensionScore {
    let Some(value) = value else {
        return DimensionScore::new(None, "no_data");
    };

    if scale.is_empty() {
        return DimensionScore::new(value.as_f64(), "unscaled");
    }

    for rule in scale {
        if rule_matches(value, rule) {
            let label = if rule.label.is_empty() {
                "matched"
            } else {
                rule.label.as_str()
            };
            return DimensionScore::new(Some(rule.score), label);
        }
    }

    // No rule matched; fall back to the most pessimistic score in the scale.
    let lowest = scale
        .iter()
        .map(|r| r.score)
        .fold(f64::INFINITY, f64::min);
    DimensionScore::new(Some(lowest), "default")
}

fn rule_matches(value: &RawValue, rule: &ScaleRule) -> bool {
    match rule.operator {
        ScaleOp::Lt | ScaleOp::Lte | ScaleOp::Gt | ScaleOp::Gte => {
            let (Some(v), RuleValue::Number(target)) = (value.as_f64(), &rule.value) else {
                return false;
            };
            match rule.operator {
                ScaleOp::Lt => v < *target,
                ScaleOp::Lte => v <= *target,
                ScaleOp::Gt => v > *target,
                ScaleOp::Gte => v >= *target,
                _ => unreachable!(),
            }
        }
        ScaleOp::Eq => match (&rule.value, value) {
            (RuleValue::Number(target), v) => v.as_f64() == Some(*target),
            (RuleValue::Text(target), RawValue::Text(v)) => v == target,
            (RuleValue::Text(target), v) => {
                v.as_f64().map(|n| n.to_string()) == Some(target.clone())
            }
            (RuleValue::Range(_), _) => false,
        },
        ScaleOp::Between => {
            let (Some(v), RuleValue::Range([lo, hi])) = (value.as_f64(), &rule.value) else {
                return false;
            };
            v >= *lo && v <= *hi
        }
        ScaleOp::Contains => {
            let RuleValue::Text(target) = &rule.value else {
                return false;
            };
            match value {
                RawValue::Text(v) => v.to_lowercase().contains(&target.to_lowercase()),
                _ => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duration_scale() -> Vec<ScaleRule> {
        vec![
            rule("excellent", ScaleOp::Lt, RuleValue::Number(30_000.0), 100.0),
            rule("good", ScaleOp::Lt, RuleValue::Number(60_000.0), 75.0),
            rule("acceptable", ScaleOp::Lt, RuleValue::Number(120_000.0), 50.0),
            rule("poor", ScaleOp::Gte, RuleValue::Number(120_000.0), 20.0),
        ]
    }

    fn rule(label: &str, operator: ScaleOp, value: RuleValue, score: f64) -> ScaleRule {
        ScaleRule {
            label: label.into(),
            operator,
            value,
            score,
        }
    }

    #[test]
    fn first_match_wins_in_declaration_order() {
        let result = score_dimension_value(Some(&RawValue::Number(45_000.0)), &duration_scale());
        assert_eq!(result.score, Some(75.0));
        assert_eq!(result.label, "good");

        let fast = score_dimension_value(Some(&RawValue::Number(1_000.0)), &duration_scale());
        assert_eq!(fast.score, Some(100.0));
        assert_eq!(fast.label, "excellent");
    }

    #[test]
    fn no_value_is_no_data() {
        let result = score_dimension_value(None, &duration_scale());
        assert_eq!(result.score, None);
        assert_eq!(result.label, "no_data");
    }

    #[test]
    fn empty_scale_passes_raw_value_through() {
        let result = score_dimension_value(Some(&RawValue::Number(42.0)), &[]);
        assert_eq!(result.score, Some(42.0));
        assert_eq!(result.label, "unscaled");
    }

    #[test]
    fn unmatched_value_falls_back_to_lowest_score() {
        let scale = vec![
            rule("low", ScaleOp::Lt, RuleValue::Number(10.0), 80.0),
            rule("mid", ScaleOp::Between, RuleValue::Range([20.0, 30.0]), 40.0),
        ];
        let result = score_dimension_value(Some(&RawValue::Number(15.0)), &scale);
        assert_eq!(result.score, Some(40.0));
        assert_eq!(result.label, "default");
    }

    #[test]
    fn between_is_inclusive() {
        let scale = vec![rule("mid", ScaleOp::Between, RuleValue::Range([10.0, 20.0]), 60.0)];
        assert_eq!(
            score_dimension_value(Some(&RawValue::Number(10.0)), &scale).score,
            Some(60.0)
        );
        assert_eq!(
            score_dimension_value(Some(&RawValue::Number(20.0)), &scale).score,
            Some(60.0)
        );
        assert_eq!(
            score_dimension_value(Some(&RawValue::Number(20.01)), &scale).label,
            "default"
        );
    }

    #[test]
    fn contains_matches_substrings() {
        let scale = vec![rule(
            "prod",
            ScaleOp::Contains,
            RuleValue::Text("prod".into()),
            10.0,
        )];
        let hit = score_dimension_value(Some(&RawValue::Text("Production".into())), &scale);
        assert_eq!(hit.score, Some(10.0));
        assert_eq!(hit.label, "prod");
    }

    #[test]
    fn eq_matches_numbers_and_strings() {
        let scale = vec![rule("five", ScaleOp::Eq, RuleValue::Number(5.0), 90.0)];
        assert_eq!(
            score_dimension_value(Some(&RawValue::Number(5.0)), &scale).score,
            Some(90.0)
        );
        assert_eq!(
            score_dimension_value(Some(&RawValue::Text("5".into())), &scale).score,
            Some(90.0)
        );
    }
}
