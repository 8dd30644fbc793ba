//! The risk-template condition DSL.
//!
//! Conditions have the exact shape `<dot-path> <operator> <literal>`, e.g.
//! `metadata.environment == 'production'` or `risk_score >= 70`. A
//! malformed condition, a missing field, or a type mismatch all evaluate
//! to `false`; condition evaluation never fails.

use dashclaw_types::ActionRecord;
use serde_json::Value;

use crate::extract::json_to_number;
use crate::path::resolve_path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CondOp {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
    Contains,
}

#[derive(Clone, Debug, PartialEq)]
enum Literal {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

/// Evaluate a condition string against an action record.
pub fn evaluate_condition(condition: &str, action: &ActionRecord) -> bool {
    let Some((path, op, literal)) = parse(condition) else {
        return false;
    };
    let Ok(scope) = serde_json::to_value(action) else {
        return false;
    };
    let Some(field) = resolve_path(&scope, &path) else {
        return false;
    };
    compare(field, op, &literal)
}

/// Split on the first recognized operator. Two-character operators are
/// tried before their one-character prefixes so `>=` never parses as `>`.
fn parse(condition: &str) -> Option<(String, CondOp, Literal)> {
    let condition = condition.trim();
    if condition.is_empty() {
        return None;
    }

    const OPS: [(&str, CondOp); 6] = [
        ("==", CondOp::Eq),
        ("!=", CondOp::Ne),
        (">=", CondOp::Ge),
        ("<=", CondOp::Le),
        (">", CondOp::Gt),
        ("<", CondOp::Lt),
    ];

    for (symbol, op) in OPS {
        if let Some(idx) = condition.find(symbol) {
            let path = condition[..idx].trim();
            let rest = condition[idx + symbol.len()..].trim();
            if path.is_empty() || rest.is_empty() {
                return None;
            }
            return Some((path.to_string(), op, parse_literal(rest)));
        }
    }

    // `contains` is a word operator: `declared_goal contains deploy`
    let lower = condition.to_lowercase();
    if let Some(idx) = lower.find(" contains ") {
        let path = condition[..idx].trim();
        let rest = condition[idx + " contains ".len()..].trim();
        if path.is_empty() || rest.is_empty() {
            return None;
        }
        return Some((path.to_string(), CondOp::Contains, parse_literal(rest)));
    }

    None
}

fn parse_literal(raw: &str) -> Literal {
    let unquoted = raw
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')));
    if let Some(text) = unquoted {
        return Literal::Text(text.to_string());
    }
    match raw {
        "true" => Literal::Bool(true),
        "false" => Literal::Bool(false),
        "null" => Literal::Null,
        _ => raw
            .parse::<f64>()
            .map(Literal::Number)
            .unwrap_or_else(|_| Literal::Text(raw.to_string())),
    }
}

fn compare(field: &Value, op: CondOp, literal: &Literal) -> bool {
    match op {
        CondOp::Eq => loose_eq(field, literal),
        CondOp::Ne => !loose_eq(field, literal),
        CondOp::Ge | CondOp::Le | CondOp::Gt | CondOp::Lt => {
            let (Some(a), Some(b)) = (json_to_number(field), literal_number(literal)) else {
                return false;
            };
            match op {
                CondOp::Ge => a >= b,
                CondOp::Le => a <= b,
                CondOp::Gt => a > b,
                CondOp::Lt => a < b,
                _ => unreachable!(),
            }
        }
        CondOp::Contains => {
            let haystack = canonical(field).to_lowercase();
            let needle = literal_text(literal).to_lowercase();
            !needle.is_empty() && haystack.contains(&needle)
        }
    }
}

/// Loose equality in the spirit of the DSL: numbers compare numerically,
/// everything else by canonical string form.
fn loose_eq(field: &Value, literal: &Literal) -> bool {
    if let (Some(a), Some(b)) = (json_to_number(field), literal_number(literal)) {
        return a == b;
    }
    canonical(field) == literal_text(literal)
}

fn literal_number(literal: &Literal) -> Option<f64> {
    match literal {
        Literal::Number(n) => Some(*n),
        Literal::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Literal::Text(s) => s.parse().ok(),
        Literal::Null => None,
    }
}

fn literal_text(literal: &Literal) -> String {
    match literal {
        Literal::Text(s) => s.clone(),
        Literal::Number(n) => format_number(*n),
        Literal::Bool(b) => b.to_string(),
        Literal::Null => "null".into(),
    }
}

fn canonical(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_default(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".into(),
        other => other.to_string(),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
