//! Restricted arithmetic expressions for `custom_function` dimensions.
//!
//! Grammar: `+ - * /`, unary minus, parentheses, numeric literals, and
//! dot-path references into the action record (`duration_ms`,
//! `metadata.result.latency`). The expression is parsed into an AST and
//! evaluated against the action; there is no dynamic code execution and no
//! way to cause side effects.

use dashclaw_types::ActionRecord;
use serde_json::Value;

use crate::extract::json_to_number;
use crate::path::resolve_path;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Path(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

#[derive(Clone, Debug)]
enum Expr {
    Number(f64),
    Path(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
}

/// Evaluate an expression body against an action. Any parse or resolution
/// failure is returned as a message; callers surface it on the dimension
/// result instead of propagating.
pub fn evaluate(body: &str, action: &ActionRecord) -> Result<f64, String> {
    let tokens = tokenize(body)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    if parser.pos != parser.tokens.len() {
        return Err("unexpected trailing input".into());
    }
    let scope = serde_json::to_value(action).map_err(|e| e.to_string())?;
    eval(&expr, &scope)
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let number = text
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number: {text}"))?;
                tokens.push(Token::Number(number));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '.')
                {
                    i += 1;
                }
                tokens.push(Token::Path(chars[start..i].iter().collect()));
            }
            other => return Err(format!("unexpected character: {other}")),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_expr(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_term()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Plus => {
                    self.next();
                    left = Expr::Add(Box::new(left), Box::new(self.parse_term()?));
                }
                Token::Minus => {
                    self.next();
                    left = Expr::Sub(Box::new(left), Box::new(self.parse_term()?));
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_factor()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Star => {
                    self.next();
                    left = Expr::Mul(Box::new(left), Box::new(self.parse_factor()?));
                }
                Token::Slash => {
                    self.next();
                    left = Expr::Div(Box::new(left), Box::new(self.parse_factor()?));
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, String> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Path(p)) => Ok(Expr::Path(p)),
            Some(Token::Minus) => Ok(Expr::Neg(Box::new(self.parse_factor()?))),
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err("missing closing parenthesis".into()),
                }
            }
            other => Err(format!("unexpected token: {other:?}")),
        }
    }
}

fn eval(expr: &Expr, scope: &Value) -> Result<f64, String> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Path(path) => resolve_path(scope, path)
            .and_then(json_to_number)
            .ok_or_else(|| format!("field not found or not numeric: {path}")),
        Expr::Neg(inner) => Ok(-eval(inner, scope)?),
        Expr::Add(a, b) => Ok(eval(a, scope)? + eval(b, scope)?),
        Expr::Sub(a, b) => Ok(eval(a, scope)? - eval(b, scope)?),
        Expr::Mul(a, b) => Ok(eval(a, scope)? * eval(b, scope)?),
        Expr::Div(a, b) => {
            let divisor = eval(b, scope)?;
            if divisor == 0.0 {
                return Err("division by zero".into());
            }
            Ok(eval(a, scope)? / divisor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn action() -> ActionRecord {
        ActionRecord {
            duration_ms: Some(3000.0),
            cost_estimate: Some(0.5),
            metadata: json!({"result": {"latency": 120}}),
            ..Default::default()
        }
    }

    #[test]
    fn arithmetic_with_paths() {
        assert_eq!(evaluate("duration_ms / 1000", &action()).unwrap(), 3.0);
        assert_eq!(
            evaluate("metadata.result.latency * 2 + 10", &action()).unwrap(),
            250.0
        );
        assert_eq!(evaluate("(1 + 2) * -3", &action()).unwrap(), -9.0);
    }

    #[test]
    fn missing_field_is_an_error() {
        let err = evaluate("metadata.absent", &action()).unwrap_err();
        assert!(err.contains("metadata.absent"));
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(evaluate("duration_ms +", &action()).is_err());
        assert!(evaluate("1 ; drop", &action()).is_err());
        assert!(evaluate("(1 + 2", &action()).is_err());
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(evaluate("1 / 0", &action()).is_err());
    }
}
