//! LDAP-style attribute filter expressions.
//!
//! The grammar is the familiar parenthesized prefix form:
//!
//! ```text
//! filter     = "(" filtercomp ")"
//! filtercomp = "&" filter*          ; all children match ((&) matches everything)
//!            | "|" filter*          ; any child matches
//!            | "!" filter           ; child does not match
//!            | item
//! item       = key "=" pattern      ; pattern may contain "*" wildcards;
//!                                   ; a lone "*" tests presence
//! ```
//!
//! Expressions are parsed once, at specification construction time; a
//! malformed expression is rejected there with a position-bearing
//! [`SpecError::InvalidFilter`]. Evaluation is total: values that are not
//! scalars (or arrays of scalars) simply never match.

use serde_json::Value;

use crate::domain::Metadata;
use crate::error::{SpecError, SpecResult};

/// A parsed filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FilterExpr {
    /// All children match; empty matches everything.
    And(Vec<FilterExpr>),
    /// At least one child matches; empty matches nothing.
    Or(Vec<FilterExpr>),
    /// The child does not match.
    Not(Box<FilterExpr>),
    /// The key is present with any value.
    Present(String),
    /// The key's value matches a pattern (with `*` wildcards).
    Equals(String, String),
}

impl FilterExpr {
    /// Parses a filter expression, rejecting malformed input.
    pub(crate) fn parse(expression: &str) -> SpecResult<Self> {
        let bytes = expression.as_bytes();
        let mut parser = Parser {
            expression,
            bytes,
            position: 0,
        };
        let expr = parser.parse_filter()?;
        parser.skip_whitespace();
        if parser.position != bytes.len() {
            return Err(parser.error("trailing characters after filter"));
        }
        Ok(expr)
    }

    /// Evaluates this expression against metadata. Total; never fails.
    pub(crate) fn matches(&self, metadata: &Metadata) -> bool {
        match self {
            Self::And(children) => children.iter().all(|c| c.matches(metadata)),
            Self::Or(children) => children.iter().any(|c| c.matches(metadata)),
            Self::Not(child) => !child.matches(metadata),
            Self::Present(key) => metadata.contains_key(key),
            Self::Equals(key, pattern) => match metadata.get(key) {
                Some(value) => value_matches(value, pattern),
                None => false,
            },
        }
    }
}

/// Matches a metadata value against a pattern. Arrays match if any element
/// does; objects and null never match.
fn value_matches(value: &Value, pattern: &str) -> bool {
    match value {
        Value::String(text) => wildcard_match(pattern, text),
        Value::Number(n) => wildcard_match(pattern, &n.to_string()),
        Value::Bool(b) => wildcard_match(pattern, if *b { "true" } else { "false" }),
        Value::Array(items) => items.iter().any(|item| value_matches(item, pattern)),
        Value::Null | Value::Object(_) => false,
    }
}

/// Substring matching with `*` wildcards, anchored at both ends.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == text;
    }
    let parts: Vec<&str> = pattern.split('*').collect();

    let first = parts[0];
    let last = parts[parts.len() - 1];
    if !text.starts_with(first) {
        return false;
    }
    let mut rest = &text[first.len()..];

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match rest.find(part) {
            Some(index) => rest = &rest[index + part.len()..],
            None => return false,
        }
    }

    last.is_empty() || rest.ends_with(last)
}

// =============================================================================
// Parser
// =============================================================================

struct Parser<'a> {
    expression: &'a str,
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, reason: impl Into<String>) -> SpecError {
        SpecError::InvalidFilter {
            expression: self.expression.to_string(),
            position: self.position,
            reason: reason.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.position < self.bytes.len() && self.bytes[self.position].is_ascii_whitespace() {
            self.position += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn expect(&mut self, expected: u8) -> SpecResult<()> {
        if self.peek() == Some(expected) {
            self.position += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", expected as char)))
        }
    }

    fn parse_filter(&mut self) -> SpecResult<FilterExpr> {
        self.skip_whitespace();
        self.expect(b'(')?;
        let expr = match self.peek() {
            Some(b'&') => {
                self.position += 1;
                FilterExpr::And(self.parse_filter_list()?)
            }
            Some(b'|') => {
                self.position += 1;
                FilterExpr::Or(self.parse_filter_list()?)
            }
            Some(b'!') => {
                self.position += 1;
                FilterExpr::Not(Box::new(self.parse_filter()?))
            }
            Some(_) => self.parse_item()?,
            None => return Err(self.error("unexpected end of expression")),
        };
        self.skip_whitespace();
        self.expect(b')')?;
        Ok(expr)
    }

    fn parse_filter_list(&mut self) -> SpecResult<Vec<FilterExpr>> {
        let mut children = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'(') => children.push(self.parse_filter()?),
                Some(b')') => return Ok(children),
                Some(other) => {
                    return Err(self.error(format!("expected `(` or `)`, found `{}`", other as char)));
                }
                None => return Err(self.error("unexpected end of expression")),
            }
        }
    }

    fn parse_item(&mut self) -> SpecResult<FilterExpr> {
        let key_start = self.position;
        while let Some(b) = self.peek() {
            if b == b'=' || b == b')' || b == b'(' {
                break;
            }
            self.position += 1;
        }
        let key = self.expression[key_start..self.position].trim();
        if key.is_empty() {
            return Err(self.error("empty attribute key"));
        }
        self.expect(b'=')?;

        let value_start = self.position;
        while let Some(b) = self.peek() {
            if b == b')' || b == b'(' {
                break;
            }
            self.position += 1;
        }
        if self.peek() == Some(b'(') {
            return Err(self.error("`(` not allowed in attribute value"));
        }
        let value = &self.expression[value_start..self.position];

        if value == "*" {
            Ok(FilterExpr::Present(key.to_string()))
        } else {
            Ok(FilterExpr::Equals(key.to_string(), value.to_string()))
        }
    }
}
