use serde::Deserialize;
use serde_json::Value;
use sog_core::{ErrorInfo, SogError};

use crate::rule::Rule;

/// Ordered, AND-combined list of rules.
///
/// The set remembers the specification text it was parsed from so that the
/// exact caller-provided filter can be recorded alongside run results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
    source: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    degree_sum: usize,
    #[serde(rename = "type")]
    kind: String,
    count: usize,
}

impl RuleSet {
    /// Parses a JSON specification.
    ///
    /// Accepts an array of rule objects, or a single rule object which is
    /// treated as a one-element set. Every rule is validated before the set is
    /// returned; nothing is partially applied.
    pub fn parse(spec: &str) -> Result<Self, SogError> {
        let value: Value = serde_json::from_str(spec).map_err(|err| {
            SogError::Specification(
                ErrorInfo::new("invalid-json", "filter is not valid JSON")
                    .with_context("detail", err),
            )
        })?;
        let items = match value {
            Value::Array(items) => items,
            object @ Value::Object(_) => vec![object],
            other => {
                return Err(SogError::Specification(
                    ErrorInfo::new(
                        "unexpected-shape",
                        "filter must be a JSON array of rules or a single rule object",
                    )
                    .with_context("found", json_kind(&other)),
                ));
            }
        };
        let rules = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| parse_rule(item).map_err(|err| err.with_context("rule", index)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rules,
            source: spec.to_string(),
        })
    }

    /// Builds a set from already validated rules; the source text is the compact JSON form.
    pub fn new(rules: Vec<Rule>) -> Self {
        let source = serde_json::to_string(&rules).unwrap_or_else(|_| "[]".to_string());
        Self { rules, source }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns whether the set has no rules (and therefore passes every graph).
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Specification text as provided by the caller.
    pub fn source(&self) -> &str {
        &self.source
    }
}

fn parse_rule(item: Value) -> Result<Rule, SogError> {
    let raw: RawRule = serde_json::from_value(item).map_err(|err| {
        SogError::Specification(
            ErrorInfo::new("malformed-rule", "rule does not match {degree_sum, type, count}")
                .with_context("detail", err)
                .with_hint("degree_sum and count must be non-negative integers"),
        )
    })?;
    let comparison = raw.kind.parse()?;
    Ok(Rule::new(raw.degree_sum, comparison, raw.count))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
