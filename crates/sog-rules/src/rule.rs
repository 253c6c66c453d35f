use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sog_core::{ErrorInfo, SogError};

/// How a rule's match count is compared with its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    /// At least `threshold` matching edges (`"min"`).
    #[serde(rename = "min")]
    AtLeast,
    /// At most `threshold` matching edges (`"max"`).
    #[serde(rename = "max")]
    AtMost,
    /// Exactly `threshold` matching edges (`"exactly"`).
    #[serde(rename = "exactly")]
    Exactly,
}

impl Comparison {
    /// Returns whether `count` satisfies this comparison against `threshold`.
    pub fn holds(self, count: usize, threshold: usize) -> bool {
        match self {
            Comparison::AtLeast => count >= threshold,
            Comparison::AtMost => count <= threshold,
            Comparison::Exactly => count == threshold,
        }
    }

    /// Keyword used in rule specifications.
    pub fn keyword(self) -> &'static str {
        match self {
            Comparison::AtLeast => "min",
            Comparison::AtMost => "max",
            Comparison::Exactly => "exactly",
        }
    }
}

impl FromStr for Comparison {
    type Err = SogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "min" => Ok(Comparison::AtLeast),
            "max" => Ok(Comparison::AtMost),
            "exactly" => Ok(Comparison::Exactly),
            other => Err(SogError::Specification(
                ErrorInfo::new("unknown-comparison", "rule type is not a known comparison")
                    .with_context("type", other)
                    .with_hint("use one of \"min\", \"max\" or \"exactly\""),
            )),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Predicate over the edges of a graph.
///
/// An edge `{u, v}` matches when `deg(u) + deg(v) == degree_sum`; the graph
/// satisfies the rule when the number of matching edges compares to
/// `threshold` as `comparison` requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rule {
    degree_sum: usize,
    #[serde(rename = "type")]
    comparison: Comparison,
    #[serde(rename = "count")]
    threshold: usize,
}

impl Rule {
    /// Creates a rule.
    pub const fn new(degree_sum: usize, comparison: Comparison, threshold: usize) -> Self {
        Self {
            degree_sum,
            comparison,
            threshold,
        }
    }

    /// Shorthand for an [`Comparison::AtLeast`] rule.
    pub const fn at_least(degree_sum: usize, threshold: usize) -> Self {
        Self::new(degree_sum, Comparison::AtLeast, threshold)
    }

    /// Shorthand for an [`Comparison::AtMost`] rule.
    pub const fn at_most(degree_sum: usize, threshold: usize) -> Self {
        Self::new(degree_sum, Comparison::AtMost, threshold)
    }

    /// Shorthand for an [`Comparison::Exactly`] rule.
    pub const fn exactly(degree_sum: usize, threshold: usize) -> Self {
        Self::new(degree_sum, Comparison::Exactly, threshold)
    }

    /// Target endpoint-degree sum.
    pub fn degree_sum(&self) -> usize {
        self.degree_sum
    }

    /// Comparison applied to the match count.
    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// Threshold the match count is compared with.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns whether `count` matching edges satisfy the rule.
    pub fn accepts(&self, count: usize) -> bool {
        self.comparison.holds(count, self.threshold)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} edge(s) with degree sum {}",
            self.comparison, self.threshold, self.degree_sum
        )
    }
}
