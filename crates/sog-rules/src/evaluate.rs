use sog_core::{ErrorInfo, SogError};
use sog_graph::{DegreeIndex, Graph};
use tracing::trace;

use crate::rule::Rule;
use crate::ruleset::RuleSet;

/// Counts edges whose endpoint degrees add up to the rule's degree sum.
///
/// Every undirected edge is visited once. A node missing from `degrees`
/// means the index was not derived from `graph` and is reported as an
/// invariant violation.
pub fn count_matching_edges(
    graph: &Graph,
    degrees: &DegreeIndex,
    rule: &Rule,
) -> Result<usize, SogError> {
    let mut count = 0usize;
    for edge in graph.edges() {
        let (u, v) = edge.endpoints();
        let du = degrees.degree(u).ok_or_else(|| missing_degree(u, degrees))?;
        let dv = degrees.degree(v).ok_or_else(|| missing_degree(v, degrees))?;
        if du + dv == rule.degree_sum() {
            count += 1;
        }
    }
    Ok(count)
}

fn missing_degree(node: sog_core::NodeId, degrees: &DegreeIndex) -> SogError {
    SogError::Invariant(
        ErrorInfo::new("missing-degree", "edge references a node absent from the degree index")
            .with_context("node", node)
            .with_context("indexed_nodes", degrees.len()),
    )
}

/// Result of evaluating one rule against one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Position of the rule within its set.
    pub index: usize,
    /// The evaluated rule.
    pub rule: Rule,
    /// Number of matching edges.
    pub count: usize,
    /// Whether the count satisfied the rule.
    pub passed: bool,
}

/// Per-rule diagnostics for one graph, in evaluation order.
///
/// Evaluation stops at the first failing rule, so `outcomes` ends either with
/// that failure or with the last rule of the set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verdict {
    /// Outcomes of the rules that were evaluated.
    pub outcomes: Vec<RuleOutcome>,
}

impl Verdict {
    /// Returns whether every evaluated rule passed.
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.passed)
    }

    /// Returns the rule that rejected the graph, if any.
    pub fn first_failure(&self) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|outcome| !outcome.passed)
    }
}

impl RuleSet {
    /// Returns whether `graph` satisfies every rule.
    pub fn matches(&self, graph: &Graph) -> Result<bool, SogError> {
        let degrees = checked_degrees(graph)?;
        self.matches_with(graph, &degrees)
    }

    /// Same as [`RuleSet::matches`] with a precomputed degree index.
    pub fn matches_with(&self, graph: &Graph, degrees: &DegreeIndex) -> Result<bool, SogError> {
        for (index, rule) in self.rules().iter().enumerate() {
            let count = count_matching_edges(graph, degrees, rule)?;
            if !rule.accepts(count) {
                trace!(index, count, %rule, "rule rejected graph");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Evaluates the rules in order and reports each outcome up to the first failure.
    pub fn explain(&self, graph: &Graph) -> Result<Verdict, SogError> {
        let degrees = checked_degrees(graph)?;
        let mut verdict = Verdict::default();
        for (index, rule) in self.rules().iter().enumerate() {
            let count = count_matching_edges(graph, &degrees, rule)?;
            let passed = rule.accepts(count);
            verdict.outcomes.push(RuleOutcome {
                index,
                rule: *rule,
                count,
                passed,
            });
            if !passed {
                break;
            }
        }
        Ok(verdict)
    }
}

fn checked_degrees(graph: &Graph) -> Result<DegreeIndex, SogError> {
    let degrees = graph.degrees();
    if !degrees.satisfies_handshake(graph) {
        return Err(SogError::Invariant(
            ErrorInfo::new("handshake", "degree sum differs from twice the edge count")
                .with_context("degree_total", degrees.total())
                .with_context("edges", graph.size()),
        ));
    }
    Ok(degrees)
}
