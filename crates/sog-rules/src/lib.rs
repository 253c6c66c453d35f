#![deny(missing_docs)]
#![doc = "Degree-sum edge rules: an edge matches a rule when the degrees of its endpoints add up to the rule's target, and a graph passes a rule set when every rule's match count meets its threshold."]

mod evaluate;
mod rule;
mod ruleset;

pub use evaluate::{count_matching_edges, RuleOutcome, Verdict};
pub use rule::{Comparison, Rule};
pub use ruleset::RuleSet;
