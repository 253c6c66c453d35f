#![deny(missing_docs)]
#![doc = "Shared identifiers and the structured error surface used by every Shed of Graphs crate."]

use serde::{Deserialize, Serialize};

pub mod errors;

pub use errors::{ErrorInfo, SogError};

/// Identifier for a node within a decoded graph.
///
/// Identifiers are positional: a graph of order `n` owns exactly the
/// identifiers `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
