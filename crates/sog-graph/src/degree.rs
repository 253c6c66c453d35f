use sog_core::NodeId;

use crate::graph::Graph;
use crate::ids::node_index;

/// Degree of every node of one graph, indexed by node identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegreeIndex {
    degrees: Vec<usize>,
}

impl DegreeIndex {
    /// Counts incident edges for every node in `O(V + E)`.
    pub fn from_graph(graph: &Graph) -> Self {
        let mut degrees = vec![0usize; graph.order()];
        for edge in graph.edges() {
            let (u, v) = edge.endpoints();
            degrees[node_index(u)] += 1;
            degrees[node_index(v)] += 1;
        }
        Self { degrees }
    }

    /// Returns the degree of `node`, or `None` when the node is not indexed.
    pub fn degree(&self, node: NodeId) -> Option<usize> {
        self.degrees.get(node_index(node)).copied()
    }

    /// Returns the number of indexed nodes.
    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    /// Returns whether the index covers no nodes.
    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    /// Sum of all degrees.
    pub fn total(&self) -> usize {
        self.degrees.iter().sum()
    }

    /// Returns the largest degree, or zero for the empty graph.
    pub fn max_degree(&self) -> usize {
        self.degrees.iter().copied().max().unwrap_or(0)
    }

    /// Degrees in node order.
    pub fn as_slice(&self) -> &[usize] {
        &self.degrees
    }

    /// Checks the handshake lemma against `graph`: degrees sum to twice the edge count.
    pub fn satisfies_handshake(&self, graph: &Graph) -> bool {
        self.degrees.len() == graph.order() && self.total() == 2 * graph.size()
    }
}
