use std::collections::BTreeSet;

use serde::Serialize;
use sog_core::{ErrorInfo, NodeId, SogError};

use crate::degree::DegreeIndex;
use crate::ids::{make_node, node_index};

/// Undirected edge stored with its endpoints in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Edge {
    low: NodeId,
    high: NodeId,
}

impl Edge {
    pub(crate) fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Returns the endpoints `(u, v)` with `u < v`.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.low, self.high)
    }
}

/// Simple undirected graph: no self-loops, no parallel edges.
///
/// Node identifiers are the contiguous range `0..order`. Edges are kept in
/// the order they were produced, which for decoded graphs is the graph6
/// column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Graph {
    order: usize,
    edges: Vec<Edge>,
}

impl Graph {
    /// Creates a graph with `order` isolated nodes.
    pub fn empty(order: usize) -> Self {
        Self {
            order,
            edges: Vec::new(),
        }
    }

    /// Builds a graph from raw endpoint pairs, validating every invariant.
    pub fn from_edges<I>(order: usize, pairs: I) -> Result<Self, SogError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut seen = BTreeSet::new();
        let mut edges = Vec::new();
        for (u, v) in pairs {
            if u >= order || v >= order {
                return Err(SogError::Invariant(
                    ErrorInfo::new("edge-out-of-range", "edge endpoint is not a node of the graph")
                        .with_context("edge", format!("{u}-{v}"))
                        .with_context("order", order),
                ));
            }
            if u == v {
                return Err(SogError::Invariant(
                    ErrorInfo::new("self-loop", "simple graphs cannot contain self-loops")
                        .with_context("node", u),
                ));
            }
            let edge = Edge::new(make_node(u), make_node(v));
            if !seen.insert(edge) {
                return Err(SogError::Invariant(
                    ErrorInfo::new("duplicate-edge", "simple graphs cannot contain parallel edges")
                        .with_context("edge", format!("{u}-{v}")),
                ));
            }
            edges.push(edge);
        }
        Ok(Self { order, edges })
    }

    /// Assembles a graph whose edges the caller has already validated.
    pub(crate) fn from_trusted(order: usize, edges: Vec<Edge>) -> Self {
        Self { order, edges }
    }

    /// Returns the number of nodes.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns the number of edges.
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    /// Returns an iterator over all node identifiers in ascending order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        (0..self.order).map(make_node)
    }

    /// Returns the edge list.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns whether `u` and `v` are adjacent.
    pub fn contains_edge(&self, u: NodeId, v: NodeId) -> bool {
        let probe = Edge::new(u, v);
        self.edges.iter().any(|edge| *edge == probe)
    }

    /// Returns whether the node identifier belongs to this graph.
    pub fn contains_node(&self, node: NodeId) -> bool {
        node_index(node) < self.order
    }

    /// Computes the degree index of this graph.
    pub fn degrees(&self) -> DegreeIndex {
        DegreeIndex::from_graph(self)
    }

    /// Returns the edge set in canonical order, for representation-independent comparison.
    pub fn edge_set(&self) -> BTreeSet<Edge> {
        self.edges.iter().copied().collect()
    }
}
