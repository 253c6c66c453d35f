use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::{Edge, Graph};
use crate::ids::make_node;

/// Cycle `C_n`. Orders below three have no cycle and yield a path.
pub fn gen_cycle(order: usize) -> Graph {
    let mut edges = path_edges(order);
    if order >= 3 {
        edges.push(Edge::new(make_node(order - 1), make_node(0)));
    }
    Graph::from_trusted(order, edges)
}

/// Path `P_n`.
pub fn gen_path(order: usize) -> Graph {
    Graph::from_trusted(order, path_edges(order))
}

/// Complete graph `K_n`.
pub fn gen_complete(order: usize) -> Graph {
    let mut edges = Vec::with_capacity(order * order.saturating_sub(1) / 2);
    for j in 1..order {
        for i in 0..j {
            edges.push(Edge::new(make_node(i), make_node(j)));
        }
    }
    Graph::from_trusted(order, edges)
}

/// Star with node 0 as the centre and `order - 1` leaves.
pub fn gen_star(order: usize) -> Graph {
    let edges = (1..order)
        .map(|leaf| Edge::new(make_node(0), make_node(leaf)))
        .collect();
    Graph::from_trusted(order, edges)
}

/// Erdős–Rényi `G(n, p)` with deterministic randomness derived from `seed`.
pub fn gen_gnp(order: usize, probability: f64, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let probability = probability.clamp(0.0, 1.0);
    let mut edges = Vec::new();
    for j in 1..order {
        for i in 0..j {
            if rng.gen_bool(probability) {
                edges.push(Edge::new(make_node(i), make_node(j)));
            }
        }
    }
    Graph::from_trusted(order, edges)
}

fn path_edges(order: usize) -> Vec<Edge> {
    (1..order)
        .map(|next| Edge::new(make_node(next - 1), make_node(next)))
        .collect()
}
