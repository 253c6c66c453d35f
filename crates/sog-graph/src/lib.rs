#![deny(missing_docs)]
#![doc = "Simple undirected graphs decoded from the compact graph6 line format, together with per-node degree indices."]

mod degree;
mod generators;
pub mod graph6;
mod graph;
mod ids;

pub use degree::DegreeIndex;
pub use generators::{gen_complete, gen_cycle, gen_gnp, gen_path, gen_star};
pub use graph::{Edge, Graph};
pub use graph6::{decode, encode};
