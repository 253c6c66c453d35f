use sog_core::NodeId;
use sog_graph::{gen_complete, gen_cycle, gen_star, Graph};

#[test]
fn isolated_nodes_have_degree_zero() {
    let graph = Graph::from_edges(5, [(0, 1)]).unwrap();
    let degrees = graph.degrees();
    assert_eq!(degrees.as_slice(), &[1, 1, 0, 0, 0]);
    assert_eq!(degrees.degree(NodeId::from_raw(4)), Some(0));
    assert_eq!(degrees.degree(NodeId::from_raw(5)), None);
}

#[test]
fn regular_graphs_have_uniform_degrees() {
    assert!(gen_cycle(6).degrees().as_slice().iter().all(|d| *d == 2));
    assert!(gen_complete(5).degrees().as_slice().iter().all(|d| *d == 4));
}

#[test]
fn star_centre_carries_all_edges() {
    let degrees = gen_star(6).degrees();
    assert_eq!(degrees.degree(NodeId::from_raw(0)), Some(5));
    assert_eq!(degrees.max_degree(), 5);
    assert_eq!(degrees.total(), 10);
}

#[test]
fn empty_graph_has_empty_index() {
    let degrees = Graph::empty(0).degrees();
    assert!(degrees.is_empty());
    assert_eq!(degrees.max_degree(), 0);
}

#[test]
fn handshake_detects_foreign_graph() {
    let degrees = gen_cycle(4).degrees();
    assert!(!degrees.satisfies_handshake(&gen_complete(4)));
}

#[test]
fn node_ids_cover_exactly_the_order() {
    let graph = Graph::from_edges(3, [(0, 2)]).unwrap();
    let nodes: Vec<_> = graph.nodes().collect();
    assert_eq!(nodes, vec![NodeId::from_raw(0), NodeId::from_raw(1), NodeId::from_raw(2)]);
    assert!(graph.nodes().all(|node| graph.contains_node(node)));
    assert!(!graph.contains_node(NodeId::from_raw(3)));
    assert_eq!(graph.nodes().len(), graph.degrees().len());
}
