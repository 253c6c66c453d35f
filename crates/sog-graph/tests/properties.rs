use proptest::prelude::*;
use sog_graph::{decode, encode, gen_gnp, Graph};

fn arbitrary_graph() -> impl Strategy<Value = Graph> {
    (0usize..70, 0.0f64..=1.0, any::<u64>())
        .prop_map(|(order, probability, seed)| gen_gnp(order, probability, seed))
}

proptest! {
    #[test]
    fn decode_inverts_encode(graph in arbitrary_graph()) {
        let line = encode(&graph);
        let decoded = decode(&line).unwrap();
        prop_assert_eq!(decoded.order(), graph.order());
        prop_assert_eq!(decoded.edge_set(), graph.edge_set());
        prop_assert_eq!(encode(&decoded), line);
    }

    #[test]
    fn degrees_satisfy_handshake(graph in arbitrary_graph()) {
        let degrees = graph.degrees();
        prop_assert_eq!(degrees.len(), graph.order());
        prop_assert_eq!(degrees.total(), 2 * graph.size());
        prop_assert!(degrees.satisfies_handshake(&graph));
    }

    #[test]
    fn decoder_never_panics(line in "[ -~]{0,24}") {
        let _ = decode(&line);
    }
}
