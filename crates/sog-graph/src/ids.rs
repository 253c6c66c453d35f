use sog_core::NodeId;

/// Converts a [`NodeId`] into its underlying index within per-node arrays.
pub(crate) fn node_index(id: NodeId) -> usize {
    id.as_raw() as usize
}

/// Creates a [`NodeId`] from an index.
pub(crate) fn make_node(index: usize) -> NodeId {
    NodeId::from_raw(index as u64)
}
