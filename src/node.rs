/*!
# Node Representation

We choose `Node = u32` as the graphs we train on rarely exceed `2^32` nodes.
This halves the footprint of every id that is not delta-encoded (seed batches, sampled
node lists, local edge lists) compared to `u64/usize`.

Edge counts on the other hand easily exceed `2^32` for large web or social graphs, which
is why [`NumEdges`](crate::edge::NumEdges) is a `u64`.
*/

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// Returns *true* if `u` is a valid node in a graph with `order` nodes
#[inline(always)]
pub const fn is_valid_node(u: Node, order: NumNodes) -> bool {
    u < order
}
