/*!
# Graph Operations

Traits shared by all graph representations of this crate. Algorithms such as the
[`NeighborSampler`](crate::sampler::NeighborSampler) are written against these traits
and therefore work on the compressed store and the plain reference layout alike.

All graphs are directed and static: they are created once from a complete edge set via
[`GraphFromScratch`] and only read afterwards.
*/

use std::ops::Range;

use itertools::Itertools;

use crate::{edge::*, error::*, node::*};

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns an iterator over V.
    ///
    /// The range does not borrow `self` and can be used while holding other references.
    fn vertices(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns *true* if `u` is a node of the graph
    fn has_vertex(&self, u: Node) -> bool {
        is_valid_node(u, self.number_of_nodes())
    }

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of (deduplicated, directed) edges of the graph
    fn number_of_edges(&self) -> NumEdges;

    /// Returns *true* if the graph has no edges
    fn is_singleton(&self) -> bool {
        self.number_of_edges() == 0
    }
}

/// Traits pertaining getters for neighborhoods & edges
pub trait AdjacencyList: GraphNodeOrder + Sized {
    /// Returns an iterator over the out-neighbors of a given vertex in increasing order.
    /// ** Panics if `u >= n` **
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_;

    /// Returns the number of (outgoing) neighbors of `u`
    /// ** Panics if `u >= n` **
    fn degree_of(&self, u: Node) -> NumNodes;

    /// Returns *true* if the edge `(u, v)` exists.
    /// ** Panics if `u >= n` **
    fn has_edge(&self, u: Node, v: Node) -> bool {
        // neighbors are sorted
        self.neighbors_of(u)
            .take_while(|&w| w <= v)
            .any(|w| w == v)
    }

    /// Returns an iterator over the degrees of all nodes
    fn degrees(&self) -> impl Iterator<Item = NumNodes> + '_ {
        self.vertices().map(move |u| self.degree_of(u))
    }

    /// Returns an iterator to all vertices with non-zero degree
    fn vertices_with_neighbors(&self) -> impl Iterator<Item = Node> + '_ {
        self.vertices().filter(move |&u| self.degree_of(u) > 0)
    }

    /// Returns the maximum degree in the graph
    fn max_degree(&self) -> NumNodes {
        self.degrees().max().unwrap_or(0)
    }

    /// Returns a distribution `(degree, number of nodes)` sorted by degree
    fn degree_distribution(&self) -> Vec<(NumNodes, NumNodes)> {
        let mut distr = self
            .degrees()
            .counts()
            .into_iter()
            .map(|(d, n)| (d, n as NumNodes))
            .collect_vec();
        distr.sort_by_key(|(d, _)| *d);
        distr
    }

    /// Returns an iterator over outgoing edges of a given vertex in sorted order.
    /// ** Panics if `u >= n` **
    fn edges_of(&self, u: Node) -> impl Iterator<Item = Edge> + '_ {
        self.neighbors_of(u).map(move |v| Edge(u, v))
    }

    /// Returns an iterator over all edges in the graph in sorted order.
    fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.vertices().flat_map(move |u| self.edges_of(u))
    }
}

/// Static graphs built from a complete edge set
pub trait GraphFromScratch: Sized {
    /// Builds a graph with `n` nodes from a list of directed edges.
    /// Parallel edges are merged, self-loops are kept.
    ///
    /// # Errors
    /// Returns [`Error::NodeOutOfRange`] if an endpoint is not smaller than `n`.
    fn try_from_edges<I, E>(n: NumNodes, edges: I) -> Result<Self>
    where
        E: Into<Edge>,
        I: IntoIterator<Item = E>,
    {
        Self::try_from_fallible_edges(n, edges.into_iter().map(|e| Ok(e.into())))
    }

    /// Like [`GraphFromScratch::try_from_edges`] but consumes a fallible edge stream,
    /// as produced by the readers in [`io`](crate::io).
    ///
    /// # Errors
    /// Propagates the first error of the stream unmodified and otherwise fails like
    /// [`GraphFromScratch::try_from_edges`].
    fn try_from_fallible_edges<I>(n: NumNodes, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Edge>>;
}

/// Collects a fallible edge stream and checks all endpoints against `n`
pub(crate) fn collect_checked_edges<I>(n: NumNodes, edges: I) -> Result<Vec<Edge>>
where
    I: IntoIterator<Item = Result<Edge>>,
{
    edges
        .into_iter()
        .map(|edge| {
            let Edge(u, v) = edge?;
            for x in [u, v] {
                if !is_valid_node(x, n) {
                    return Err(Error::node_out_of_range(x, n));
                }
            }
            Ok(Edge(u, v))
        })
        .collect()
}
