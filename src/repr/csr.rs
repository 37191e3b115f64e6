/*!
# Plain Compressed Sparse Row (CSR) Graph

All adjacency lists are stored in a single flattened array of `u32` column indices, with
`u64` offsets marking the start of each vertex's neighbor list. This is the conventional
layout whose footprint `8 * (n + 1) + 4 * m` bytes the [`CompressedCsr`] is measured
against.
*/

use std::{iter::Copied, slice::Iter};

use rayon::prelude::*;

use super::*;
use crate::testing::test_graph_ops;

/// Directed **CSR graph** representation storing outgoing edges only.
///
/// Neighbor lists are sorted and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrGraph {
    offsets: Vec<u64>,
    targets: Vec<Node>,
}

impl CsrGraph {
    /// Builds the graph from edges that are sorted and deduplicated and whose endpoints
    /// are smaller than `n`.
    pub(crate) fn from_sorted_edges(n: NumNodes, edges: &[Edge]) -> Self {
        debug_assert!(edges.windows(2).all(|w| w[0] < w[1]));

        let mut offsets: Vec<u64> = Vec::with_capacity(n as usize + 1);
        offsets.push(0);

        let mut curr_node = 0;
        let mut counter = 0;
        let targets: Vec<Node> = edges
            .iter()
            .map(|&Edge(u, v)| {
                while u > curr_node {
                    offsets.push(counter);
                    curr_node += 1;
                }
                counter += 1;

                v
            })
            .collect();

        assert!(offsets.len() <= n as usize + 1);
        while offsets.len() <= n as usize {
            offsets.push(targets.len() as u64);
        }

        Self { offsets, targets }
    }

    /// Returns the sorted neighbors of `u` as a slice.
    /// ** Panics if `u >= n` **
    #[inline]
    pub fn as_neighbors_slice(&self, u: Node) -> &[Node] {
        let u = u as usize;
        &self.targets[self.offsets[u] as usize..self.offsets[u + 1] as usize]
    }

    /// Returns the offset array (`n + 1` entries)
    pub fn raw_offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Returns the flattened column indices
    pub fn raw_targets(&self) -> &[Node] {
        &self.targets
    }

    /// Bytes occupied by offsets and column indices
    pub fn nbytes(&self) -> usize {
        self.offsets.len() * size_of::<u64>() + self.targets.len() * size_of::<Node>()
    }
}

impl GraphNodeOrder for CsrGraph {
    fn number_of_nodes(&self) -> NumNodes {
        (self.offsets.len() - 1) as NumNodes
    }
}

impl GraphEdgeOrder for CsrGraph {
    fn number_of_edges(&self) -> NumEdges {
        self.targets.len() as NumEdges
    }
}

impl AdjacencyList for CsrGraph {
    fn neighbors_of(&self, u: Node) -> Copied<Iter<'_, Node>> {
        self.as_neighbors_slice(u).iter().copied()
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        let u = u as usize;
        (self.offsets[u + 1] - self.offsets[u]) as NumNodes
    }

    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.as_neighbors_slice(u).binary_search(&v).is_ok()
    }
}

impl GraphFromScratch for CsrGraph {
    fn try_from_fallible_edges<I>(n: NumNodes, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Edge>>,
    {
        let mut edges = collect_checked_edges(n, edges)?;
        edges.par_sort_unstable();
        edges.dedup();

        Ok(Self::from_sorted_edges(n, &edges))
    }
}

impl From<&CompressedCsr> for CsrGraph {
    /// Decompresses the store into the plain layout
    fn from(graph: &CompressedCsr) -> Self {
        let mut offsets = Vec::with_capacity(graph.len() + 1);
        offsets.push(0);

        let mut targets = Vec::with_capacity(graph.size() as usize);
        for u in graph.vertices() {
            targets.extend(graph.neighbors_of(u));
            offsets.push(targets.len() as u64);
        }

        Self { offsets, targets }
    }
}

test_graph_ops!(test_csr_graph, CsrGraph, (AdjacencyList, GraphFromScratch));

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_graph() {
        let graph = CsrGraph::try_from_edges(0, std::iter::empty::<Edge>()).unwrap();
        assert!(graph.is_empty());
        assert!(graph.is_singleton());
        assert_eq!(graph.nbytes(), 8);
    }

    #[test]
    fn trailing_isolated_nodes() {
        let graph = CsrGraph::try_from_edges(5, [(0, 1), (0, 1), (1, 0)]).unwrap();
        assert_eq!(graph.raw_offsets(), &[0, 1, 2, 2, 2, 2]);
        assert_eq!(graph.number_of_edges(), 2);
        assert_eq!(graph.degree_of(4), 0);
        assert_eq!(graph.nbytes(), 6 * 8 + 2 * 4);
    }
}
