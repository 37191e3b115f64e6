/*!
# Compressed Adjacency Store

[`CompressedCsr`] keeps the CSR shape but replaces the flat `u32` column indices by a byte
arena of delta-encoded neighbor lists (see [`codec`](crate::codec)). The neighbors of `u`
are the bytes `arena[offsets[u]..offsets[u + 1]]`, decoded lazily on every query.

```
use glzip::prelude::*;

let graph = CompressedCsr::build(4, [(0, 1), (0, 2), (1, 2), (1, 3), (0, 2)]).unwrap();

assert_eq!(graph.order(), 4);
assert_eq!(graph.size(), 4);
assert_eq!(graph.neighbors_of(0).collect::<Vec<_>>(), vec![1, 2]);
assert_eq!(graph.degree_of(3), 0);
assert_eq!(graph.nbytes(), 5 * 8 + 4);
```
*/

use std::{fmt, iter::FusedIterator, ops::Range};

use super::*;
use crate::testing::test_graph_ops;

/// Directed graph whose sorted out-neighbor lists are stored delta-encoded in a single
/// byte arena.
///
/// Stores are immutable after construction: every invariant of the layout is established
/// by [`CsrBuilder`] or checked by [`CompressedCsr::from_raw_parts`].
#[derive(Clone)]
pub struct CompressedCsr {
    offsets: Vec<u64>,
    arena: Vec<u8>,
    size: NumEdges,
    degrees: Option<Vec<NumNodes>>,
}

impl CompressedCsr {
    /// Assembles a store from parts produced by the builder
    pub(super) fn from_verified_parts(
        offsets: Vec<u64>,
        arena: Vec<u8>,
        size: NumEdges,
        degrees: Option<Vec<NumNodes>>,
    ) -> Self {
        debug_assert_eq!(offsets.first(), Some(&0));
        debug_assert_eq!(offsets.last().copied(), Some(arena.len() as u64));

        Self {
            offsets,
            arena,
            size,
            degrees,
        }
    }

    /// Returns a [`CsrBuilder`] with default settings
    pub fn builder() -> CsrBuilder {
        CsrBuilder::default()
    }

    /// Builds a store with `order` nodes from directed edges using the default
    /// [`CsrBuilder`]. Duplicate edges are merged, self-loops are kept.
    ///
    /// # Errors
    /// Returns [`Error::NodeOutOfRange`] if an endpoint is not smaller than `order`.
    pub fn build<I, E>(order: NumNodes, edges: I) -> Result<Self>
    where
        E: Into<Edge>,
        I: IntoIterator<Item = E>,
    {
        CsrBuilder::default().build(order, edges)
    }

    /// Builds a store from two parallel rows of (signed) coordinates, i.e. the
    /// `edge_index = [sources, targets]` layout common in GNN data sets.
    ///
    /// # Errors
    /// - [`Error::MalformedInput`] if the rows differ in length
    /// - [`Error::NodeOutOfRange`] if an id is negative or not smaller than `order`
    pub fn from_coo(order: NumNodes, sources: &[i64], targets: &[i64]) -> Result<Self> {
        if sources.len() != targets.len() {
            return Err(Error::malformed(
                0,
                format!(
                    "coordinate rows differ in length ({} sources, {} targets)",
                    sources.len(),
                    targets.len()
                ),
            ));
        }

        let to_node = |x: i64| {
            if (0..order as i64).contains(&x) {
                Ok(x as Node)
            } else {
                Err(Error::node_out_of_range(x, order))
            }
        };

        CsrBuilder::default().build_from_results(
            order,
            sources
                .iter()
                .zip(targets)
                .map(|(&u, &v)| -> Result<Edge> { Ok(Edge(to_node(u)?, to_node(v)?)) }),
        )
    }

    /// Adopts an externally held layout after verifying all of its invariants.
    ///
    /// # Errors
    /// Returns [`Error::CorruptEncoding`] if the offsets are not a monotone partition of
    /// the arena or a range does not decode to a strictly increasing list of nodes.
    pub fn from_raw_parts(offsets: Vec<u64>, arena: Vec<u8>) -> Result<Self> {
        let size = verify_layout(&offsets, &arena)?;
        Ok(Self {
            offsets,
            arena,
            size,
            degrees: None,
        })
    }

    /// Releases the offsets and the arena
    pub fn into_raw_parts(self) -> (Vec<u64>, Vec<u8>) {
        (self.offsets, self.arena)
    }

    /// Re-checks all layout invariants.
    ///
    /// # Errors
    /// See [`CompressedCsr::from_raw_parts`].
    pub fn verify(&self) -> Result<()> {
        let size = verify_layout(&self.offsets, &self.arena)?;
        if size != self.size {
            return Err(Error::CorruptEncoding {
                offset: self.arena.len(),
            });
        }
        Ok(())
    }

    /// Keeps a per-node degree array next to the arena; `degree_of` becomes O(1)
    pub fn with_degree_cache(mut self) -> Self {
        if self.degrees.is_none() {
            self.degrees = Some(
                self.vertices()
                    .map(|u| self.decoder(u).count() as NumNodes)
                    .collect(),
            );
        }
        self
    }

    /// Returns *true* if degrees are answered from a cache
    pub fn has_degree_cache(&self) -> bool {
        self.degrees.is_some()
    }

    /// Number of nodes
    #[inline]
    pub fn order(&self) -> NumNodes {
        self.number_of_nodes()
    }

    /// Number of stored (deduplicated, directed) edges
    #[inline]
    pub fn size(&self) -> NumEdges {
        self.size
    }

    /// Bytes occupied by the offsets (8 per entry) and the arena.
    /// The optional degree cache is not counted.
    pub fn nbytes(&self) -> usize {
        self.offsets.len() * size_of::<u64>() + self.arena.len()
    }

    /// Size statistics of this store
    pub fn stats(&self) -> CompressionStats {
        CompressionStats::new(self.order(), self.size, self.nbytes())
    }

    /// Offset array with `order + 1` entries
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// The concatenated encoded neighbor lists
    pub fn arena(&self) -> &[u8] {
        &self.arena
    }

    /// Returns the encoded neighbor list of `u`.
    /// ** Panics if `u >= n` **
    pub fn encoded_neighbors(&self, u: Node) -> &[u8] {
        &self.arena[self.byte_range(u)]
    }

    /// Fallible variant of [`AdjacencyList::neighbors_of`]
    ///
    /// # Errors
    /// - [`Error::NodeOutOfRange`] if `u >= n`
    /// - [`Error::CorruptEncoding`] if the encoded list is damaged
    pub fn try_neighbors_of(&self, u: Node) -> Result<Vec<Node>> {
        if !self.has_vertex(u) {
            return Err(Error::node_out_of_range(u, self.order()));
        }
        self.decoder(u).collect()
    }

    #[inline]
    fn byte_range(&self, u: Node) -> Range<usize> {
        let u = u as usize;
        self.offsets[u] as usize..self.offsets[u + 1] as usize
    }

    #[inline]
    fn decoder(&self, u: Node) -> DeltaDecoder<'_> {
        let range = self.byte_range(u);
        let start = range.start;
        DeltaDecoder::new(&self.arena[range], u).with_base_offset(start)
    }
}

/// Checks the layout invariants and returns the number of encoded edges
fn verify_layout(offsets: &[u64], arena: &[u8]) -> Result<NumEdges> {
    let corrupt = |offset: usize| Error::CorruptEncoding { offset };

    match (offsets.first(), offsets.last()) {
        (Some(0), Some(&last)) if last == arena.len() as u64 => {}
        _ => return Err(corrupt(0)),
    }

    let order = offsets.len() - 1;
    if order > INVALID_NODE as usize {
        return Err(corrupt(0));
    }

    let mut size: NumEdges = 0;
    for (u, w) in offsets.windows(2).enumerate() {
        let (start, end) = (w[0] as usize, w[1] as usize);
        if start > end || end > arena.len() {
            return Err(corrupt(start));
        }

        let mut prev: Option<Node> = None;
        for v in DeltaDecoder::new(&arena[start..end], u as Node).with_base_offset(start) {
            let v = v?;
            if v as usize >= order || prev.is_some_and(|p| p >= v) {
                return Err(corrupt(start));
            }
            prev = Some(v);
            size += 1;
        }
    }

    Ok(size)
}

/// Lazy iterator over the out-neighbors of a node in a [`CompressedCsr`].
///
/// # Panics
/// Panics on damaged bytes, which cannot occur for stores created through this crate.
#[derive(Debug, Clone)]
pub struct Neighbors<'a> {
    decoder: DeltaDecoder<'a>,
}

impl Iterator for Neighbors<'_> {
    type Item = Node;

    #[inline]
    fn next(&mut self) -> Option<Node> {
        self.decoder
            .next()
            .map(|v| v.unwrap_or_else(|err| panic!("compressed adjacency damaged: {err}")))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.decoder.size_hint()
    }
}

impl FusedIterator for Neighbors<'_> {}

impl GraphNodeOrder for CompressedCsr {
    fn number_of_nodes(&self) -> NumNodes {
        (self.offsets.len() - 1) as NumNodes
    }
}

impl GraphEdgeOrder for CompressedCsr {
    fn number_of_edges(&self) -> NumEdges {
        self.size
    }
}

impl AdjacencyList for CompressedCsr {
    fn neighbors_of(&self, u: Node) -> Neighbors<'_> {
        Neighbors {
            decoder: self.decoder(u),
        }
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        match &self.degrees {
            Some(degrees) => degrees[u as usize],
            None => self.neighbors_of(u).count() as NumNodes,
        }
    }

    fn vertices_with_neighbors(&self) -> impl Iterator<Item = Node> + '_ {
        // non-empty lists take at least one byte
        self.vertices()
            .filter(move |&u| self.offsets[u as usize] < self.offsets[u as usize + 1])
    }
}

impl GraphFromScratch for CompressedCsr {
    fn try_from_fallible_edges<I>(n: NumNodes, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Edge>>,
    {
        CsrBuilder::default().build_from_results(n, edges)
    }
}

impl From<&CsrGraph> for CompressedCsr {
    /// Compresses a plain CSR graph with the default chunking
    fn from(graph: &CsrGraph) -> Self {
        CsrBuilder::default().encode(graph)
    }
}

impl PartialEq for CompressedCsr {
    /// Two stores are equal if their layouts are byte-identical
    fn eq(&self, other: &Self) -> bool {
        self.offsets == other.offsets && self.arena == other.arena
    }
}

impl Eq for CompressedCsr {}

impl fmt::Debug for CompressedCsr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "glzip.CSR(order={}, size={}, nbytes={})",
            self.order(),
            self.size,
            self.nbytes()
        )
    }
}

test_graph_ops!(
    test_compressed_csr,
    CompressedCsr,
    (AdjacencyList, GraphFromScratch)
);
