/*!
# Building Compressed Stores

[`CsrBuilder`] turns an unordered edge multiset into a [`CompressedCsr`]:

1. all endpoints are validated before anything is allocated for the store,
2. edges are sorted and deduplicated in parallel, yielding a plain [`CsrGraph`],
3. the node range is cut into chunks holding about `edges_per_chunk` edges each; chunks are
   delta-encoded in parallel and stitched together in node order.

Chunks only decide which thread encodes a list, never how it is encoded. The resulting
layout is therefore byte-identical for every thread count and chunk size.

```
use glzip::prelude::*;

let edges = [(2, 0), (0, 1), (0, 1), (1, 2)];

let a = CsrBuilder::new().num_threads(1).build(3, edges).unwrap();
let b = CsrBuilder::new().num_threads(4).edges_per_chunk(1).build(3, edges).unwrap();
assert_eq!(a, b);
assert_eq!(a.size(), 3);
```
*/

use std::ops::Range;

use rayon::{ThreadPoolBuilder, prelude::*};
use tracing::debug;

use super::*;

/// Default number of edges encoded by a single task
pub const DEFAULT_EDGES_PER_CHUNK: usize = 1 << 20;

/// Configurable construction of [`CompressedCsr`]
#[derive(Debug, Clone)]
pub struct CsrBuilder {
    num_threads: Option<usize>,
    edges_per_chunk: usize,
    cache_degrees: bool,
}

impl Default for CsrBuilder {
    fn default() -> Self {
        Self {
            num_threads: None,
            edges_per_chunk: DEFAULT_EDGES_PER_CHUNK,
            cache_degrees: false,
        }
    }
}

impl CsrBuilder {
    /// Creates a builder using the global rayon pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the build on a dedicated pool with `n` threads (`0` lets rayon decide)
    pub fn num_threads(mut self, n: usize) -> Self {
        self.num_threads = Some(n);
        self
    }

    /// Sets the (approximate) number of edges encoded per task; at least one
    pub fn edges_per_chunk(mut self, edges: usize) -> Self {
        self.edges_per_chunk = edges.max(1);
        self
    }

    /// Sets the chunk size as the number of bytes of raw edge input a task covers,
    /// i.e. `bytes / size_of::<Edge>()` edges; at least one
    pub fn bytes_per_chunk(self, bytes: usize) -> Self {
        self.edges_per_chunk(bytes / size_of::<Edge>())
    }

    /// Keeps a per-node degree array in the built store
    pub fn cache_degrees(mut self, cache: bool) -> Self {
        self.cache_degrees = cache;
        self
    }

    /// Builds a store with `order` nodes from directed edges.
    /// Duplicate edges are merged, self-loops are kept.
    ///
    /// # Errors
    /// - [`Error::NodeOutOfRange`] if an endpoint is not smaller than `order`
    /// - [`Error::ThreadPool`] if the dedicated pool cannot be created
    pub fn build<I, E>(&self, order: NumNodes, edges: I) -> Result<CompressedCsr>
    where
        E: Into<Edge>,
        I: IntoIterator<Item = E>,
    {
        self.build_from_results(order, edges.into_iter().map(|e| Ok(e.into())))
    }

    /// Like [`CsrBuilder::build`] but consumes a fallible edge stream and returns its first
    /// error unmodified.
    pub fn build_from_results<I>(&self, order: NumNodes, edges: I) -> Result<CompressedCsr>
    where
        I: IntoIterator<Item = Result<Edge>>,
    {
        let edges = collect_checked_edges(order, edges)?;

        match self.num_threads {
            Some(threads) => {
                let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
                Ok(pool.install(|| self.build_checked(order, edges)))
            }
            None => Ok(self.build_checked(order, edges)),
        }
    }

    /// Compresses an existing plain CSR graph
    ///
    /// # Errors
    /// Returns [`Error::ThreadPool`] if the dedicated pool cannot be created.
    pub fn compress(&self, graph: &CsrGraph) -> Result<CompressedCsr> {
        match self.num_threads {
            Some(threads) => {
                let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
                Ok(pool.install(|| self.encode(graph)))
            }
            None => Ok(self.encode(graph)),
        }
    }

    fn build_checked(&self, order: NumNodes, mut edges: Vec<Edge>) -> CompressedCsr {
        edges.par_sort_unstable();
        edges.dedup();

        let graph = CsrGraph::from_sorted_edges(order, &edges);
        drop(edges);

        self.encode(&graph)
    }

    /// Encodes all neighbor lists of `graph` on the current pool
    pub(super) fn encode(&self, graph: &CsrGraph) -> CompressedCsr {
        let chunks = node_chunks(graph.raw_offsets(), self.edges_per_chunk);

        let encoded: Vec<(Vec<u8>, Vec<u64>)> = chunks
            .par_iter()
            .map(|nodes| {
                let mut bytes = Vec::new();
                let mut ends = Vec::with_capacity(nodes.len());
                for u in nodes.clone() {
                    encode_neighbors(&mut bytes, u, graph.as_neighbors_slice(u));
                    ends.push(bytes.len() as u64);
                }
                (bytes, ends)
            })
            .collect();

        let mut offsets = Vec::with_capacity(graph.len() + 1);
        offsets.push(0u64);
        let mut arena = Vec::with_capacity(encoded.iter().map(|(b, _)| b.len()).sum());
        for (bytes, ends) in encoded {
            let base = arena.len() as u64;
            offsets.extend(ends.into_iter().map(|end| base + end));
            arena.extend_from_slice(&bytes);
        }

        let degrees = self
            .cache_degrees
            .then(|| graph.degrees().collect::<Vec<NumNodes>>());

        debug!(
            order = graph.number_of_nodes(),
            size = graph.number_of_edges(),
            nbytes = offsets.len() * size_of::<u64>() + arena.len(),
            chunks = chunks.len(),
            threads = rayon::current_num_threads(),
            "csr.build.completed"
        );

        CompressedCsr::from_verified_parts(offsets, arena, graph.number_of_edges(), degrees)
    }
}

/// Splits `0..n` into consecutive node ranges holding about `edges_per_chunk` edges each
fn node_chunks(offsets: &[u64], edges_per_chunk: usize) -> Vec<Range<Node>> {
    let n = offsets.len() - 1;
    let mut chunks = Vec::new();

    let mut begin = 0;
    for u in 0..n {
        if offsets[u + 1] - offsets[begin] >= edges_per_chunk as u64 {
            chunks.push(begin as Node..(u + 1) as Node);
            begin = u + 1;
        }
    }
    if begin < n {
        chunks.push(begin as Node..n as Node);
    }

    chunks
}
