/*!
`glzip` stores large directed graphs in a **compressed CSR** layout and draws **multi-hop
neighbor samples** from them for mini-batch training of graph neural networks
(GraphSAGE-style).

# Representation

We represent **nodes** as `u32` in the range `0..n` where `n` is the number of nodes in the graph.
For **edges**, we use a simple tuple-struct `Edge(Node, Node)` directed from the first to the
second node. Undirected graphs are stored by supplying both directions.

### Available Representations

See the [`repr`] module:

- [`CompressedCsr`](crate::repr::CompressedCsr): sorted neighbor lists, delta-encoded as
  varints into a single byte arena ([`codec`]) and decoded lazily on every query,
- [`CsrGraph`](crate::repr::CsrGraph): the plain layout with `u64` offsets and `u32` column
  indices that compression ratios are measured against.

Both are built once from a complete edge set and are immutable (and `Sync`) afterwards.

# Sampling

[`NeighborSampler`](crate::sampler::NeighborSampler) expands a batch of seed nodes hop by
hop, keeping at most a fixed number of uniformly chosen neighbors per node and hop, and
returns the visited nodes renumbered to local ids with one edge list per hop.

```
use glzip::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

let graph = CompressedCsr::builder()
    .num_threads(2)
    .build(5, [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (4, 0)])
    .unwrap();
println!("{}", graph.stats());

let sampler = NeighborSampler::new([2, 2]).unwrap();
let sample = sampler
    .sample(&graph, &[0, 3], &mut Pcg64Mcg::seed_from_u64(7))
    .unwrap();

assert_eq!(sample.seeds(), &[0, 3]);
assert_eq!(sample.layers().len(), 2);
```

# Design

Construction, reading and generation are configured with builder structs
([`CsrBuilder`](crate::repr::CsrBuilder), [`EdgeListReader`](crate::io::EdgeListReader),
[`Gnm`](crate::gens::Gnm), ...). Fallible operations return [`Result`] and validate their
input before building anything. Randomness is always passed in by the caller.

Events are emitted via `tracing`; installing a subscriber is left to the application.

# Usage

- [`prelude`] includes definitions for nodes, edges, graph operations, the representations and the sampler,
- [`io`] reads (optionally gzipped) edge lists, CSV files and NumPy `edge_index` arrays,
- [`gens`] includes random graph generators,
- [`codec`] exposes the varint and delta codecs,
- [`utils`] includes the node mapper used for renumbering.

In most use-cases, `use glzip::prelude::*;` suffices for your needs.
*/

pub mod codec;
pub mod edge;
pub mod error;
pub mod gens;
pub mod io;
pub mod node;
pub mod ops;
pub mod repr;
pub mod sampler;
pub(crate) mod testing;
pub mod utils;

pub use error::{Error, Result};

/// `glzip::prelude` includes definitions for nodes and edges, all graph operation traits, the
/// representations and the sampler.
pub mod prelude {
    pub use super::{edge::*, node::*, ops::*, repr::*, sampler::*};
}
