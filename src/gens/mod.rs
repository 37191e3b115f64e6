/*!
# Graph Generators

Random directed graphs for tests and benchmarks of the stores and the sampler.

Generators follow a builder pattern:

1. Create a generator instance (e.g., `Gnm::new()`).
2. Set parameters using trait methods (e.g., `.nodes(n).edges(m)`).
3. Generate edges via `generate()` or `stream()`.

Supported models:
- G(n,m): uniform random graphs with a fixed number of nodes and edges
- SmallWorld: directed Watts-Strogatz graphs whose neighbor ids are locally clustered

All graph types implementing [`GraphFromScratch`] can use [`RandomGraph`] for
convenient random graph construction.

```
use glzip::{gens::*, prelude::*};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

let rng = &mut Pcg64Mcg::seed_from_u64(3);
let graph: CompressedCsr = RandomGraph::small_world(rng, 100, 4, 0.1).unwrap();
assert_eq!(graph.size(), 400);
```
*/

use rand::Rng;

use crate::{edge::*, error::*, node::*, ops::*};

mod gnm;
mod small_world;

pub use gnm::*;
pub use small_world::*;

/// Trait for generators that allow setting the number of nodes.
pub trait NumNodesGen: Sized {
    /// Sets the number of nodes in the graph generator.
    fn set_nodes(&mut self, n: NumNodes);

    /// Sets the number of nodes in the graph generator.
    fn nodes(mut self, n: NumNodes) -> Self {
        self.set_nodes(n);
        self
    }
}

/// Trait for generators that allow setting the number of edges.
pub trait NumEdgesGen: Sized {
    /// Sets the number of edges in the graph generator.
    fn set_edges(&mut self, m: NumEdges);

    /// Sets the number of edges in the graph generator.
    fn edges(mut self, m: NumEdges) -> Self {
        self.set_edges(m);
        self
    }
}

/// Trait for generators that allow setting the average degree.
pub trait AverageDegreeGen: Sized {
    /// Set the average degree of this generator.
    fn set_avg_deg(&mut self, deg: f64);

    /// Set the average degree of this generator.
    fn avg_deg(mut self, deg: f64) -> Self {
        self.set_avg_deg(deg);
        self
    }
}

/// General trait for a configurable random edge generator.
pub trait GraphGenerator {
    /// Generates a list of random edges.
    fn generate<R>(&self, rng: &mut R) -> Vec<Edge>
    where
        R: Rng,
    {
        self.stream(rng).collect()
    }

    /// Creates a lazy iterator (stream) over generated edges.
    fn stream<R>(&self, rng: &mut R) -> impl Iterator<Item = Edge>
    where
        R: Rng;
}

/// Trait for building full graph instances from common random models.
pub trait RandomGraph: Sized {
    /// Creates a random `G(n,m)` graph with exactly `m` distinct directed edges.
    ///
    /// # Panics
    /// Panics if `n == 0` or `m > n * n`.
    fn gnm<R>(rng: &mut R, n: NumNodes, m: NumEdges) -> Result<Self>
    where
        R: Rng;

    /// Creates a directed small-world graph where every node links to its `k` successors on
    /// a ring and each link is rewired with probability `beta`.
    ///
    /// # Panics
    /// Panics if `k + 1 >= n` or `beta` is not a valid probability.
    fn small_world<R>(rng: &mut R, n: NumNodes, k: NumNodes, beta: f64) -> Result<Self>
    where
        R: Rng;
}

impl<G> RandomGraph for G
where
    G: GraphFromScratch,
{
    fn gnm<R>(rng: &mut R, n: NumNodes, m: NumEdges) -> Result<Self>
    where
        R: Rng,
    {
        Self::try_from_edges(n, Gnm::new().nodes(n).edges(m).stream(rng))
    }

    fn small_world<R>(rng: &mut R, n: NumNodes, k: NumNodes, beta: f64) -> Result<Self>
    where
        R: Rng,
    {
        Self::try_from_edges(
            n,
            SmallWorld::new()
                .nodes(n)
                .successors(k)
                .rewiring_prob(beta)
                .stream(rng),
        )
    }
}
