//! # Batches
//!
//! Splitting a node set into shuffled seed batches and sampling many batches in parallel.
//! Every batch draws from its own random stream derived from a single seed, so the result
//! does not depend on how rayon schedules the batches.

use rand::{SeedableRng, seq::SliceRandom};
use rand_pcg::Pcg64Mcg;
use rayon::prelude::*;
use tracing::debug;

use super::*;

/// Returns the random stream used for batch `index` by [`NeighborSampler::sample_batches`]
pub fn batch_rng(seed: u64, index: usize) -> Pcg64Mcg {
    Pcg64Mcg::seed_from_u64(seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Shuffles `0..order` and splits it into batches of `batch_size` seeds.
/// The last batch is shorter unless it is dropped via `drop_last`.
///
/// # Panics
/// Panics if `batch_size == 0`.
///
/// ```
/// use glzip::sampler::seed_batches;
/// use rand::SeedableRng;
/// use rand_pcg::Pcg64Mcg;
///
/// let batches = seed_batches(&mut Pcg64Mcg::seed_from_u64(1), 10, 4, false);
/// assert_eq!(batches.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 4, 2]);
/// ```
pub fn seed_batches<R>(rng: &mut R, order: NumNodes, batch_size: usize, drop_last: bool) -> Vec<Vec<Node>>
where
    R: Rng + ?Sized,
{
    assert!(batch_size > 0, "Batches must contain at least one seed!");

    let mut nodes: Vec<Node> = (0..order).collect();
    nodes.shuffle(rng);

    nodes
        .chunks(batch_size)
        .filter(|chunk| !drop_last || chunk.len() == batch_size)
        .map(<[Node]>::to_vec)
        .collect()
}

impl NeighborSampler {
    /// Samples every batch of `batches` on the current rayon pool.
    ///
    /// Batch `i` draws from [`batch_rng(seed, i)`](batch_rng), so the result only depends
    /// on `seed` and not on the number of threads. The output is in batch order.
    ///
    /// # Errors
    /// Returns [`Error::NodeOutOfRange`] for the first invalid seed; all batches are checked
    /// before sampling starts.
    pub fn sample_batches<G, B>(&self, graph: &G, batches: &[B], seed: u64) -> Result<Vec<SampledSubgraph>>
    where
        G: AdjacencyList + Sync,
        B: AsRef<[Node]> + Sync,
    {
        for batch in batches {
            check_seeds(graph, batch.as_ref())?;
        }

        debug!(
            batches = batches.len(),
            layers = self.num_layers(),
            threads = rayon::current_num_threads(),
            "sampler.batches.started"
        );

        batches
            .par_iter()
            .enumerate()
            .map(|(i, batch)| self.sample(graph, batch.as_ref(), &mut batch_rng(seed, i)))
            .collect()
    }
}
