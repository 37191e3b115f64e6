use fxhash::FxHashMap;

use super::*;
use crate::utils::FromCapacity;

/// Configuration type used by [`Gnm`] to determine how the graph should be parameterized.
#[derive(Debug, Copy, Clone, Default)]
enum GnmType {
    /// No value has been set yet; using this will panic at runtime.
    #[default]
    NotSet,
    /// Fixed number of edges `m`.
    Edges(NumEdges),
    /// Average degree `d`, to be converted to `m = d*n`.
    AvgDeg(f64),
}

/// Generator for uniform directed `G(n,m)` random graphs with `n` nodes and `m` distinct
/// edges (self-loops included).
#[derive(Debug, Copy, Clone, Default)]
pub struct Gnm {
    n: u64,
    m: GnmType,
}

impl Gnm {
    /// Creates a new empty `G(n,m)` generator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl NumNodesGen for Gnm {
    fn set_nodes(&mut self, n: NumNodes) {
        self.n = n as u64;
    }
}

impl NumEdgesGen for Gnm {
    fn set_edges(&mut self, m: NumEdges) {
        self.m = GnmType::Edges(m);
    }
}

impl AverageDegreeGen for Gnm {
    /// Internally converted to an edge count: `m = d*n`.
    fn set_avg_deg(&mut self, deg: f64) {
        self.m = GnmType::AvgDeg(deg);
    }
}

impl GraphGenerator for Gnm {
    /// Returns a streaming iterator over a random `G(n,m)` edge set.
    ///
    /// # Panics
    /// - If `n == 0`
    /// - If neither `edges(m)` nor `avg_deg(d)` was set
    /// - If more than `n * n` edges are requested
    fn stream<R>(&self, rng: &mut R) -> impl Iterator<Item = Edge>
    where
        R: Rng,
    {
        assert!(self.n > 0, "At least one node must be generated!");
        let m = match self.m {
            GnmType::NotSet => panic!("Number of edges of Gnm was not set!"),
            GnmType::Edges(m) => m,
            GnmType::AvgDeg(d) => (self.n as f64 * d) as NumEdges,
        };
        assert!(m <= self.n * self.n, "G(n,m) cannot have more than n^2 edges!");

        GnmGenerator::new(rng, self.n, m)
    }
}

/// Produces exactly `m` uniformly random and distinct directed edges without replacement.
///
/// The algorithm used is based on:
/// > *V. Batagelj and U. Brandes. Efficient Generation of Large Random Networks.
/// > Physical Review E 71.3 (2005): 036113.*
///
/// A Fisher-Yates shuffle over all `n^2` edge ids is simulated with a sparse map that only
/// records the swapped positions.
pub struct GnmGenerator<'a, R>
where
    R: Rng,
{
    n: u64,
    rem: u64,
    cur: u64,
    end: u64,
    map: FxHashMap<u64, u64>,
    rng: &'a mut R,
}

impl<'a, R> GnmGenerator<'a, R>
where
    R: Rng,
{
    pub fn new(rng: &'a mut R, n: u64, m: u64) -> Self {
        let end = n * n;
        debug_assert!(m <= end);

        Self {
            n,
            rem: m,
            cur: 0,
            end,
            map: FxHashMap::from_capacity(m as usize),
            rng,
        }
    }

    fn next_step(&mut self) -> Option<u64> {
        if self.rem == 0 {
            return None;
        }

        let next_rng = self.rng.random_range(self.cur..self.end);
        let next_u64 = self.map.get(&next_rng).copied().unwrap_or(next_rng);

        // position `cur` leaves the shuffled range; remember what it held
        let replacement = self.map.get(&self.cur).copied().unwrap_or(self.cur);
        self.map.insert(next_rng, replacement);

        self.cur += 1;
        self.rem -= 1;

        Some(next_u64)
    }
}

impl<R> Iterator for GnmGenerator<'_, R>
where
    R: Rng,
{
    type Item = Edge;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_step().map(|x| Edge::from_u64(x, self.n))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rem as usize, Some(self.rem as usize))
    }
}

impl<R> ExactSizeIterator for GnmGenerator<'_, R> where R: Rng {}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn edges_are_distinct() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for (n, m) in [(1, 1), (10, 100), (50, 300), (1000, 5000)] {
            let edges = Gnm::new().nodes(n).edges(m).generate(rng);
            assert_eq!(edges.len() as NumEdges, m);
            assert!(edges.iter().all_unique());
            assert!(edges.iter().all(|e| e.0 < n && e.1 < n));
        }
    }

    #[test]
    fn average_degree() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let edges = Gnm::new().nodes(100).avg_deg(3.0).generate(rng);
        assert_eq!(edges.len(), 300);
    }
}
