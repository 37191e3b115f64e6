use fxhash::FxHashSet;
use smallvec::SmallVec;

use super::*;
use crate::utils::{FromCapacity, Probability};

/// Generator for directed small-world graphs in the Watts-Strogatz model.
///
/// Every node `u` starts with edges to its `k` successors `u+1, ..., u+k` (modulo `n`) on a
/// ring. Each of these edges independently keeps its source and is redirected to a uniform
/// random target with probability `beta`, avoiding self-loops and parallel edges. Hence
/// every node has out-degree exactly `k` and most neighbor ids stay close to the source.
#[derive(Debug, Copy, Clone, Default)]
pub struct SmallWorld {
    n: NumNodes,
    k: NumNodes,
    beta: f64,
}

impl SmallWorld {
    /// Creates a new empty generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of ring successors of every node
    pub fn successors(mut self, k: NumNodes) -> Self {
        self.k = k;
        self
    }

    /// Sets the probability of redirecting an edge
    pub fn rewiring_prob(mut self, beta: f64) -> Self {
        assert!(beta.is_valid_probility());
        self.beta = beta;
        self
    }

    /// Out-edges of `u`
    fn edges_of<R: Rng>(&self, rng: &mut R, u: Node) -> SmallVec<[Edge; 8]> {
        let n = self.n as u64;
        let ring = (1..=self.k as u64).map(|j| ((u as u64 + j) % n) as Node);

        let mut rewire = 0;
        let mut targets = FxHashSet::from_capacity(self.k as usize);
        for v in ring {
            if rng.random_bool(self.beta) {
                rewire += 1;
            } else {
                targets.insert(v);
            }
        }

        let mut edges: SmallVec<[Edge; 8]> = targets.iter().map(|&v| Edge(u, v)).collect();
        while rewire > 0 {
            let v = rng.random_range(0..self.n);
            if v != u && targets.insert(v) {
                edges.push(Edge(u, v));
                rewire -= 1;
            }
        }

        edges.sort_unstable();
        edges
    }
}

impl NumNodesGen for SmallWorld {
    fn set_nodes(&mut self, n: NumNodes) {
        self.n = n;
    }
}

impl GraphGenerator for SmallWorld {
    /// # Panics
    /// Panics if `k + 1 >= n`, as rewired edges could not avoid loops and parallel edges.
    fn stream<R>(&self, rng: &mut R) -> impl Iterator<Item = Edge>
    where
        R: Rng,
    {
        assert!(
            (self.k as u64) < (self.n as u64).saturating_sub(1),
            "A small-world graph needs more than k+1 nodes!"
        );

        (0..self.n).flat_map(move |u| self.edges_of(rng, u))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn ring_without_rewiring() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let edges = SmallWorld::new().nodes(5).successors(2).generate(rng);
        let mut expected = vec![
            Edge(0, 1),
            Edge(0, 2),
            Edge(1, 2),
            Edge(1, 3),
            Edge(2, 3),
            Edge(2, 4),
            Edge(3, 4),
            Edge(3, 0),
            Edge(4, 0),
            Edge(4, 1),
        ];
        expected.sort_unstable();
        assert_eq!(edges, expected);
    }

    #[test]
    fn rewiring_keeps_out_degree() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for beta in [0.1, 0.5, 1.0] {
            let edges = SmallWorld::new()
                .nodes(300)
                .successors(6)
                .rewiring_prob(beta)
                .generate(rng);

            assert_eq!(edges.len(), 300 * 6);
            assert!(edges.iter().all_unique());
            assert!(edges.iter().all(|e| !e.is_loop() && e.1 < 300));
            assert!(edges.iter().counts_by(|e| e.0).values().all(|&d| d == 6));
        }
    }
}
