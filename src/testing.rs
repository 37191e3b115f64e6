#[cfg(test)]
use crate::{edge::*, node::*};
#[cfg(test)]
use rand::Rng;

/// Creates a list of at most `m_ub` random directed edges for nodes `0..n`, unsorted and
/// possibly containing duplicates
#[cfg(test)]
pub(crate) fn random_edges<R: Rng>(rng: &mut R, n: NumNodes, m_ub: NumEdges) -> Vec<Edge> {
    (0..m_ub)
        .map(|_| Edge(rng.random_range(0..n), rng.random_range(0..n)))
        .collect()
}

/// Naive adjacency lists (sorted, deduplicated) used as reference in tests
#[cfg(test)]
pub(crate) fn reference_adjacency(n: NumNodes, edges: &[Edge]) -> Vec<Vec<Node>> {
    let mut adj = vec![Vec::new(); n as usize];
    for &Edge(u, v) in edges {
        adj[u as usize].push(v);
    }
    for nbs in &mut adj {
        nbs.sort_unstable();
        nbs.dedup();
    }
    adj
}

/// Every graph should implement `GraphNodeOrder`, `GraphEdgeOrder` and `AdjacencyList`
/// consistently with a naive reference
macro_rules! test_graph_ops {
    ($env:ident, $graph:ident, ($($trait:ident),*)) => {
        #[cfg(test)]
        mod $env {
            use crate::{edge::*, error::*, node::*, ops::*, repr::*, testing::*};
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;
            use itertools::Itertools;

            $(
                test_graph_ops!($graph: $trait);
            )*
        }
    };
    ($graph:ident: AdjacencyList) => {
        #[test]
        fn test_adjacency_list() {
            let rng = &mut Pcg64Mcg::seed_from_u64(3);

            for n in [1 as NumNodes, 10, 20, 50] {
                for m_ub in [n * 2, n * 5, n * 10] {
                    for _ in 0..10 {
                        let edges = random_edges(rng, n, m_ub as NumEdges);
                        let adj = reference_adjacency(n, &edges);

                        let graph = <$graph>::try_from_edges(n, edges.iter().copied()).unwrap();

                        let mut sorted = edges.clone();
                        sorted.sort_unstable();
                        sorted.dedup();

                        assert_eq!(graph.number_of_nodes(), n);
                        assert_eq!(graph.number_of_edges(), sorted.len() as NumEdges);
                        assert_eq!(graph.vertices().collect_vec(), (0..n).collect_vec());
                        assert_eq!(graph.edges().collect_vec(), sorted);

                        for u in 0..n {
                            let nbs = &adj[u as usize];
                            assert_eq!(graph.neighbors_of(u).collect_vec(), *nbs);
                            assert_eq!(graph.degree_of(u) as usize, nbs.len());

                            let v = rng.random_range(0..n);
                            assert_eq!(graph.has_edge(u, v), nbs.contains(&v));
                        }

                        assert_eq!(
                            graph.max_degree() as usize,
                            adj.iter().map(|nbs| nbs.len()).max().unwrap_or(0)
                        );
                        assert_eq!(
                            graph.degree_distribution().iter().map(|&(_, c)| c).sum::<NumNodes>(),
                            n
                        );
                    }
                }
            }
        }
    };
    ($graph:ident: GraphFromScratch) => {
        #[test]
        fn test_graph_from_scratch() {
            let graph = <$graph>::try_from_edges(4, [(0, 1), (3, 3), (0, 1)]).unwrap();
            assert_eq!(graph.number_of_edges(), 2);
            assert!(graph.has_edge(3, 3));
            assert_eq!(graph.vertices_with_neighbors().collect_vec(), vec![0, 3]);

            let err = <$graph>::try_from_edges(4, [(0, 1), (2, 4)]).unwrap_err();
            assert!(matches!(err, Error::NodeOutOfRange { node: 4, order: 4 }));

            let stream = vec![Ok(Edge(0, 1)), Err(Error::malformed(2, "bad")), Ok(Edge(1, 2))];
            let err = <$graph>::try_from_fallible_edges(4, stream).unwrap_err();
            assert!(matches!(err, Error::MalformedInput { line: 2, .. }));

            let graph = <$graph>::try_from_edges(0, std::iter::empty::<Edge>()).unwrap();
            assert!(graph.is_empty());
            assert_eq!(graph.edges().count(), 0);
        }
    };
}

pub(crate) use test_graph_ops;
