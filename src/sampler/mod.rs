/*!
# Multi-Hop Neighbor Sampling

[`NeighborSampler`] draws GraphSAGE-style computation graphs for mini-batches of seed nodes.
Starting at the seeds, every hop `i` keeps at most `fanouts[i]` uniformly chosen
out-neighbors of each frontier node; the distinct sampled neighbors form the next frontier.

The result is a [`SampledSubgraph`] in local ids: `node_ids[i]` is the global id of local
id `i`, seeds occupy the first `batch_size` positions (in order, duplicates kept) and all
other nodes follow in order of discovery. Each hop yields a [`Layer`] of edges
`(local(neighbor), local(target))`, directed along the flow of messages. Layers are stored
hop 1 first, i.e. the layer around the seeds comes first.

```
use glzip::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

let graph = CompressedCsr::build(4, [(0, 1), (0, 2), (1, 2), (1, 3)]).unwrap();
let sampler = NeighborSampler::new([2]).unwrap();

let sample = sampler
    .sample(&graph, &[0], &mut Pcg64Mcg::seed_from_u64(1))
    .unwrap();

assert_eq!(sample.node_ids(), &[0, 1, 2]);
assert_eq!(sample.batch_size(), 1);
assert_eq!(sample.layers()[0].edges(), &[Edge(1, 0), Edge(2, 0)]);
assert_eq!(sample.layers()[0].size(), (1, 3));
```
*/

use fxhash::FxHashSet;
use rand::{Rng, seq::IteratorRandom};
use smallvec::SmallVec;
use tracing::trace;

use crate::{edge::*, error::*, node::*, ops::*, utils::*};

mod batch;

pub use batch::*;

/// Sampled neighbors of a single node are kept inline up to this size
type NeighborBuffer = SmallVec<[Node; 16]>;

/// Edges of one hop of a [`SampledSubgraph`] in local ids
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layer {
    edges: Vec<Edge>,
    num_targets: usize,
    num_sources: usize,
}

impl Layer {
    /// Edges `(local(neighbor), local(target))` in order of sampling
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of sampled edges in this hop
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns `(num_targets, num_sources)`: the number of distinct frontier nodes expanded
    /// in this hop and the number of distinct nodes referenced by its edges
    pub fn size(&self) -> (usize, usize) {
        (self.num_targets, self.num_sources)
    }

    /// Returns the edges as two rows `[sources, targets]`
    pub fn edge_index(&self) -> [Vec<Node>; 2] {
        let (sources, targets) = self.edges.iter().map(|&Edge(u, v)| (u, v)).unzip();
        [sources, targets]
    }
}

/// A sampled computation graph in local ids; see the [module documentation](self)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledSubgraph {
    node_ids: Vec<Node>,
    batch_size: usize,
    layers: Vec<Layer>,
}

impl SampledSubgraph {
    /// Global ids indexed by local id
    pub fn node_ids(&self) -> &[Node] {
        &self.node_ids
    }

    /// Number of seeds (including duplicates)
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// The seed batch as passed to the sampler
    pub fn seeds(&self) -> &[Node] {
        &self.node_ids[..self.batch_size]
    }

    /// Layers in hop order, the layer adjacent to the seeds first
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Length of [`node_ids`](Self::node_ids), duplicate seeds included
    pub fn num_nodes(&self) -> usize {
        self.node_ids.len()
    }

    /// Returns the global id of local id `local` if it exists
    pub fn global_id_of(&self, local: Node) -> Option<Node> {
        self.node_ids.get(local as usize).copied()
    }

    /// Releases `(node_ids, batch_size, layers)`
    pub fn into_parts(self) -> (Vec<Node>, usize, Vec<Layer>) {
        (self.node_ids, self.batch_size, self.layers)
    }
}

/// Samples bounded multi-hop neighborhoods with fixed per-hop fan-outs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborSampler {
    fanouts: Vec<usize>,
}

impl NeighborSampler {
    /// Creates a sampler with one fan-out per hop; `fanouts[0]` applies to the seeds.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFanout`] for the first fan-out that is not positive.
    pub fn new<I, F>(fanouts: I) -> Result<Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<i64>,
    {
        let fanouts = fanouts
            .into_iter()
            .enumerate()
            .map(|(index, fanout)| {
                let fanout = fanout.into();
                usize::try_from(fanout)
                    .ok()
                    .filter(|&f| f > 0)
                    .ok_or(Error::InvalidFanout { index, fanout })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { fanouts })
    }

    /// Fan-out per hop, the hop around the seeds first
    pub fn fanouts(&self) -> &[usize] {
        &self.fanouts
    }

    /// Number of hops, and thus of layers in every sample
    pub fn num_layers(&self) -> usize {
        self.fanouts.len()
    }

    /// Samples the computation graph of `seeds`.
    ///
    /// Frontier nodes with at most `f` neighbors keep all of them; otherwise a uniform
    /// `f`-subset is drawn without replacement by reservoir sampling over the lazily decoded
    /// neighbor list. All randomness comes from `rng`.
    ///
    /// # Errors
    /// Returns [`Error::NodeOutOfRange`] if a seed is not a node of `graph`. Seeds are checked
    /// before anything is sampled.
    pub fn sample<G, R>(&self, graph: &G, seeds: &[Node], rng: &mut R) -> Result<SampledSubgraph>
    where
        G: AdjacencyList,
        R: Rng + ?Sized,
    {
        check_seeds(graph, seeds)?;

        let mut mapper = LocalIdMapper::from_capacity(seeds.len() * (1 + self.fanouts.len()));
        let mut frontier: Vec<Node> = Vec::with_capacity(seeds.len());
        for &s in seeds {
            let local = mapper.push(s);
            if local as usize == mapper.len() as usize - 1 {
                frontier.push(s);
            }
        }

        let mut layers = Vec::with_capacity(self.fanouts.len());
        let mut sampled: NeighborBuffer = SmallVec::new();
        for (hop, &fanout) in self.fanouts.iter().enumerate() {
            let mut edges = Vec::new();
            let mut next_frontier = Vec::new();
            let mut in_next_frontier = FxHashSet::default();
            let mut referenced = FxHashSet::default();

            for &u in &frontier {
                sample_neighbors(graph, u, fanout, rng, &mut sampled);
                if sampled.is_empty() {
                    continue;
                }

                let Some(local_u) = mapper.new_id_of(u) else {
                    unreachable!("frontier node {u} has no local id");
                };
                referenced.insert(local_u);

                for &w in &sampled {
                    let (local_w, _) = mapper.get_or_insert(w);
                    edges.push(Edge(local_w, local_u));
                    referenced.insert(local_w);

                    if in_next_frontier.insert(w) {
                        next_frontier.push(w);
                    }
                }
            }

            trace!(
                hop,
                fanout,
                targets = frontier.len(),
                sources = referenced.len(),
                edges = edges.len(),
                nodes = mapper.len(),
                "sampler.hop.completed"
            );

            layers.push(Layer {
                edges,
                num_targets: frontier.len(),
                num_sources: referenced.len(),
            });
            frontier = next_frontier;
        }

        Ok(SampledSubgraph {
            node_ids: mapper.into_old_ids(),
            batch_size: seeds.len(),
            layers,
        })
    }
}

/// Fails on the first seed that is not a node of `graph`
fn check_seeds<G: GraphNodeOrder>(graph: &G, seeds: &[Node]) -> Result<()> {
    match seeds.iter().find(|&&s| !graph.has_vertex(s)) {
        Some(&s) => Err(Error::node_out_of_range(s, graph.number_of_nodes())),
        None => Ok(()),
    }
}

/// Replaces `buf` by at most `fanout` neighbors of `u` drawn uniformly without replacement,
/// in increasing order. If `u` has at most `fanout` neighbors, all of them are taken and
/// no randomness is consumed.
fn sample_neighbors<G, R>(graph: &G, u: Node, fanout: usize, rng: &mut R, buf: &mut NeighborBuffer)
where
    G: AdjacencyList,
    R: Rng + ?Sized,
{
    let amount = fanout.min(graph.degree_of(u) as usize);
    buf.clear();
    buf.resize(amount, INVALID_NODE);

    let taken = graph.neighbors_of(u).choose_multiple_fill(rng, buf);
    buf.truncate(taken);
    buf.sort_unstable();
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{gens::*, repr::*, testing::*};
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn worked_example() -> CompressedCsr {
        CompressedCsr::build(4, [(0, 1), (0, 2), (1, 2), (1, 3)]).unwrap()
    }

    #[test]
    fn single_hop_takes_full_neighborhood() {
        let graph = worked_example();
        let sampler = NeighborSampler::new([2]).unwrap();
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        let sample = sampler.sample(&graph, &[0], rng).unwrap();
        assert_eq!(sample.node_ids(), &[0, 1, 2]);
        assert_eq!(sample.batch_size(), 1);
        assert_eq!(sample.layers().len(), 1);

        let layer = &sample.layers()[0];
        assert_eq!(layer.edges(), &[Edge(1, 0), Edge(2, 0)]);
        assert_eq!(layer.size(), (1, 3));
        assert_eq!(layer.edge_index(), [vec![1, 2], vec![0, 0]]);
    }

    #[test]
    fn invalid_fanouts_are_rejected() {
        assert!(matches!(
            NeighborSampler::new([2, 0, 3]),
            Err(Error::InvalidFanout { index: 1, fanout: 0 })
        ));
        assert!(matches!(
            NeighborSampler::new([-4i64]),
            Err(Error::InvalidFanout { index: 0, fanout: -4 })
        ));
        assert_eq!(NeighborSampler::new([25, 10]).unwrap().fanouts(), &[25, 10]);
        assert_eq!(NeighborSampler::new(Vec::<i64>::new()).unwrap().num_layers(), 0);
    }

    #[test]
    fn seeds_are_validated_first() {
        let graph = worked_example();
        let sampler = NeighborSampler::new([2]).unwrap();
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        assert!(matches!(
            sampler.sample(&graph, &[0, 4], rng),
            Err(Error::NodeOutOfRange { node: 4, order: 4 })
        ));
    }

    #[test]
    fn duplicate_seeds_keep_positions() {
        let graph = worked_example();
        let sampler = NeighborSampler::new([5]).unwrap();
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        let sample = sampler.sample(&graph, &[1, 3, 1], rng).unwrap();
        assert_eq!(sample.seeds(), &[1, 3, 1]);
        assert_eq!(sample.node_ids(), &[1, 3, 1, 2]);

        // node 1 expanded once; node 3 was already mapped at local id 1
        let layer = &sample.layers()[0];
        assert_eq!(layer.edges(), &[Edge(3, 0), Edge(1, 0)]);
        assert_eq!(layer.size(), (2, 3));
    }

    #[test]
    fn visited_nodes_are_expanded_again() {
        let graph = CompressedCsr::build(3, [(0, 1), (1, 0), (2, 2)]).unwrap();
        let sampler = NeighborSampler::new([1, 1, 1]).unwrap();
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        let sample = sampler.sample(&graph, &[0], rng).unwrap();
        assert_eq!(sample.node_ids(), &[0, 1]);
        assert_eq!(sample.layers()[0].edges(), &[Edge(1, 0)]);
        assert_eq!(sample.layers()[1].edges(), &[Edge(0, 1)]);
        assert_eq!(sample.layers()[2].edges(), &[Edge(1, 0)]);
        assert!(sample.layers().iter().all(|l| l.size() == (1, 2)));

        let sample = sampler.sample(&graph, &[2], rng).unwrap();
        assert_eq!(sample.node_ids(), &[2]);
        assert!(sample.layers().iter().all(|l| l.edges() == [Edge(0, 0)]));
        assert!(sample.layers().iter().all(|l| l.size() == (1, 1)));
    }

    #[test]
    fn isolated_seeds_contribute_nothing() {
        let graph = CompressedCsr::build(3, [(1, 2)]).unwrap();
        let sampler = NeighborSampler::new([3, 3]).unwrap();
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        let sample = sampler.sample(&graph, &[0, 2], rng).unwrap();
        assert_eq!(sample.node_ids(), &[0, 2]);
        assert_eq!(sample.layers()[0], Layer { num_targets: 2, ..Default::default() });
        assert_eq!(sample.layers()[1], Layer::default());

        let sample = sampler.sample(&graph, &[], rng).unwrap();
        assert_eq!(sample.num_nodes(), 0);
        assert_eq!(sample.layers().len(), 2);
    }

    #[test]
    fn sampled_sets_match_neighborhoods() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for _ in 0..20 {
            let n = rng.random_range(2..300);
            let edges = random_edges(rng, n, 8 * n as NumEdges);
            let adj = reference_adjacency(n, &edges);
            let graph = CompressedCsr::build(n, edges).unwrap();

            let fanouts = (0..rng.random_range(1..4))
                .map(|_| rng.random_range(1..12i64))
                .collect_vec();
            let sampler = NeighborSampler::new(fanouts.clone()).unwrap();
            let seeds = (0..rng.random_range(1..20))
                .map(|_| rng.random_range(0..n))
                .collect_vec();

            let sample = sampler.sample(&graph, &seeds, rng).unwrap();
            assert_eq!(sample.seeds(), &seeds[..]);
            assert!(sample.node_ids()[seeds.len()..].iter().all_unique());

            let mut frontier = seeds.iter().copied().unique().collect_vec();
            for (layer, &fanout) in sample.layers().iter().zip(&fanouts) {
                let mut next = Vec::new();
                for (target, group) in &layer.edges().iter().chunk_by(|e| e.1) {
                    let u = sample.global_id_of(target).unwrap();
                    let picked = group
                        .map(|e| sample.global_id_of(e.0).unwrap())
                        .collect_vec();

                    let nbs = &adj[u as usize];
                    assert!(picked.iter().all_unique());
                    assert!(picked.iter().all(|w| nbs.contains(w)));
                    assert_eq!(picked.len(), nbs.len().min(fanout as usize));
                    next.extend(picked);
                }

                let expanded = frontier
                    .iter()
                    .filter(|&&u| !adj[u as usize].is_empty())
                    .count();
                assert_eq!(layer.size().0, frontier.len());
                assert_eq!(
                    layer.edges().iter().map(|e| e.1).dedup().count(),
                    expanded
                );
                let num_nodes = sample.num_nodes() as Node;
                assert!(layer.edges().iter().all(|e| e.0 < num_nodes && e.1 < num_nodes));

                frontier = next.into_iter().unique().collect_vec();
            }
        }
    }

    #[test]
    fn fanout_beyond_degree_takes_all() {
        let graph = worked_example();
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for fanout in [3, 1 << 27, i64::MAX] {
            let sampler = NeighborSampler::new([fanout, fanout]).unwrap();
            let sample = sampler.sample(&graph, &[0], rng).unwrap();
            assert_eq!(sample.node_ids(), &[0, 1, 2, 3]);
            assert_eq!(sample.layers()[0].edges(), &[Edge(1, 0), Edge(2, 0)]);
            assert_eq!(sample.layers()[1].edges(), &[Edge(2, 1), Edge(3, 1)]);
        }
    }

    #[test]
    fn subsets_are_uniform() {
        let graph = CompressedCsr::build(5, [(0, 1), (0, 2), (0, 3), (0, 4)]).unwrap();
        let sampler = NeighborSampler::new([2]).unwrap();
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        let mut counts = [0usize; 5];
        for _ in 0..6000 {
            let sample = sampler.sample(&graph, &[0], rng).unwrap();
            assert_eq!(sample.num_nodes(), 3);
            for &w in &sample.node_ids()[1..] {
                counts[w as usize] += 1;
            }
        }

        assert_eq!(counts[0], 0);
        for &c in &counts[1..] {
            assert!((2700..3300).contains(&c), "{counts:?}");
        }
    }

    #[test]
    fn representations_sample_identically() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);
        let plain: CsrGraph = RandomGraph::gnm(rng, 500, 5000).unwrap();
        let compressed = CompressedCsr::from(&plain);
        let sampler = NeighborSampler::new([10, 5]).unwrap();

        for seed in 0..10 {
            let seeds = (0..32).map(|_| rng.random_range(0..500)).collect_vec();
            let a = sampler
                .sample(&plain, &seeds, &mut Pcg64Mcg::seed_from_u64(seed))
                .unwrap();
            let b = sampler
                .sample(&compressed, &seeds, &mut Pcg64Mcg::seed_from_u64(seed))
                .unwrap();
            assert_eq!(a, b);
        }
    }
}
