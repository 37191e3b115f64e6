/*!
# Graph Hash Digests

[`GraphDigest`] hashes the number of nodes followed by the sorted edge list. The digest
only depends on the graph, not on its representation: a [`CompressedCsr`] and a
[`CsrGraph`] with the same edges have the same digest.

[`CompressedCsr::layout_digest`] instead hashes the raw offsets and arena bytes and is used
to check that construction is byte-identical across thread counts.

```
use glzip::{prelude::*, repr::digest::GraphDigest};

let edges = [(4, 3), (1, 2)];
let compressed = CompressedCsr::build(10, edges).unwrap();
let plain = CsrGraph::try_from_edges(10, edges).unwrap();

assert_eq!(compressed.digest_sha256(), plain.digest_sha256());
assert_eq!(compressed.layout_digest().len(), 64);
```
*/

use std::fmt::LowerHex;

use super::*;
use ::digest::{Digest, Output};

/// Trait for computing a representation independent hash digest of a graph
pub trait GraphDigest {
    /// Computes a digest of the graph using the hash function `D` as hexadecimal string
    fn digest<D>(&self) -> String
    where
        Output<D>: LowerHex,
        D: Digest;

    /// Computes a **SHA-256 digest** of the graph (64 hex characters)
    fn digest_sha256(&self) -> String {
        self.digest::<sha2::Sha256>()
    }
}

impl<G> GraphDigest for G
where
    G: AdjacencyList,
{
    fn digest<D>(&self) -> String
    where
        Output<D>: LowerHex,
        D: Digest,
    {
        let mut hasher = D::new();

        hasher.update(self.number_of_nodes().to_le_bytes());
        for Edge(u, v) in self.edges() {
            hasher.update(u.to_le_bytes());
            hasher.update(v.to_le_bytes());
        }

        format!("{:x}", hasher.finalize())
    }
}

impl CompressedCsr {
    /// SHA-256 over the offsets (little endian) followed by the arena, as hex string
    pub fn layout_digest(&self) -> String {
        let mut hasher = sha2::Sha256::new();
        for offset in self.offsets() {
            hasher.update(offset.to_le_bytes());
        }
        hasher.update(self.arena());

        format!("{:x}", hasher.finalize())
    }
}
