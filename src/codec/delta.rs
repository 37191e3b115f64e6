//! # Delta-Encoded Neighbor Lists
//!
//! A strictly increasing neighbor list `[n0 < n1 < ... < nk]` of node `u` is stored as
//! - the zig-zag varint of `n0 - u`, followed by
//! - the varint of `n_i - n_{i-1} - 1` for every `i > 0`.
//!
//! Neighbors are strictly increasing, hence every gap is at least one and storing `gap - 1`
//! turns the (frequent) gap of one into a zero. Relating the first neighbor to `u` keeps
//! it small for graphs with locally clustered ids.
//!
//! ```
//! use glzip::codec::*;
//!
//! let mut buf = Vec::new();
//! encode_neighbors(&mut buf, 10, &[8, 11, 12, 40]);
//! assert_eq!(buf, [3, 2, 0, 27]);
//!
//! let decoded: Vec<u32> = DeltaDecoder::new(&buf, 10).map(|x| x.unwrap()).collect();
//! assert_eq!(decoded, [8, 11, 12, 40]);
//! ```

use std::iter::FusedIterator;

use super::varint::*;
use crate::{error::*, node::*};

/// Appends the delta encoding of `neighbors` (owned by node `u`) to `buf` and returns the
/// number of bytes written.
///
/// `neighbors` must be strictly increasing; this is only checked in debug builds.
pub fn encode_neighbors(buf: &mut Vec<u8>, u: Node, neighbors: &[Node]) -> usize {
    debug_assert!(neighbors.windows(2).all(|w| w[0] < w[1]));

    let start = buf.len();
    let Some((&first, rest)) = neighbors.split_first() else {
        return 0;
    };

    encode_signed(first as i64 - u as i64, buf);

    let mut prev = first;
    for &v in rest {
        encode_unsigned((v - prev - 1) as u64, buf);
        prev = v;
    }

    buf.len() - start
}

/// Returns the number of bytes [`encode_neighbors`] emits without encoding anything
pub fn encoded_neighbors_len(u: Node, neighbors: &[Node]) -> usize {
    let Some((&first, _)) = neighbors.split_first() else {
        return 0;
    };

    encoded_len(zigzag(first as i64 - u as i64))
        + neighbors
            .windows(2)
            .map(|w| encoded_len((w[1] - w[0] - 1) as u64))
            .sum::<usize>()
}

/// Lazy decoder over the delta-encoded neighbor list of a single node.
///
/// The decoder is handed exactly the bytes of one list and yields `Ok(neighbor)` in
/// increasing order. Decoding is restartable simply by creating a new decoder over the
/// same bytes. After an `Err` has been returned, the decoder is exhausted.
#[derive(Debug, Clone)]
pub struct DeltaDecoder<'a> {
    bytes: &'a [u8],
    cursor: usize,
    /// Base node for the first entry; afterwards the last decoded neighbor
    prev: i64,
    started: bool,
    /// Added to byte offsets reported in errors
    base_offset: usize,
}

impl<'a> DeltaDecoder<'a> {
    /// Creates a decoder over `bytes` holding the list of node `u`
    pub fn new(bytes: &'a [u8], u: Node) -> Self {
        Self {
            bytes,
            cursor: 0,
            prev: u as i64,
            started: false,
            base_offset: 0,
        }
    }

    /// Reports error offsets relative to an enclosing buffer in which `bytes` starts at `offset`
    pub fn with_base_offset(mut self, offset: usize) -> Self {
        self.base_offset = offset;
        self
    }

    /// Returns *true* if all bytes were consumed
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.bytes.len()
    }

    fn corrupt(&mut self, at: usize) -> Error {
        self.cursor = self.bytes.len();
        Error::CorruptEncoding {
            offset: self.base_offset + at,
        }
    }

    fn decode_next(&mut self) -> Result<Node> {
        let at = self.cursor;

        let next = if self.started {
            let (gap, cursor) = decode_unsigned(self.bytes, at).map_err(|_| self.corrupt(at))?;
            self.cursor = cursor;
            (gap as i64)
                .checked_add(1)
                .and_then(|gap| self.prev.checked_add(gap))
        } else {
            let (delta, cursor) = decode_signed(self.bytes, at).map_err(|_| self.corrupt(at))?;
            self.cursor = cursor;
            self.started = true;
            self.prev.checked_add(delta)
        };

        match next {
            Some(v) if (0..INVALID_NODE as i64).contains(&v) => {
                self.prev = v;
                Ok(v as Node)
            }
            _ => Err(self.corrupt(at)),
        }
    }
}

impl Iterator for DeltaDecoder<'_> {
    type Item = Result<Node>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_exhausted() {
            return None;
        }

        Some(self.decode_next())
    }

    /// Each entry takes at least one byte
    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.bytes.len().saturating_sub(self.cursor);
        (rem.min(1), Some(rem))
    }
}

impl FusedIterator for DeltaDecoder<'_> {}

/// Decodes a complete neighbor list into a vector.
///
/// # Errors
/// Returns [`Error::CorruptEncoding`] if `bytes` is not a valid encoding.
pub fn decode_neighbors(bytes: &[u8], u: Node) -> Result<Vec<Node>> {
    DeltaDecoder::new(bytes, u).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn empty_list_takes_no_bytes() {
        let mut buf = Vec::new();
        assert_eq!(encode_neighbors(&mut buf, 3, &[]), 0);
        assert!(buf.is_empty());
        assert_eq!(DeltaDecoder::new(&buf, 3).count(), 0);
    }

    #[test]
    fn first_neighbor_may_precede_owner() {
        for (u, nbs) in [
            (0, vec![0]),
            (5, vec![0, 1, 2]),
            (5, vec![5]),
            (1000, vec![3, 999, 1000, 1001, 70_000]),
            (INVALID_NODE - 1, vec![0, INVALID_NODE - 1]),
        ] {
            let mut buf = Vec::new();
            let len = encode_neighbors(&mut buf, u, &nbs);
            assert_eq!(len, buf.len());
            assert_eq!(encoded_neighbors_len(u, &nbs), len);
            assert_eq!(decode_neighbors(&buf, u).unwrap(), nbs);
        }
    }

    #[test]
    fn consecutive_neighbors_take_one_byte_each() {
        let nbs = (100..200).collect_vec();
        let mut buf = Vec::new();
        encode_neighbors(&mut buf, 100, &nbs);
        assert_eq!(buf.len(), 100);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn random_lists_roundtrip() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for _ in 0..200 {
            let n = rng.random_range(1..100_000u32);
            let u = rng.random_range(0..n);
            let mut nbs = (0..rng.random_range(0..50))
                .map(|_| rng.random_range(0..n))
                .collect_vec();
            nbs.sort_unstable();
            nbs.dedup();

            let mut buf = vec![0xaa; 3];
            encode_neighbors(&mut buf, u, &nbs);
            assert_eq!(decode_neighbors(&buf[3..], u).unwrap(), nbs);
        }
    }

    #[test]
    fn truncated_list_reports_offset() {
        let mut buf = Vec::new();
        encode_neighbors(&mut buf, 0, &[1, 1000]);
        assert_eq!(buf, [2, 0xe6, 0x07]);
        buf.pop();

        let mut decoder = DeltaDecoder::new(&buf, 0).with_base_offset(40);
        assert_eq!(decoder.next().unwrap().unwrap(), 1);
        assert!(matches!(
            decoder.next(),
            Some(Err(Error::CorruptEncoding { offset: 41 }))
        ));
        assert!(decoder.next().is_none());
    }

    #[test]
    fn negative_neighbor_is_corrupt() {
        let mut buf = Vec::new();
        encode_signed(-5, &mut buf);
        assert!(decode_neighbors(&buf, 2).is_err());
        assert_eq!(decode_neighbors(&buf, 5).unwrap(), vec![0]);
    }
}
