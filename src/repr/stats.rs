use std::fmt;

use super::*;

/// Fixed per-graph overhead assumed for the uncompressed baseline
pub const NAIVE_HEADER_BYTES: usize = 24;

/// Size statistics of a [`CompressedCsr`].
///
/// The baseline `naive_bytes` is a conventional CSR layout with 64-bit offsets, 32-bit
/// column indices and a small fixed header: `8 * (order + 1) + 4 * size + 24`.
///
/// ```
/// use glzip::prelude::*;
///
/// let graph = CompressedCsr::build(4, [(0, 1), (0, 2), (1, 2), (1, 3)]).unwrap();
/// let stats = graph.stats();
///
/// assert_eq!(stats.naive_bytes, 40 + 16 + 24);
/// assert_eq!(stats.nbytes, 44);
/// assert_eq!(
///     stats.to_string(),
///     "glzip.CSR(order=4, size=4, nbytes=44) ratio=1.82"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub order: NumNodes,
    pub size: NumEdges,
    pub nbytes: usize,
    pub naive_bytes: usize,
}

impl CompressionStats {
    pub fn new(order: NumNodes, size: NumEdges, nbytes: usize) -> Self {
        Self {
            order,
            size,
            nbytes,
            naive_bytes: naive_nbytes(order, size),
        }
    }

    /// Returns `naive_bytes / nbytes`; values above one mean the store is smaller
    pub fn ratio(&self) -> f64 {
        self.naive_bytes as f64 / self.nbytes as f64
    }
}

/// Bytes a conventional CSR layout with the same order and size occupies
pub fn naive_nbytes(order: NumNodes, size: NumEdges) -> usize {
    (order as usize + 1) * size_of::<u64>()
        + size as usize * size_of::<Node>()
        + NAIVE_HEADER_BYTES
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "glzip.CSR(order={}, size={}, nbytes={}) ratio={:.2}",
            self.order,
            self.size,
            self.nbytes,
            self.ratio()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_graph_ratio() {
        let stats = CompressionStats::new(0, 0, 8);
        assert_eq!(stats.naive_bytes, 32);
        assert_eq!(stats.ratio(), 4.0);
    }

    #[test]
    fn naive_baseline() {
        assert_eq!(naive_nbytes(1000, 5000), 8008 + 20_000 + 24);
    }
}
