/*!
# Errors

All fallible operations of this crate return [`Result`], whose error type [`Error`]
identifies the offending node id, input line, byte offset or fan-out index.

Errors are produced eagerly: construction and sampling validate their input before any
store or subgraph exists, so a failed call never leaves a partial value behind.
*/

use thiserror::Error;

/// Shorthand for results of this crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// An endpoint or seed is negative or not smaller than the number of nodes
    #[error("node {node} is out of range for a graph with {order} nodes")]
    NodeOutOfRange { node: i64, order: u64 },

    /// External edge input could not be parsed (1-based line, 0 if not line-oriented)
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// A varint or offset range runs past its allotted bytes
    #[error("corrupt encoding at byte offset {offset}")]
    CorruptEncoding { offset: usize },

    /// A non-positive fan-out was supplied for the layer at `index`
    #[error("invalid fan-out {fanout} for layer {index}: fan-outs must be positive")]
    InvalidFanout { index: usize, fanout: i64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Shorthand for [`Error::NodeOutOfRange`]
    pub(crate) fn node_out_of_range<N: Into<i64>>(node: N, order: impl Into<u64>) -> Self {
        Error::NodeOutOfRange {
            node: node.into(),
            order: order.into(),
        }
    }

    /// Shorthand for [`Error::MalformedInput`]
    pub(crate) fn malformed<S: Into<String>>(line: usize, reason: S) -> Self {
        Error::MalformedInput {
            line,
            reason: reason.into(),
        }
    }

    /// Returns *true* if the error signals a violated internal invariant rather than bad input
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::CorruptEncoding { .. })
    }
}
