/*!
# Graph Representations

- [`CompressedCsr`]: the compressed adjacency store. Every node's sorted neighbor list is
  delta-encoded into a single byte arena located by a `u64` offset array.
- [`CsrGraph`]: a plain CSR layout (`u64` offsets, `u32` column indices). It is the
  baseline of the compression ratio, the intermediate step of [`CsrBuilder`] and a
  reference for differential testing.
- [`CsrBuilder`]: configurable (multi-threaded, chunked) construction of [`CompressedCsr`].
- [`CompressionStats`]: the numbers reported for a store.

Both representations are immutable after construction and can be shared between threads.
*/

use crate::{codec::*, edge::*, error::*, node::*, ops::*};

mod builder;
mod compressed;
mod csr;
mod stats;

pub mod digest;

pub use builder::*;
pub use compressed::*;
pub use csr::*;
pub use stats::*;
