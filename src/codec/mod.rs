/*!
# Codec

Variable-length integer encodings used by [`CompressedCsr`](crate::repr::CompressedCsr).

- [`varint`]: LEB128 varints for unsigned integers and zig-zag varints for signed deltas.
- [`delta`]: encoding of a sorted neighbor list as a signed first delta (relative to the
  node owning the list) followed by *gap-minus-one* varints, and the lazy [`DeltaDecoder`].

A node with locally clustered neighbors typically needs 1-2 bytes per edge instead of the
4 bytes of a plain `u32` column index.
*/

pub mod delta;
pub mod varint;

pub use delta::*;
pub use varint::*;
