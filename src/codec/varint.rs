//! # Varints
//!
//! Little-endian base-128 (LEB128) encoding: every byte carries 7 payload bits, least
//! significant group first, and the high bit is set on every byte except the last.
//!
//! ```
//! use glzip::codec::*;
//!
//! let mut buf = Vec::new();
//! encode_unsigned(300, &mut buf);
//! assert_eq!(buf, [0xac, 0x02]);
//! assert_eq!(decode_unsigned(&buf, 0).unwrap(), (300, 2));
//! ```

use crate::error::{Error, Result};

/// Payload bits per byte
const PAYLOAD_BITS: u32 = 7;

/// Mask of the payload bits
const PAYLOAD_MASK: u8 = 0x7f;

/// Continuation flag
const CONTINUE: u8 = 0x80;

/// A `u64` never needs more than `ceil(64 / 7)` bytes
pub const MAX_VARINT_LEN: usize = 10;

/// Appends the varint encoding of `value` to `buf`
#[inline]
pub fn encode_unsigned(mut value: u64, buf: &mut Vec<u8>) {
    while value > PAYLOAD_MASK as u64 {
        buf.push((value as u8 & PAYLOAD_MASK) | CONTINUE);
        value >>= PAYLOAD_BITS;
    }
    buf.push(value as u8);
}

/// Returns the number of bytes [`encode_unsigned`] emits for `value`.
///
/// ```
/// use glzip::codec::encoded_len;
///
/// assert_eq!(encoded_len(0), 1);
/// assert_eq!(encoded_len(127), 1);
/// assert_eq!(encoded_len(128), 2);
/// assert_eq!(encoded_len(u64::MAX), 10);
/// ```
#[inline]
pub const fn encoded_len(value: u64) -> usize {
    let bits = u64::BITS - value.leading_zeros();
    if bits == 0 {
        1
    } else {
        bits.div_ceil(PAYLOAD_BITS) as usize
    }
}

/// Decodes the varint starting at `buf[cursor]` and returns the value together with the
/// position of the first byte after it.
///
/// # Errors
/// Returns [`Error::CorruptEncoding`] (pointing at `cursor`) if `buf` ends before a byte
/// without continuation flag is found or the value does not fit into 64 bits.
#[inline]
pub fn decode_unsigned(buf: &[u8], cursor: usize) -> Result<(u64, usize)> {
    let mut value = 0u64;
    let mut shift = 0u32;

    for (i, &byte) in buf.iter().enumerate().skip(cursor) {
        let payload = (byte & PAYLOAD_MASK) as u64;
        if shift >= u64::BITS || (shift > 0 && payload >> (u64::BITS - shift) != 0) {
            return Err(Error::CorruptEncoding { offset: cursor });
        }

        value |= payload << shift;
        if byte & CONTINUE == 0 {
            return Ok((value, i + 1));
        }

        shift += PAYLOAD_BITS;
    }

    Err(Error::CorruptEncoding { offset: cursor })
}

/// Maps signed integers onto unsigned ones such that small magnitudes stay small:
/// `0, -1, 1, -2, 2, ...` become `0, 1, 2, 3, 4, ...`
#[inline(always)]
pub const fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag`]
#[inline(always)]
pub const fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Appends the zig-zag varint encoding of `value` to `buf`
#[inline]
pub fn encode_signed(value: i64, buf: &mut Vec<u8>) {
    encode_unsigned(zigzag(value), buf);
}

/// Decodes a zig-zag varint; see [`decode_unsigned`] for the error conditions
#[inline]
pub fn decode_signed(buf: &[u8], cursor: usize) -> Result<(i64, usize)> {
    let (value, cursor) = decode_unsigned(buf, cursor)?;
    Ok((unzigzag(value), cursor))
}
