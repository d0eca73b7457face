//! Byte-pair run-length encoding.
//!
//! Every maximal run of one byte value becomes a `(value, count)` pair, with
//! `count` in `1..=255`. Longer runs are split into several pairs. Single bytes
//! still cost a full pair, so the encoded form can be twice the input size.

use super::ChunkCodec;
use crate::error::{CodecError, Result};

/// Longest run a single pair can describe.
pub const MAX_RUN: usize = u8::MAX as usize;

pub struct Rle;

impl ChunkCodec for Rle {
    fn name(&self) -> &'static str {
        "rle"
    }

    fn encode(&self, src: &[u8]) -> Result<Vec<u8>> {
        encode(src)
    }

    fn decode(&self, src: &[u8]) -> Result<Vec<u8>> {
        decode(src)
    }
}

/// `(value, count)` for every pair `encode` emits, in order.
fn pairs(input: &[u8]) -> impl Iterator<Item = (u8, usize)> + '_ {
    let mut i = 0;
    std::iter::from_fn(move || {
        let value = *input.get(i)?;
        let run = input[i..]
            .iter()
            .take(MAX_RUN)
            .position(|&b| b != value)
            .unwrap_or_else(|| (input.len() - i).min(MAX_RUN));
        i += run;
        Some((value, run))
    })
}

/// Reserve room for `len` more bytes, reporting failure instead of aborting.
pub(crate) fn reserve(buf: &mut Vec<u8>, len: usize) -> Result<()> {
    buf.try_reserve_exact(len)
        .map_err(|_| CodecError::Allocation(len as u64))
}

pub fn encode(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    reserve(&mut out, encoded_len(input))?;
    for (value, run) in pairs(input) {
        out.push(value);
        out.push(run as u8);
    }
    Ok(out)
}

/// Expand `(value, count)` pairs. A dangling odd byte at the end is ignored.
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    reserve(&mut out, decoded_len(input))?;
    for pair in input.chunks_exact(2) {
        out.resize(out.len() + pair[1] as usize, pair[0]);
    }
    Ok(out)
}

/// Size `encode` would produce for `input`.
pub fn encoded_len(input: &[u8]) -> usize {
    2 * pairs(input).count()
}

/// Size `decode` would produce for `input`, without expanding it.
pub fn decoded_len(input: &[u8]) -> usize {
    input.chunks_exact(2).map(|pair| pair[1] as usize).sum()
}
