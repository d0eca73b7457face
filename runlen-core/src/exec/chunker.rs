use std::io::Read;

use crate::error::{CodecError, Result};

/// A contiguous slice of the source, owned by whoever is transforming it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkResult {
    pub index: usize,
    pub data: Vec<u8>,
    pub done: bool,
}

/// `ceil(size / chunk_size)`.
pub fn chunk_count(size: u64, chunk_size: usize) -> Result<u64> {
    if chunk_size == 0 {
        return Err(CodecError::InvalidChunkSize(chunk_size));
    }
    Ok(size.div_ceil(chunk_size as u64))
}

/// Lengths of the chunks a `size`-byte source splits into. Every chunk is
/// `chunk_size` long except possibly the last.
pub fn chunk_lengths(size: u64, chunk_size: usize) -> Result<Vec<u64>> {
    let n = chunk_count(size, chunk_size)?;
    let c = chunk_size as u64;
    Ok((0..n).map(|i| c.min(size - i * c)).collect())
}

/// Read exactly `len` bytes into a fresh buffer, reporting an allocation
/// failure instead of aborting when the buffer cannot be reserved.
pub fn read_exact_vec(r: &mut impl Read, len: u64) -> Result<Vec<u8>> {
    let n = usize::try_from(len).map_err(|_| CodecError::Allocation(len))?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(n)
        .map_err(|_| CodecError::Allocation(len))?;
    r.by_ref().take(len).read_to_end(&mut buf)?;
    if buf.len() != n {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, source ended after {}", n, buf.len()),
        )
        .into());
    }
    Ok(buf)
}

/// Read consecutive chunks of the given lengths, in order, on the calling thread.
pub fn read_chunks(r: &mut impl Read, lengths: &[u64]) -> Result<Vec<Chunk>> {
    lengths
        .iter()
        .enumerate()
        .map(|(index, &len)| {
            Ok(Chunk {
                index,
                data: read_exact_vec(&mut *r, len)?,
            })
        })
        .collect()
}
