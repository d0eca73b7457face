use crate::error::{CodecError, Result};
use std::io::{self, Write};

pub const ENTRY_SIZE: usize = 16;

/// Sizes of one chunk before and after encoding. Chunks are stored back to
/// back, so offsets follow from the running sum of `c_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkEntry {
    pub u_size: u64,
    pub c_size: u64,
}

pub fn write_table(mut w: impl Write, entries: &[ChunkEntry]) -> Result<()> {
    let mut buf = [0u8; ENTRY_SIZE];
    for e in entries {
        buf[0..8].copy_from_slice(&e.u_size.to_le_bytes());
        buf[8..16].copy_from_slice(&e.c_size.to_le_bytes());
        w.write_all(&buf)?;
    }
    Ok(())
}

#[inline]
fn le64(x: &[u8]) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&x[..8]);
    u64::from_le_bytes(b)
}

/// Byte length of a table with `count` entries, or `None` on overflow.
pub fn table_len(count: u64) -> Option<u64> {
    count.checked_mul(ENTRY_SIZE as u64)
}

pub fn read_table(r: &mut &[u8], count: u64) -> Result<Vec<ChunkEntry>> {
    let need = table_len(count)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| CodecError::Format("chunk table size overflow".into()))?;

    if r.len() < need {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "chunk table truncated: have {} bytes, need {} ({} entries)",
                r.len(),
                need,
                count
            ),
        )
        .into());
    }

    let out = r[..need]
        .chunks_exact(ENTRY_SIZE)
        .map(|e| ChunkEntry {
            u_size: le64(&e[0..8]),
            c_size: le64(&e[8..16]),
        })
        .collect();

    *r = &r[need..]; // advance
    Ok(out)
}

/// Total compressed payload described by `entries`.
pub fn payload_len(entries: &[ChunkEntry]) -> Option<u64> {
    entries
        .iter()
        .try_fold(0u64, |acc, e| acc.checked_add(e.c_size))
}
