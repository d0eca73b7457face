//! Framed stream layout: a fixed header, one table entry per chunk, then the
//! encoded chunks back to back.

pub mod chunktab;
pub mod header;

use std::io::{Read, Write};

use crate::error::{CodecError, Result};
use chunktab::{ChunkEntry, payload_len, read_table, table_len, write_table};
use header::{HEADER_LEN, Header};

pub fn write_frame<B: AsRef<[u8]>>(
    mut w: impl Write,
    chunk_size: u64,
    entries: &[ChunkEntry],
    chunks: &[B],
) -> Result<()> {
    Header::new(chunk_size, entries.len() as u64).write_to(&mut w)?;
    write_table(&mut w, entries)?;
    for c in chunks {
        w.write_all(c.as_ref())?;
    }
    Ok(())
}

/// Read header and chunk table from the front of a framed stream of
/// `stream_len` bytes, leaving `r` positioned at the first chunk. Every encoded
/// chunk is whole pairs, and the payload that follows must be exactly as long
/// as the table says.
pub fn read_layout(mut r: impl Read, stream_len: u64) -> Result<(Header, Vec<ChunkEntry>)> {
    if stream_len < HEADER_LEN {
        return Err(CodecError::Format(format!(
            "stream too short for a frame header ({stream_len} bytes)"
        )));
    }
    let header = Header::read_from(&mut r).map_err(|e| CodecError::Format(e.to_string()))?;

    let after_header = stream_len - HEADER_LEN;
    let tab_len = table_len(header.chunk_count)
        .filter(|&n| n <= after_header)
        .ok_or_else(|| {
            CodecError::Format(format!(
                "chunk table for {} entries does not fit in {} bytes",
                header.chunk_count, after_header
            ))
        })?;

    let mut tab = vec![0u8; tab_len as usize];
    r.read_exact(&mut tab)?;
    let entries = read_table(&mut &tab[..], header.chunk_count)?;
    if let Some(i) = entries.iter().position(|e| e.c_size % 2 == 1) {
        return Err(CodecError::Format(format!(
            "chunk {i} has odd encoded size {}",
            entries[i].c_size
        )));
    }

    let want = payload_len(&entries)
        .ok_or_else(|| CodecError::Format("chunk table payload overflow".into()))?;
    let have = after_header - tab_len;
    if want != have {
        return Err(CodecError::Format(format!(
            "payload is {have} bytes, chunk table describes {want}"
        )));
    }
    Ok((header, entries))
}
