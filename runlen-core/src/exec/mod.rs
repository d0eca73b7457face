//! The chunk executor: split a file, run the codec over every piece and write
//! the pieces back out in their original order.

pub mod chunker;
pub mod pool;
pub mod sink;

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::codec::rle::Rle;
use crate::codec::{ChunkCodec, Direction};
use crate::container::chunktab::ChunkEntry;
use crate::container::{read_layout, write_frame};
use crate::error::{Access, CodecError, Result};
use crate::options::{Framing, JobOptions, Mode};
use crate::progress::Progress;
use crate::stats::Summary;
use chunker::{Chunk, ChunkResult, chunk_count, chunk_lengths, read_chunks};
use pool::{run_parallel, run_serial};

pub fn compress(input: &Path, output: &Path, mode: Mode, opts: &JobOptions) -> Result<Summary> {
    run_with_codec(&Rle, Direction::Compress, input, output, mode, opts)
}

pub fn decompress(input: &Path, output: &Path, mode: Mode, opts: &JobOptions) -> Result<Summary> {
    run_with_codec(&Rle, Direction::Decompress, input, output, mode, opts)
}

pub fn run_with_codec(
    codec: &dyn ChunkCodec,
    direction: Direction,
    input: &Path,
    output: &Path,
    mode: Mode,
    opts: &JobOptions,
) -> Result<Summary> {
    if opts.chunk_size == 0 {
        return Err(CodecError::InvalidChunkSize(0));
    }

    info!(path = %input.display(), ?direction, ?mode, framing = ?opts.framing, codec = codec.name(), "opening input");
    let f = File::open(input).map_err(|e| CodecError::unavailable(input, Access::Read, e))?;
    let size = f
        .metadata()
        .map_err(|e| CodecError::unavailable(input, Access::Read, e))?
        .len();
    info!(bytes = size, "input size");
    let mut reader = BufReader::new(f);

    let (chunks, output_bytes) = match direction {
        Direction::Compress => encode_file(codec, input, &mut reader, size, output, mode, opts)?,
        Direction::Decompress => decode_file(codec, &mut reader, size, output, mode, opts)?,
    };

    let summary = Summary {
        direction,
        mode,
        framing: opts.framing,
        chunks,
        input_bytes: size,
        output_bytes,
    };
    info!(
        bytes = summary.output_bytes,
        chunks = summary.chunks,
        path = %output.display(),
        "{direction:?} finished"
    );
    Ok(summary)
}

fn encode_file(
    codec: &dyn ChunkCodec,
    input: &Path,
    reader: &mut impl Read,
    size: u64,
    output: &Path,
    mode: Mode,
    opts: &JobOptions,
) -> Result<(u64, u64)> {
    let n = chunk_count(size, opts.chunk_size)?;
    info!(chunk_size = opts.chunk_size, chunks = n, "partitioned input");
    if n == 0 {
        error!(path = %input.display(), "chunk count is zero, nothing to compress");
        return Err(CodecError::EmptyInput(input.to_path_buf()));
    }

    // Raw single-threaded output is one run over the whole file; everything
    // else follows the chunk grid so chunk boundaries can be recorded.
    let lengths = match (opts.framing, mode) {
        (Framing::Raw, Mode::Single) => vec![size],
        _ => chunk_lengths(size, opts.chunk_size)?,
    };
    let chunks = read_chunks(reader, &lengths)?;
    let results = dispatch(chunks, mode, opts, |d: &[u8]| codec.encode(d))?;

    let written = match opts.framing {
        Framing::Raw => write_concat(output, &results)?,
        Framing::Framed => {
            let entries: Vec<ChunkEntry> = lengths
                .iter()
                .zip(&results)
                .map(|(&u_size, r)| ChunkEntry {
                    u_size,
                    c_size: r.data.len() as u64,
                })
                .collect();
            let bodies: Vec<&[u8]> = results.iter().map(|r| r.data.as_slice()).collect();
            sink::write_atomically(output, |w| {
                write_frame(w, opts.chunk_size as u64, &entries, &bodies)
            })?
        }
    };
    Ok((results.len() as u64, written))
}

fn decode_file(
    codec: &dyn ChunkCodec,
    reader: &mut impl Read,
    size: u64,
    output: &Path,
    mode: Mode,
    opts: &JobOptions,
) -> Result<(u64, u64)> {
    let (lengths, expected) = match (opts.framing, mode) {
        (Framing::Raw, Mode::Single) => (vec![size], None),
        (Framing::Raw, Mode::Multi) => {
            if opts.chunk_size % 2 == 1 && size > opts.chunk_size as u64 {
                warn!(
                    chunk_size = opts.chunk_size,
                    "odd chunk size splits (value, count) pairs; raw output will not match the original"
                );
            }
            (chunk_lengths(size, opts.chunk_size)?, None)
        }
        (Framing::Framed, _) => {
            let (header, entries) = read_layout(&mut *reader, size)?;
            if header.chunk_size != opts.chunk_size as u64 {
                debug!(
                    framed = header.chunk_size,
                    requested = opts.chunk_size,
                    "using chunk boundaries recorded in the frame"
                );
            }
            let c_sizes: Vec<u64> = entries.iter().map(|e| e.c_size).collect();
            let u_sizes: Vec<u64> = entries.iter().map(|e| e.u_size).collect();
            (c_sizes, Some(u_sizes))
        }
    };

    let chunks = read_chunks(reader, &lengths)?;
    let results = dispatch(chunks, mode, opts, |d: &[u8]| codec.decode(d))?;

    if let Some(u_sizes) = expected {
        for (r, &want) in results.iter().zip(&u_sizes) {
            if r.data.len() as u64 != want {
                return Err(CodecError::Format(format!(
                    "chunk {} decoded to {} bytes, table says {}",
                    r.index,
                    r.data.len(),
                    want
                )));
            }
        }
    }

    let written = write_concat(output, &results)?;
    Ok((results.len() as u64, written))
}

/// Run the transform over `chunks` as `mode` dictates. Progress is only
/// tracked on the pool path; the tracker is finalised on every exit.
fn dispatch<F>(chunks: Vec<Chunk>, mode: Mode, opts: &JobOptions, transform: F) -> Result<Vec<ChunkResult>>
where
    F: Fn(&[u8]) -> Result<Vec<u8>> + Sync,
{
    match mode {
        Mode::Single => run_serial(chunks, transform),
        Mode::Multi => {
            let total = chunks.len();
            let progress = if opts.progress {
                Progress::new(total as u64)
            } else {
                Progress::hidden(total as u64)
            };
            let workers = opts.worker_count(total);
            debug!(workers, chunks = total, "dispatching to worker pool");
            let results = run_parallel(chunks, workers, transform, &progress)?;
            progress.done();
            Ok(results)
        }
    }
}

fn write_concat(output: &Path, results: &[ChunkResult]) -> Result<u64> {
    sink::write_atomically(output, |w: &mut dyn Write| {
        for r in results {
            w.write_all(&r.data)?;
        }
        Ok(())
    })
}
