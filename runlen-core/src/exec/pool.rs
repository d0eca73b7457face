//! Dispatch of per-chunk work, either inline or on a bounded worker pool.
//!
//! Workers hand finished chunks back over a channel. The calling thread drains
//! it, slots each result by index and reports progress, so the aggregated
//! output never depends on which worker finished first.

use std::sync::mpsc;

use rayon::ThreadPoolBuilder;
use tracing::{debug, warn};

use super::chunker::{Chunk, ChunkResult};
use crate::error::{CodecError, Result};
use crate::progress::Progress;

/// Transform every chunk on the calling thread, in order, stopping at the
/// first failure.
pub fn run_serial<F>(chunks: Vec<Chunk>, transform: F) -> Result<Vec<ChunkResult>>
where
    F: Fn(&[u8]) -> Result<Vec<u8>>,
{
    chunks
        .into_iter()
        .map(|c| {
            Ok(ChunkResult {
                index: c.index,
                data: transform(&c.data)?,
                done: true,
            })
        })
        .collect()
}

/// Transform chunks on a pool of `workers` threads and return the results
/// sorted by chunk index. `chunks` must carry indices `0..chunks.len()`.
/// Every task runs to completion; the first failure seen is returned.
pub fn run_parallel<F>(
    chunks: Vec<Chunk>,
    workers: usize,
    transform: F,
    progress: &Progress,
) -> Result<Vec<ChunkResult>>
where
    F: Fn(&[u8]) -> Result<Vec<u8>> + Sync,
{
    let total = chunks.len();
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("runlen-worker-{i}"))
        .build()
        .map_err(|e| CodecError::Pool(e.to_string()))?;

    let mut slots: Vec<Option<ChunkResult>> = (0..total).map(|_| None).collect();
    let transform = &transform;
    let mut failure = None;
    let (tx, rx) = mpsc::channel::<(usize, Result<Vec<u8>>)>();

    pool.in_place_scope(|s| {
        for chunk in chunks {
            let tx = tx.clone();
            s.spawn(move |_| {
                // The receiver outlives the scope; a failed send cannot happen.
                let _ = tx.send((chunk.index, transform(&chunk.data)));
            });
        }
        drop(tx);

        let mut completed = 0u64;
        for (index, outcome) in rx {
            completed += 1;
            debug!(chunk = index, completed, total, "chunk finished");
            progress.update(completed);
            match outcome {
                Ok(data) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(ChunkResult {
                            index,
                            data,
                            done: true,
                        });
                    }
                }
                Err(e) => {
                    warn!(chunk = index, "chunk failed: {e}");
                    failure.get_or_insert(e);
                }
            }
        }
    });

    if let Some(e) = failure {
        return Err(e);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| slot.filter(|r| r.done).ok_or(CodecError::Worker(i)))
        .collect()
}
