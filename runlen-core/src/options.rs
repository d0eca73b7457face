use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;
/// Bounds accepted at the command line. The engine itself only rejects 0.
pub const MIN_CHUNK_SIZE: usize = 1024;
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024 * 1024;

/// Where the transform runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Whole file, caller's thread.
    Single,
    /// One task per chunk on a bounded worker pool.
    Multi,
}

impl Mode {
    pub fn from_multithreaded(multithreaded: bool) -> Self {
        if multithreaded { Mode::Multi } else { Mode::Single }
    }
}

/// Layout of the compressed stream.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framing {
    /// Bare `(value, count)` pairs. Chunked decoding re-splits the compressed
    /// bytes by `chunk_size`, which only lines up with pair boundaries when
    /// `chunk_size` is even.
    #[default]
    Raw,
    /// Header plus a per-chunk length table ahead of the pairs.
    Framed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobOptions {
    pub chunk_size: usize,
    pub framing: Framing,
    /// Upper bound on pool threads; `None` uses the available parallelism.
    pub workers: Option<usize>,
    /// Draw a live progress bar on stderr in multithreaded mode.
    pub progress: bool,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            framing: Framing::Raw,
            workers: None,
            progress: false,
        }
    }
}

impl JobOptions {
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Default::default()
        }
    }

    /// Pool size for a job with `chunks` units of work.
    pub fn worker_count(&self, chunks: usize) -> usize {
        let wanted = self.workers.filter(|&n| n > 0).unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        wanted.min(chunks).max(1)
    }
}

/// Check a user-supplied chunk size against the CLI bounds.
pub fn validate_chunk_size(chunk_size: usize) -> Result<usize> {
    if (MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&chunk_size) {
        Ok(chunk_size)
    } else {
        Err(CodecError::InvalidChunkSize(chunk_size))
    }
}
