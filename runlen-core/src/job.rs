use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::error;

use crate::error::{CodecError, Result};
use crate::exec;
use crate::options::{JobOptions, Mode};
use crate::stats::Summary;

/// One compress or decompress invocation: where to read, where to write and
/// how to split the work.
#[derive(Clone, Debug)]
pub struct Job {
    input: PathBuf,
    output: PathBuf,
    opts: JobOptions,
}

impl Job {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, chunk_size: usize) -> Result<Self> {
        Self::with_options(input, output, JobOptions::with_chunk_size(chunk_size))
    }

    pub fn with_options(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        opts: JobOptions,
    ) -> Result<Self> {
        if opts.chunk_size == 0 {
            return Err(CodecError::InvalidChunkSize(0));
        }
        Ok(Self {
            input: input.into(),
            output: output.into(),
            opts,
        })
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn options(&self) -> &JobOptions {
        &self.opts
    }

    pub fn compress(&self, mode: Mode) -> Result<Summary> {
        exec::compress(&self.input, &self.output, mode, &self.opts)
    }

    pub fn decompress(&self, mode: Mode) -> Result<Summary> {
        exec::decompress(&self.input, &self.output, mode, &self.opts)
    }
}

/// Run `op` and return its wall-clock duration in seconds with its result.
pub fn benchmark<T>(op: impl FnOnce() -> T) -> (f64, T) {
    let start = Instant::now();
    let out = op();
    (start.elapsed().as_secs_f64(), out)
}

fn timed(op: impl FnOnce() -> Result<Summary>) -> (f64, bool) {
    let (secs, res) = benchmark(op);
    if let Err(e) = &res {
        error!("{e}");
    }
    (secs, res.is_ok())
}

/// Compress `input` into `output`, returning elapsed seconds and whether it
/// succeeded. Failures are logged.
pub fn compress(input: &Path, output: &Path, chunk_size: usize, multithreaded: bool) -> (f64, bool) {
    timed(|| Job::new(input, output, chunk_size)?.compress(Mode::from_multithreaded(multithreaded)))
}

/// Decompress counterpart of [`compress`].
pub fn decompress(input: &Path, output: &Path, chunk_size: usize, multithreaded: bool) -> (f64, bool) {
    timed(|| Job::new(input, output, chunk_size)?.decompress(Mode::from_multithreaded(multithreaded)))
}
