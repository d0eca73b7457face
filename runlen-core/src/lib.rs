#![forbid(unsafe_code)]

pub mod codec;
pub mod container;
pub mod error;
pub mod exec;
pub mod job;
pub mod options;
pub mod progress;
pub mod stats;
pub mod verify;

// Re-exports: stable API surface
pub use codec::Direction;
pub use error::{CodecError, Result};
pub use job::{Job, benchmark, compress, decompress};
pub use options::{Framing, JobOptions, Mode};
pub use stats::Summary;
pub use verify::{Verdict, compare_files, inspect};
