use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which way a file was being opened when it turned out to be unavailable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => f.write_str("reading"),
            Access::Write => f.write_str("writing"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("cannot open {} for {access}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        access: Access,
        #[source]
        source: std::io::Error,
    },

    #[error("nothing to compress: {} is empty", .0.display())]
    EmptyInput(PathBuf),

    #[error("cannot allocate a {0} byte buffer; try a smaller chunk size")]
    Allocation(u64),

    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(usize),

    #[error("worker pool error: {0}")]
    Pool(String),

    #[error("chunk {0} produced no result")]
    Worker(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),
}

impl CodecError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, access: Access, source: std::io::Error) -> Self {
        CodecError::Unavailable {
            path: path.into(),
            access,
            source,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, CodecError>;
