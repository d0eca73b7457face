use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use runlen_core::Mode;
use runlen_core::options::{DEFAULT_CHUNK_SIZE, validate_chunk_size};

#[derive(Parser)]
#[command(author, version, about = "Chunk-parallel run-length file codec", long_about = None)]
pub struct Cli {
    /// Only log warnings and errors (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Single,
    Multi,
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Single => Mode::Single,
            ModeArg::Multi => Mode::Multi,
        }
    }
}

fn parse_chunk_size(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{e}"))?;
    validate_chunk_size(n).map_err(|_| {
        format!("must be between 1024 bytes (1KB) and 1073741824 bytes (1GB), got {n}")
    })
}

/// Flags shared by `compress` and `decompress`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Bytes per chunk (1KB ..= 1GB)
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = parse_chunk_size)]
    pub chunk_size: usize,

    #[arg(long, value_enum, default_value_t = ModeArg::Multi)]
    pub mode: ModeArg,

    /// Write (or expect) a header and chunk table ahead of the pairs
    #[arg(long)]
    pub framed: bool,

    /// Upper bound on worker threads
    #[arg(long, env = "RUNLEN_WORKERS")]
    pub workers: Option<usize>,

    /// Do not draw the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress INPUT into OUTPUT
    Compress {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },

    /// Decompress INPUT into OUTPUT
    Decompress {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        run: RunArgs,

        /// Compare the decompressed output against this file afterwards
        #[arg(long)]
        reference: Option<PathBuf>,
    },

    /// Byte-compare two files
    Compare { left: PathBuf, right: PathBuf },

    /// Round-trip each input in both modes and report timings
    Bench {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Where compressed and decompressed copies are written
        #[arg(long, default_value = "output")]
        out_dir: PathBuf,

        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = parse_chunk_size)]
        chunk_size: usize,

        #[arg(long)]
        framed: bool,

        /// Print one JSON object per row instead of the table
        #[arg(long)]
        json: bool,
    },

    /// Write a file of seeded random printable ASCII
    Generate {
        path: PathBuf,

        /// Size in bytes
        #[arg(long)]
        size: u64,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}
