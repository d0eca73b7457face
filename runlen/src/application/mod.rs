pub mod handlers;

use std::process::ExitCode;

use crate::presentation::cli::{Cli, Commands};
use runlen_core::Result;

/// Run one command. `compare` exits with failure when the files differ.
pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Compress { input, output, run } => handlers::handle_compress(input, output, run)?,
        Commands::Decompress {
            input,
            output,
            run,
            reference,
        } => handlers::handle_decompress(input, output, run, reference)?,
        Commands::Compare { left, right } => {
            if !handlers::handle_compare(left, right)?.is_identical() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Bench {
            inputs,
            out_dir,
            chunk_size,
            framed,
            json,
        } => handlers::handle_bench(inputs, out_dir, chunk_size, framed, json)?,
        Commands::Generate { path, size, seed } => handlers::handle_generate(path, size, seed)?,
    }
    Ok(ExitCode::SUCCESS)
}
