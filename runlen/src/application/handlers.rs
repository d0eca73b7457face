use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use runlen_core::error::Result;
use runlen_core::{Framing, Job, JobOptions, Mode, Summary, Verdict, benchmark, compare_files, inspect};

use crate::presentation::cli::RunArgs;

fn framing(framed: bool) -> Framing {
    if framed { Framing::Framed } else { Framing::Raw }
}

fn job_options(run: &RunArgs) -> JobOptions {
    JobOptions {
        chunk_size: run.chunk_size,
        framing: framing(run.framed),
        workers: run.workers,
        progress: !run.no_progress,
    }
}

fn report(verb: &str, job: &Job, secs: f64, summary: &Summary) {
    let label = match summary.mode {
        Mode::Single => "Singlethreaded",
        Mode::Multi => "Multithreaded",
    };
    println!("[INFO] {verb} mode: {label}");
    println!("[INFO] Input file: {}", job.input().display());
    println!("[INFO] Output file: {}", job.output().display());
    println!(
        "[REPORT] {verb} time: {secs:.6} seconds ({} -> {} bytes, {} chunks of {}, ratio {:.3})",
        summary.input_bytes,
        summary.output_bytes,
        summary.chunks,
        job.options().chunk_size,
        summary.ratio()
    );
}

fn match_word(same: bool) -> &'static str {
    if same { "MATCH" } else { "DIFFER" }
}

pub fn handle_compress(input: PathBuf, output: PathBuf, run: RunArgs) -> Result<()> {
    let mode = Mode::from(run.mode);
    let job = Job::with_options(&input, &output, job_options(&run))?;
    let (secs, summary) = benchmark(|| job.compress(mode));
    report("Compression", &job, secs, &summary?);
    Ok(())
}

pub fn handle_decompress(
    input: PathBuf,
    output: PathBuf,
    run: RunArgs,
    reference: Option<PathBuf>,
) -> Result<()> {
    let mode = Mode::from(run.mode);
    let job = Job::with_options(&input, &output, job_options(&run))?;
    let (secs, summary) = benchmark(|| job.decompress(mode));
    report("Decompression", &job, secs, &summary?);

    if let Some(reference) = reference {
        if reference.exists() {
            let same = compare_files(&reference, job.output());
            println!("[REPORT] Decompressed file vs reference: {}", match_word(same));
        } else {
            warn!(path = %reference.display(), "reference file for comparison not found");
        }
    }
    Ok(())
}

/// Print the verdict and hand it back so the caller can pick the exit status.
pub fn handle_compare(left: PathBuf, right: PathBuf) -> Result<Verdict> {
    let verdict = inspect(&left, &right)?;
    match verdict {
        Verdict::Identical => println!("{}", match_word(true)),
        Verdict::SizeMismatch { left: l, right: r } => {
            println!("{} (sizes {l} and {r})", match_word(false))
        }
        Verdict::ContentMismatch { offset } => {
            println!("{} (first difference at byte {offset})", match_word(false))
        }
    }
    Ok(verdict)
}

#[derive(Debug, Serialize)]
struct BenchRow {
    file: String,
    mode: Mode,
    framing: Framing,
    chunk_size: usize,
    input_bytes: u64,
    compressed_bytes: u64,
    compress_secs: f64,
    decompress_secs: f64,
    matches: bool,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn bench_one(
    input: &Path,
    out_dir: &Path,
    name: &str,
    mode: Mode,
    opts: &JobOptions,
) -> Result<BenchRow> {
    let suffix = match mode {
        Mode::Multi => "",
        Mode::Single => ".single",
    };
    let packed = out_dir.join(format!("{name}{suffix}.compressed"));
    let unpacked = out_dir
        .join("decompress")
        .join(format!("{name}{suffix}.decompressed.txt"));

    let (compress_secs, packed_summary) =
        benchmark(|| Job::with_options(input, &packed, opts.clone())?.compress(mode));
    let packed_summary = packed_summary?;
    let (decompress_secs, unpacked_summary) =
        benchmark(|| Job::with_options(&packed, &unpacked, opts.clone())?.decompress(mode));
    unpacked_summary?;

    Ok(BenchRow {
        file: name.to_string(),
        mode,
        framing: opts.framing,
        chunk_size: opts.chunk_size,
        input_bytes: packed_summary.input_bytes,
        compressed_bytes: packed_summary.output_bytes,
        compress_secs,
        decompress_secs,
        matches: compare_files(input, &unpacked),
    })
}

fn print_table(name: &str, multi: &BenchRow, single: &BenchRow) {
    let verdict = |ok: bool| if ok { "MATCH   " } else { "NO MATCH" };
    println!("\nTest Results (for {name}):");
    println!("┌────────────────┬───────────────┬───────────────┬────────────┐");
    println!("│ Mode           │ Compression   │ Decompression │ Comparison │");
    println!("├────────────────┼───────────────┼───────────────┼────────────┤");
    for (label, row) in [("Multi-thread", multi), ("Single-thread", single)] {
        println!(
            "│ {label:<14} │ {:>12.6}s │ {:>12.6}s │ {}   │",
            row.compress_secs,
            row.decompress_secs,
            verdict(row.matches)
        );
    }
    println!("└────────────────┴───────────────┴───────────────┴────────────┘");

    println!("\nPerformance Comparison:");
    println!("├─ {}", faster("compression", multi.compress_secs, single.compress_secs));
    println!("└─ {}", faster("decompression", multi.decompress_secs, single.decompress_secs));
}

fn faster(what: &str, multi_secs: f64, single_secs: f64) -> String {
    if !(multi_secs > 0.0 && single_secs > 0.0) {
        return format!(
            "{what} finished too quickly to compare (multi {multi_secs:.6}s, single {single_secs:.6}s)"
        );
    }
    let ratio = multi_secs / single_secs;
    if ratio > 1.0 {
        format!("Single-thread {what} is {ratio:.2}x faster than multi-thread")
    } else {
        format!("Multi-thread {what} is {:.2}x faster than single-thread", 1.0 / ratio)
    }
}

pub fn handle_bench(
    inputs: Vec<PathBuf>,
    out_dir: PathBuf,
    chunk_size: usize,
    framed: bool,
    json: bool,
) -> Result<()> {
    fs::create_dir_all(out_dir.join("decompress"))?;
    let opts = JobOptions {
        chunk_size,
        framing: framing(framed),
        ..Default::default()
    };

    for input in &inputs {
        let name = file_name(input);
        info!(path = %input.display(), "starting round trips");
        let multi = bench_one(input, &out_dir, &name, Mode::Multi, &opts)?;
        let single = bench_one(input, &out_dir, &name, Mode::Single, &opts)?;

        if json {
            for row in [&multi, &single] {
                let line = serde_json::to_string(row).map_err(std::io::Error::other)?;
                println!("{line}");
            }
        } else {
            print_table(&name, &multi, &single);
        }
    }
    Ok(())
}

pub fn handle_generate(path: PathBuf, size: u64, seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut w = BufWriter::new(File::create(&path)?);
    let mut buf = vec![0u8; 64 * 1024];
    let mut left = size;
    while left > 0 {
        let n = left.min(buf.len() as u64) as usize;
        for b in &mut buf[..n] {
            *b = rng.random_range(32u8..=126);
        }
        w.write_all(&buf[..n])?;
        left -= n as u64;
    }
    w.flush()?;
    info!(path = %path.display(), bytes = size, seed, "generated file");
    Ok(())
}
