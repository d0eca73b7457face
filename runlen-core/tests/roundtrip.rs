use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use runlen_core::codec::{ChunkCodec, rle};
use runlen_core::error::Access;
use runlen_core::exec::run_with_codec;
use runlen_core::{CodecError, Direction, Framing, Job, JobOptions, Mode, Verdict, compare_files, inspect};

struct Scratch {
    dir: tempfile::TempDir,
}

impl Scratch {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn file(&self, name: &str, data: &[u8]) -> PathBuf {
        let p = self.path(name);
        fs::write(&p, data).unwrap();
        p
    }
}

fn opts(chunk_size: usize, framing: Framing) -> JobOptions {
    JobOptions {
        chunk_size,
        framing,
        workers: Some(4),
        progress: false,
    }
}

fn round_trip(s: &Scratch, src: &Path, o: &JobOptions, mode: Mode) -> Vec<u8> {
    let packed = s.path("packed");
    let back = s.path("back");
    Job::with_options(src, &packed, o.clone())
        .unwrap()
        .compress(mode)
        .unwrap();
    Job::with_options(&packed, &back, o.clone())
        .unwrap()
        .decompress(mode)
        .unwrap();
    fs::read(back).unwrap()
}

fn random_bytes(len: usize, symbols: u8, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(0..symbols)).collect()
}

#[test]
fn end_to_end_scenario() {
    let s = Scratch::new();
    let src = s.file("in.txt", b"AAAABBBCC");
    let packed = s.path("in.rle");
    let back = s.path("out.txt");

    let job = Job::new(&src, &packed, 1024).unwrap();
    let summary = job.compress(Mode::Single).unwrap();
    assert_eq!(fs::read(&packed).unwrap(), [0x41, 0x04, 0x42, 0x03, 0x43, 0x02]);
    assert_eq!(summary.input_bytes, 9);
    assert_eq!(summary.output_bytes, 6);
    assert_eq!(summary.chunks, 1);

    Job::new(&packed, &back, 1024)
        .unwrap()
        .decompress(Mode::Single)
        .unwrap();
    assert_eq!(fs::read(&back).unwrap(), b"AAAABBBCC");
    assert!(compare_files(&src, &back));
}

#[test]
fn round_trips_in_every_mode() {
    let s = Scratch::new();
    let inputs = [
        ("uniform", vec![b'Z'; 70_000]),
        ("runs", random_bytes(50_000, 3, 1)),
        ("random", random_bytes(50_000, 255, 2)),
        ("tiny", b"A".to_vec()),
    ];
    for (name, data) in inputs {
        let src = s.file(name, &data);
        for mode in [Mode::Single, Mode::Multi] {
            for framing in [Framing::Raw, Framing::Framed] {
                let got = round_trip(&s, &src, &opts(1024, framing), mode);
                assert_eq!(got, data, "{name} {mode:?} {framing:?}");
            }
        }
    }
}

#[test]
fn multithreaded_compression_is_deterministic() {
    let s = Scratch::new();
    let src = s.file("in", &random_bytes(200_000, 4, 7));
    let a = s.path("a");
    let b = s.path("b");
    let o = JobOptions {
        workers: Some(8),
        ..opts(1024, Framing::Raw)
    };
    Job::with_options(&src, &a, o.clone()).unwrap().compress(Mode::Multi).unwrap();
    Job::with_options(&src, &b, o).unwrap().compress(Mode::Multi).unwrap();
    assert_eq!(inspect(&a, &b).unwrap(), Verdict::Identical);
}

#[test]
fn parity_when_no_run_crosses_a_boundary() {
    let s = Scratch::new();
    // Neighbouring bytes always differ, including across chunk edges.
    let data: Vec<u8> = (0..4096u32).map(|i| (i % 256) as u8).collect();
    let src = s.file("in", &data);
    let single = s.path("single");
    let multi = s.path("multi");
    let o = opts(1024, Framing::Raw);
    Job::with_options(&src, &single, o.clone()).unwrap().compress(Mode::Single).unwrap();
    let summary = Job::with_options(&src, &multi, o).unwrap().compress(Mode::Multi).unwrap();
    assert_eq!(summary.chunks, 4);
    assert!(compare_files(&single, &multi));
}

#[test]
fn straddling_run_makes_raw_modes_diverge() {
    let s = Scratch::new();
    let src = s.file("in", b"AAAAAAAB");
    let single = s.path("single");
    let multi = s.path("multi");
    let o = opts(4, Framing::Raw);
    Job::with_options(&src, &single, o.clone()).unwrap().compress(Mode::Single).unwrap();
    Job::with_options(&src, &multi, o.clone()).unwrap().compress(Mode::Multi).unwrap();

    assert_eq!(fs::read(&single).unwrap(), b"A\x07B\x01");
    assert_eq!(fs::read(&multi).unwrap(), b"A\x04A\x03B\x01");
    assert!(!compare_files(&single, &multi));

    // Both streams still decode to the original.
    for packed in [&single, &multi] {
        let back = s.path("back");
        Job::with_options(packed, &back, o.clone())
            .unwrap()
            .decompress(Mode::Single)
            .unwrap();
        assert_eq!(fs::read(&back).unwrap(), b"AAAAAAAB");
    }
}

#[test]
fn raw_chunked_decode_with_odd_chunk_size_corrupts_silently() {
    let s = Scratch::new();
    let src = s.file("in", b"AAAABBBCC");
    let packed = s.path("packed");
    let back = s.path("back");
    Job::new(&src, &packed, 1024).unwrap().compress(Mode::Single).unwrap();

    // Chunks of 3 compressed bytes cut every other pair in half.
    let summary = Job::with_options(&packed, &back, opts(3, Framing::Raw))
        .unwrap()
        .decompress(Mode::Multi)
        .unwrap();
    assert_eq!(summary.chunks, 2);
    assert_ne!(fs::read(&back).unwrap(), b"AAAABBBCC");
    assert!(!compare_files(&src, &back));
}

#[test]
fn framed_streams_survive_any_chunking() {
    let s = Scratch::new();
    let data = random_bytes(30_011, 2, 9);
    let src = s.file("in", &data);
    for chunk_size in [1, 3, 255, 256, 1000, 40_000] {
        for mode in [Mode::Single, Mode::Multi] {
            let got = round_trip(&s, &src, &opts(chunk_size, Framing::Framed), mode);
            assert_eq!(got, data, "chunk_size={chunk_size} {mode:?}");
        }
    }
}

#[test]
fn framed_output_does_not_depend_on_mode() {
    let s = Scratch::new();
    let src = s.file("in", b"AAAAAAAB");
    let single = s.path("single");
    let multi = s.path("multi");
    let o = opts(4, Framing::Framed);
    Job::with_options(&src, &single, o.clone()).unwrap().compress(Mode::Single).unwrap();
    Job::with_options(&src, &multi, o.clone()).unwrap().compress(Mode::Multi).unwrap();
    assert!(compare_files(&single, &multi));

    // Decoding ignores the caller's chunk size in favour of the table.
    let back = s.path("back");
    Job::with_options(&multi, &back, opts(7, Framing::Framed))
        .unwrap()
        .decompress(Mode::Multi)
        .unwrap();
    assert_eq!(fs::read(&back).unwrap(), b"AAAAAAAB");
}

#[test]
fn raw_stream_is_not_a_frame() {
    let s = Scratch::new();
    let src = s.file("in", &vec![b'Q'; 5000]);
    let packed = s.path("packed");
    let back = s.path("back");
    Job::new(&src, &packed, 1024).unwrap().compress(Mode::Multi).unwrap();
    let err = Job::with_options(&packed, &back, opts(1024, Framing::Framed))
        .unwrap()
        .decompress(Mode::Single)
        .unwrap_err();
    assert!(matches!(err, CodecError::Format(_)));
    assert!(!back.exists());
}

#[test]
fn corrupted_frame_is_detected() {
    let s = Scratch::new();
    let src = s.file("in", b"AAAABBBCC");
    let packed = s.path("packed");
    let back = s.path("back");
    Job::with_options(&src, &packed, opts(4, Framing::Framed))
        .unwrap()
        .compress(Mode::Single)
        .unwrap();

    // Bump the count byte of the last pair; lengths still line up, the
    // decoded size no longer does.
    let mut bytes = fs::read(&packed).unwrap();
    let last = bytes.len() - 1;
    bytes[last] += 1;
    fs::write(&packed, &bytes).unwrap();

    let err = Job::with_options(&packed, &back, opts(4, Framing::Framed))
        .unwrap()
        .decompress(Mode::Multi)
        .unwrap_err();
    assert!(matches!(err, CodecError::Format(_)));
    assert!(!back.exists());
}

#[test]
fn empty_input_is_refused_and_writes_nothing() {
    let s = Scratch::new();
    let src = s.file("empty", b"");
    for mode in [Mode::Single, Mode::Multi] {
        let out = s.path("out");
        let err = Job::new(&src, &out, 1024).unwrap().compress(mode).unwrap_err();
        assert!(matches!(err, CodecError::EmptyInput(ref p) if p == &src));
        assert!(!out.exists());
    }
}

#[test]
fn empty_raw_stream_decompresses_to_empty_file() {
    let s = Scratch::new();
    let src = s.file("empty", b"");
    for mode in [Mode::Single, Mode::Multi] {
        let out = s.path("out");
        let summary = Job::new(&src, &out, 1024).unwrap().decompress(mode).unwrap();
        assert_eq!(summary.output_bytes, 0);
        assert_eq!(fs::read(&out).unwrap(), b"");
    }
}

#[test]
fn missing_input_is_unavailable() {
    let s = Scratch::new();
    let out = s.path("out");
    let err = Job::new(s.path("missing"), &out, 1024)
        .unwrap()
        .compress(Mode::Multi)
        .unwrap_err();
    assert!(matches!(
        err,
        CodecError::Unavailable {
            access: Access::Read,
            ..
        }
    ));
    assert!(!out.exists());
}

#[test]
fn unwritable_output_leaves_no_file() {
    let s = Scratch::new();
    let src = s.file("in", b"AAAABBBCC");
    let out = s.path("no-such-dir").join("out");
    let err = Job::new(&src, &out, 1024).unwrap().compress(Mode::Multi).unwrap_err();
    assert!(matches!(
        err,
        CodecError::Unavailable {
            access: Access::Write,
            ..
        }
    ));
    assert!(!out.exists());
}

#[test]
fn existing_output_is_replaced_whole() {
    let s = Scratch::new();
    let src = s.file("in", b"AAAABBBCC");
    let out = s.file("out", &vec![0xFF; 10_000]);
    Job::new(&src, &out, 1024).unwrap().compress(Mode::Single).unwrap();
    assert_eq!(fs::read(&out).unwrap(), [0x41, 0x04, 0x42, 0x03, 0x43, 0x02]);
}

/// Behaves like RLE, except that expanding more than `limit` bytes cannot be
/// reserved.
struct Capped {
    limit: usize,
}

impl ChunkCodec for Capped {
    fn name(&self) -> &'static str {
        "capped"
    }

    fn encode(&self, src: &[u8]) -> runlen_core::Result<Vec<u8>> {
        rle::encode(src)
    }

    fn decode(&self, src: &[u8]) -> runlen_core::Result<Vec<u8>> {
        let want = rle::decoded_len(src);
        if want > self.limit {
            return Err(CodecError::Allocation(want as u64));
        }
        rle::decode(src)
    }
}

#[test]
fn oversized_expansion_is_an_error_not_an_abort() {
    let s = Scratch::new();
    // Every pair expands 255-fold.
    let packed = s.file("packed", &b"A\xff".repeat(4096));
    let codec = Capped { limit: 64 * 1024 };
    for mode in [Mode::Single, Mode::Multi] {
        let out = s.path("out");
        let err = run_with_codec(
            &codec,
            Direction::Decompress,
            &packed,
            &out,
            mode,
            &opts(1024, Framing::Raw),
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::Allocation(_)), "{mode:?}: {err}");
        assert!(!out.exists());
    }

    // A codec that can afford it decodes the same stream.
    let out = s.path("out");
    Job::new(&packed, &out, 1024).unwrap().decompress(Mode::Multi).unwrap();
    assert_eq!(fs::metadata(&out).unwrap().len(), 4096 * 255);
}
