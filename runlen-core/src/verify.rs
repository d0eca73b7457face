//! Byte-exact comparison of two files, used to check round trips.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{error, info};

use crate::error::{Access, CodecError, Result};

const BUF_LEN: usize = 64 * 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Identical,
    /// Lengths differ; contents were not read.
    SizeMismatch { left: u64, right: u64 },
    /// First differing byte.
    ContentMismatch { offset: u64 },
}

impl Verdict {
    pub fn is_identical(&self) -> bool {
        matches!(self, Verdict::Identical)
    }
}

fn open(path: &Path) -> Result<(File, u64)> {
    let f = File::open(path).map_err(|e| CodecError::unavailable(path, Access::Read, e))?;
    let len = f
        .metadata()
        .map_err(|e| CodecError::unavailable(path, Access::Read, e))?
        .len();
    Ok((f, len))
}

/// Compare `left` and `right`, stopping at the size check when lengths differ.
pub fn inspect(left: &Path, right: &Path) -> Result<Verdict> {
    let (lf, llen) = open(left)?;
    let (rf, rlen) = open(right)?;
    if llen != rlen {
        return Ok(Verdict::SizeMismatch {
            left: llen,
            right: rlen,
        });
    }

    let mut lr = BufReader::with_capacity(BUF_LEN, lf);
    let mut rr = BufReader::with_capacity(BUF_LEN, rf);
    let mut lbuf = vec![0u8; BUF_LEN];
    let mut rbuf = vec![0u8; BUF_LEN];
    let mut offset = 0u64;
    loop {
        let n = fill(&mut lr, &mut lbuf)?;
        let m = fill(&mut rr, &mut rbuf)?;
        if let Some(i) = lbuf[..n.min(m)]
            .iter()
            .zip(&rbuf[..n.min(m)])
            .position(|(a, b)| a != b)
        {
            return Ok(Verdict::ContentMismatch {
                offset: offset + i as u64,
            });
        }
        if n != m {
            // One side changed length underneath us.
            return Ok(Verdict::ContentMismatch {
                offset: offset + n.min(m) as u64,
            });
        }
        if n == 0 {
            return Ok(Verdict::Identical);
        }
        offset += n as u64;
    }
}

/// Read until `buf` is full or the source is exhausted.
fn fill(r: &mut impl Read, buf: &mut [u8]) -> Result<usize> {
    let mut got = 0;
    while got < buf.len() {
        let k = r.read(&mut buf[got..])?;
        if k == 0 {
            break;
        }
        got += k;
    }
    Ok(got)
}

/// `true` only when both files can be read and are byte-for-byte identical.
/// Every other outcome is logged and reported as `false`.
pub fn compare_files(left: &Path, right: &Path) -> bool {
    match inspect(left, right) {
        Ok(Verdict::Identical) => {
            info!(left = %left.display(), right = %right.display(), "files match");
            true
        }
        Ok(Verdict::SizeMismatch { left: l, right: r }) => {
            error!("files have different sizes: {l} vs {r}");
            false
        }
        Ok(Verdict::ContentMismatch { offset }) => {
            error!("files differ at byte {offset}");
            false
        }
        Err(e) => {
            error!("cannot compare files: {e}");
            false
        }
    }
}
