use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Access, CodecError, Result};

/// Write `output` through a temporary file in the same directory and rename it
/// into place once `fill` has succeeded. On any error the destination is left
/// untouched and the temporary file is removed.
pub fn write_atomically<F>(output: &Path, fill: F) -> Result<u64>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| CodecError::unavailable(output, Access::Write, e))?;

    let written = {
        let mut w = CountingWriter::new(BufWriter::new(tmp.as_file_mut()));
        fill(&mut w)?;
        w.flush()?;
        w.n
    };
    tmp.as_file().sync_all()?;
    tmp.persist(output)
        .map_err(|e| CodecError::unavailable(output, Access::Write, e.error))?;
    Ok(written)
}

/// Small Write adapter that counts bytes written
struct CountingWriter<W: Write> {
    inner: W,
    n: u64,
}
impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, n: 0 }
    }
}
impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let k = self.inner.write(buf)?;
        self.n += k as u64;
        Ok(k)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
