use std::io::{Read, Write};

pub const MAGIC: &[u8; 4] = b"RLEF";
pub const VERSION: u16 = 1;
pub const HEADER_LEN: u64 = 24;

/// Fixed-size prefix of a framed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    /// Chunk size the stream was produced with (informational).
    pub chunk_size: u64,
    /// Number of entries in the chunk table that follows.
    pub chunk_count: u64,
}

impl Header {
    pub fn new(chunk_size: u64, chunk_count: u64) -> Self {
        Self {
            version: VERSION,
            chunk_size,
            chunk_count,
        }
    }

    pub fn write_to(&self, mut w: impl Write) -> std::io::Result<()> {
        w.write_all(MAGIC)?;
        w.write_all(&self.version.to_le_bytes())?;
        w.write_all(&0u16.to_le_bytes())?; // reserved
        w.write_all(&self.chunk_size.to_le_bytes())?;
        w.write_all(&self.chunk_count.to_le_bytes())?;
        Ok(())
    }

    pub fn read_from(mut r: impl Read) -> std::io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "bad frame magic",
            ));
        }
        let mut v = [0u8; 2];
        r.read_exact(&mut v)?;
        let version = u16::from_le_bytes(v);
        if version != VERSION {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unsupported frame version {version}"),
            ));
        }
        r.read_exact(&mut v)?; // reserved
        let mut cs = [0u8; 8];
        r.read_exact(&mut cs)?;
        let chunk_size = u64::from_le_bytes(cs);
        let mut cc = [0u8; 8];
        r.read_exact(&mut cc)?;
        let chunk_count = u64::from_le_bytes(cc);
        Ok(Self {
            version,
            chunk_size,
            chunk_count,
        })
    }
}
