use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which half of a codec an operation runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Compress,
    Decompress,
}

/// A pure, buffer-to-buffer transform applied independently to every chunk.
pub trait ChunkCodec: Send + Sync {
    fn name(&self) -> &'static str;
    fn encode(&self, src: &[u8]) -> Result<Vec<u8>>;
    fn decode(&self, src: &[u8]) -> Result<Vec<u8>>;

    fn apply(&self, direction: Direction, src: &[u8]) -> Result<Vec<u8>> {
        match direction {
            Direction::Compress => self.encode(src),
            Direction::Decompress => self.decode(src),
        }
    }
}

pub mod rle;
