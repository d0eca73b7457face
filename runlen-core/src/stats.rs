use serde::{Deserialize, Serialize};

use crate::codec::Direction;
use crate::options::{Framing, Mode};

/// What one compress or decompress call did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub direction: Direction,
    pub mode: Mode,
    pub framing: Framing,
    pub chunks: u64,
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl Summary {
    /// Output size relative to input size; 0 for an empty input.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }
}
