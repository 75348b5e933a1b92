// In: src/bridge/format.rs

//! Public structures describing a packed integrated stream.

use serde::{Deserialize, Serialize};

/// Layout summary of an integrated stream, returned by `analyze`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackingStats {
    pub num_values: usize,
    /// One header word per (possibly partial) chunk.
    pub header_words: usize,
    pub payload_words: usize,
    /// `width_histogram[w]` counts sub-blocks packed at width `w`.
    pub width_histogram: Vec<usize>,
    /// Packed bits per input value, headers included.
    pub bits_per_value: f64,
}

impl PackingStats {
    pub fn total_words(&self) -> usize {
        self.header_words + self.payload_words
    }

    /// Sub-blocks that were constant runs and cost no payload at all.
    pub fn constant_blocks(&self) -> usize {
        self.width_histogram.first().copied().unwrap_or(0)
    }
}
