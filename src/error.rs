//! This module defines the single, unified error type for the entire deltapack library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeltapackError {
    // =========================================================================
    // === Format Contract Violations
    // =========================================================================
    /// A sub-block width outside `[0, max]` was requested or read from a header.
    #[error("Unsupported bit width {width} (valid range is 0..={max})")]
    UnsupportedBitWidth { width: u32, max: u32 },

    /// The element count left after the last full chunk is not a whole number
    /// of sub-blocks.
    #[error("Unsupported tail length {remainder}: must be a multiple of {block_len} below one chunk")]
    UnsupportedTailLength { remainder: usize, block_len: usize },

    #[error("Buffer too small: needed {needed} words/elements, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    // =========================================================================
    // === Kernel Errors
    // =========================================================================
    #[error("Varint decoding error: {0}")]
    VarintDecodeError(String),

    #[error("Did not consume entire input buffer: {0} trailing bytes")]
    TrailingBytes(usize),

    #[error("Buffer length mismatch: expected a multiple of {0}, got {1}")]
    BufferMismatch(usize, usize),

    #[error("Unsupported element type for this operation: {0}")]
    UnsupportedType(String),

    #[error("Invalid codec configuration: {0}")]
    ConfigError(String),

    // =========================================================================
    // === External Error Wrappers
    // =========================================================================
    /// An error from the Serde JSON library, typically while loading a config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
