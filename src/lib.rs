//! This file is the root of the `deltapack` Rust crate.
//!
//! `deltapack` compresses sequences of unsigned integers by delta encoding them
//! and packing every 64-element sub-block (32 for `u32`) at the smallest bit
//! width that holds its deltas ("integrated binary packing"). A simpler
//! per-element varint delta codec is provided as a fallback for any length.
//!
//! All codecs are pure functions over caller-owned buffers. The formats carry no
//! length, magic or checksum: the caller supplies the element count and the
//! initial reference value out of band.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod buffer;
pub mod config;
pub mod error;
pub mod kernels;
pub mod observability;
pub mod traits;
pub mod types;
pub mod utils;

//==================================================================================
// 2. Re-exports
//==================================================================================
pub use buffer::{ByteBuffer, ByteReader, ByteWriter};
pub use config::{CodecConfig, PackingStrategy};
pub use error::DeltapackError;
pub use kernels::bitpack::{pack, unpack};
pub use kernels::integrated::{compress_integrated, decompress_integrated, max_compressed_len};
pub use kernels::leb128::{compress_variable, decompress_variable, read_var, write_var};
pub use kernels::width::max_diff_bits;
pub use traits::PackedWord;
pub use types::ElementType;
