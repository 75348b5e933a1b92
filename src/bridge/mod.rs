// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the typed, stateless entry point a higher-level serializer
// calls. It owns no state; every call is a pure function of its arguments.
//
// Data Flow (Compression):
//
//   1. [Stateless API (compress)]   -> Receives `&[T]` and a `CodecConfig`
//         |
//         `-> calls `kernels::encode_values` -> integrated / varint kernels
//
//   2. Returns `Vec<u8>` (packed words in native byte order, then varints)
//
// Data Flow (Decompression):
//
//   1. [Stateless API (decompress)] -> Receives `&[u8]`, the element count and
//                                      the same `CodecConfig`
//         |
//         `-> calls `kernels::decode_values`
//
//   2. Returns `Vec<T>`
//
// `analyze` reads only the width headers of an integrated stream.
//
// ====================================================================================
pub(crate) mod format;
pub mod stateless_api;

pub use format::PackingStats;
pub use stateless_api::{analyze, compress, decompress};
