//! Shared helpers for moving between typed word slices and raw byte buffers.
//!
//! Words are serialized in native byte order.

use bytemuck::Pod;

use crate::error::DeltapackError;

/// Zero-copy view of a typed slice as bytes.
pub fn typed_slice_to_bytes<T: Pod>(slice: &[T]) -> &[u8] {
    bytemuck::cast_slice(slice)
}

/// Copies a byte buffer into typed values. The buffer need not be aligned but
/// its length must be a whole number of values.
pub fn bytes_to_typed_vec<T: Pod>(bytes: &[u8]) -> Result<Vec<T>, DeltapackError> {
    let size = std::mem::size_of::<T>();
    if bytes.len() % size != 0 {
        return Err(DeltapackError::BufferMismatch(size, bytes.len()));
    }
    Ok(leading_values(bytes))
}

/// Copies as many whole values as fit at the front of `bytes`, ignoring any
/// trailing partial value.
pub fn leading_values<T: Pod>(bytes: &[u8]) -> Vec<T> {
    bytes
        .chunks_exact(std::mem::size_of::<T>())
        .map(bytemuck::pod_read_unaligned::<T>)
        .collect()
}
