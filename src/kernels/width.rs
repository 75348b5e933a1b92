//! Bit-width selection for one sub-block.
//!
//! The width of a sub-block is the position of the highest bit set in any of
//! its deltas, so OR-ing all deltas together and counting leading zeros gives
//! the exact minimum.

use crate::error::DeltapackError;
use crate::traits::PackedWord;

/// Returns the smallest `w` such that every delta of `values` (the first one
/// taken against `init_value`) fits in an unsigned `w`-bit field.
///
/// Only the first `T::BLOCK_LEN` elements are considered; a shorter slice is
/// a `BufferTooSmall` error. Returns 0 for a constant run equal to
/// `init_value`.
#[inline]
pub fn max_diff_bits<T: PackedWord>(init_value: T, values: &[T]) -> Result<u32, DeltapackError> {
    let block = values
        .get(..T::BLOCK_LEN)
        .ok_or(DeltapackError::BufferTooSmall {
            needed: T::BLOCK_LEN,
            actual: values.len(),
        })?;
    let mut mask = block[0].wrapping_sub(&init_value);
    for pair in block.windows(2) {
        mask = mask | pair[1].wrapping_sub(&pair[0]);
    }
    Ok(T::BITS - mask.leading_zeros())
}
