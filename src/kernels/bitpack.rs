//! This module contains the pure, stateless kernels for delta bit-packing and
//! unpacking of one sub-block.
//!
//! A sub-block is `T::BLOCK_LEN` elements (64 for `u64`, 32 for `u32`). Packing
//! computes the wrapping delta of every element against its predecessor (the
//! first one against a carried-in `init_value`) and lays each delta down as a
//! `w`-bit field in a virtual bit stream made of `w` consecutive words, least
//! significant bit of word 0 first. A field that crosses a word boundary is
//! split: its low part is OR-ed into the current word at the running offset and
//! its high part into the next word.
//!
//! Every width gets its own kernel, monomorphized from a const-generic body so
//! that the field offsets are compile-time constants and the lane loop fully
//! unrolls. Width 0 (constant run) and the full word width (raw deltas) are
//! handled by dedicated kernels.

use crate::error::DeltapackError;
use crate::traits::PackedWord;

//==================================================================================
// 1. Per-Width Kernels
//==================================================================================

#[inline(always)]
fn pack_width<T: PackedWord, const W: u32>(init_value: T, input: &[T], output: &mut [T]) {
    let bits = T::BITS as usize;
    let width = W as usize;
    let input = &input[..T::BLOCK_LEN];
    let output = &mut output[..width];
    output.fill(T::zero());

    let mut prev = init_value;
    for (lane, &value) in input.iter().enumerate() {
        let delta = value.wrapping_sub(&prev);
        prev = value;
        debug_assert!(delta >> width == T::zero(), "delta exceeds {} bits", W);

        let offset = lane * width;
        let word = offset / bits;
        let shift = offset % bits;
        output[word] = output[word] | (delta << shift);
        if shift + width > bits {
            output[word + 1] = output[word + 1] | (delta >> (bits - shift));
        }
    }
}

#[inline(always)]
fn unpack_width<T: PackedWord, const W: u32>(init_value: T, input: &[T], output: &mut [T]) {
    let bits = T::BITS as usize;
    let width = W as usize;
    let input = &input[..width];
    let output = &mut output[..T::BLOCK_LEN];
    let mask = T::max_value() >> (bits - width);

    let mut prev = init_value;
    for (lane, slot) in output.iter_mut().enumerate() {
        let offset = lane * width;
        let word = offset / bits;
        let shift = offset % bits;
        let mut field = input[word] >> shift;
        if shift + width > bits {
            field = field | (input[word + 1] << (bits - shift));
        }
        prev = prev.wrapping_add(&(field & mask));
        *slot = prev;
    }
}

/// Full-width sub-block: every delta occupies a whole word.
#[inline]
fn pack_full<T: PackedWord>(init_value: T, input: &[T], output: &mut [T]) {
    let mut prev = init_value;
    for (slot, &value) in output[..T::BLOCK_LEN].iter_mut().zip(&input[..T::BLOCK_LEN]) {
        *slot = value.wrapping_sub(&prev);
        prev = value;
    }
}

#[inline]
fn unpack_full<T: PackedWord>(init_value: T, input: &[T], output: &mut [T]) {
    let mut prev = init_value;
    for (slot, &delta) in output[..T::BLOCK_LEN].iter_mut().zip(&input[..T::BLOCK_LEN]) {
        prev = prev.wrapping_add(&delta);
        *slot = prev;
    }
}

/// Width-zero sub-block: a run of `init_value`.
#[inline]
fn unpack_zero<T: PackedWord>(init_value: T, output: &mut [T]) {
    output[..T::BLOCK_LEN].fill(init_value);
}

/// Signature shared by every per-width kernel.
type BlockKernel<T> = fn(T, &[T], &mut [T]);

/// Expands to a `match` that picks the monomorphized kernel for a runtime width.
macro_rules! dispatch_width {
    ($T:ty, $width:expr, $kernel:ident, [$($w:literal)*]) => {
        match $width {
            $( $w => $kernel::<$T, $w> as BlockKernel<$T>, )*
            other => return Err(unsupported_width::<$T>(other)),
        }
    };
}

macro_rules! dispatch_partial_widths {
    ($T:ty, $width:expr, $kernel:ident) => {
        dispatch_width!($T, $width, $kernel, [
             1  2  3  4  5  6  7  8  9 10 11 12 13 14 15 16
            17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32
            33 34 35 36 37 38 39 40 41 42 43 44 45 46 47 48
            49 50 51 52 53 54 55 56 57 58 59 60 61 62 63
        ])
    };
}

fn unsupported_width<T: PackedWord>(width: u32) -> DeltapackError {
    DeltapackError::UnsupportedBitWidth {
        width,
        max: T::BITS,
    }
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Packs the first `T::BLOCK_LEN` elements of `input` as deltas into the first
/// `bit_width` words of `output`.
///
/// `bit_width` must be at least the width returned by
/// [`max_diff_bits`](crate::kernels::width::max_diff_bits) for the same block,
/// otherwise neighbouring fields are corrupted. Words of `output` past
/// `bit_width` are left untouched.
pub fn pack<T: PackedWord>(
    init_value: T,
    input: &[T],
    output: &mut [T],
    bit_width: u32,
) -> Result<(), DeltapackError> {
    if bit_width > T::BITS {
        return Err(unsupported_width::<T>(bit_width));
    }
    check_len(input.len(), T::BLOCK_LEN)?;
    check_len(output.len(), bit_width as usize)?;

    match bit_width {
        0 => {}
        w if w == T::BITS => pack_full(init_value, input, output),
        w => {
            let kernel = dispatch_partial_widths!(T, w, pack_width);
            kernel(init_value, input, output)
        }
    }
    Ok(())
}

/// Inverse of [`pack`]: reads `bit_width` words from `input` and writes the
/// `T::BLOCK_LEN` reconstructed elements to the front of `output`.
pub fn unpack<T: PackedWord>(
    init_value: T,
    input: &[T],
    output: &mut [T],
    bit_width: u32,
) -> Result<(), DeltapackError> {
    if bit_width > T::BITS {
        return Err(unsupported_width::<T>(bit_width));
    }
    check_len(input.len(), bit_width as usize)?;
    check_len(output.len(), T::BLOCK_LEN)?;

    match bit_width {
        0 => unpack_zero(init_value, output),
        w if w == T::BITS => unpack_full(init_value, input, output),
        w => {
            let kernel = dispatch_partial_widths!(T, w, unpack_width);
            kernel(init_value, input, output)
        }
    }
    Ok(())
}

#[inline]
fn check_len(actual: usize, needed: usize) -> Result<(), DeltapackError> {
    if actual < needed {
        return Err(DeltapackError::BufferTooSmall { needed, actual });
    }
    Ok(())
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
