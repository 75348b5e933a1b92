//! This module defines the word abstraction shared by every packing kernel.
//!
//! Integrated binary packing is defined in terms of one machine word: a
//! sub-block holds one element per bit of the word, so a sub-block of width `w`
//! packs into exactly `w` words, and one header word holds one width byte per
//! byte of the word. Both `u32` and `u64` streams fall out of the same kernels.

use num_traits::{PrimInt, Unsigned, WrappingAdd, WrappingSub};
use std::fmt::Debug;

/// An unsigned machine word that the packing kernels can operate on.
pub trait PackedWord:
    PrimInt + Unsigned + WrappingAdd + WrappingSub + bytemuck::Pod + Debug + Default + Send + Sync
{
    /// Width of the word in bits; also the largest legal sub-block width.
    const BITS: u32;

    /// Elements per sub-block.
    const BLOCK_LEN: usize = Self::BITS as usize;

    /// Width bytes per header word, i.e. sub-blocks per full chunk.
    const BLOCKS_PER_CHUNK: usize = (Self::BITS / 8) as usize;

    /// Elements per full chunk.
    const CHUNK_LEN: usize = Self::BLOCK_LEN * Self::BLOCKS_PER_CHUNK;

    /// Seven-bit groups written before the terminal varint byte.
    const VARINT_GROUPS: u32 = (Self::BITS - 8 + 6) / 7;

    /// Longest varint encoding of one word.
    const MAX_VARINT_LEN: usize = Self::VARINT_GROUPS as usize + 1;

    /// Truncates to the low eight bits.
    fn low_byte(self) -> u8;

    fn from_byte(byte: u8) -> Self;

    fn from_width(width: u32) -> Self;
}

macro_rules! impl_packed_word {
    ($T:ty) => {
        impl PackedWord for $T {
            const BITS: u32 = <$T>::BITS;

            #[inline(always)]
            fn low_byte(self) -> u8 {
                self as u8
            }

            #[inline(always)]
            fn from_byte(byte: u8) -> Self {
                byte as $T
            }

            #[inline(always)]
            fn from_width(width: u32) -> Self {
                width as $T
            }
        }
    };
}

impl_packed_word!(u32);
impl_packed_word!(u64);
