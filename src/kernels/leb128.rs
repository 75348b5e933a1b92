//! This module contains the pure, stateless kernels for the varint delta codec:
//! a LEB128-style encoding with a bounded length.
//!
//! Each byte carries seven data bits, least significant group first, with bit 7
//! set on every byte except the last. Once `T::VARINT_GROUPS` groups have been
//! written the remaining high bits go into one terminal byte verbatim, so a
//! `u64` never takes more than 9 bytes and a `u32` never more than 5.
//!
//! The sequence kernels delta-encode against a running reference starting at
//! zero, which makes them data-oblivious: any length, any order.

use crate::buffer::{ByteReader, ByteWriter};
use crate::error::DeltapackError;
use crate::traits::PackedWord;

//==================================================================================
// 1. Public API for Single-Value Operations
//==================================================================================

/// Writes one value as a 1 to `T::MAX_VARINT_LEN` byte group.
#[inline]
pub fn write_var<T, W>(buf: &mut W, value: T) -> Result<(), DeltapackError>
where
    T: PackedWord,
    W: ByteWriter + ?Sized,
{
    let mut rest = value;
    for _ in 0..T::VARINT_GROUPS {
        if (rest >> 7).is_zero() {
            return buf.write_byte(rest.low_byte());
        }
        buf.write_byte(rest.low_byte() | 0x80)?;
        rest = rest >> 7;
    }
    buf.write_byte(rest.low_byte())
}

/// Reads one value written by [`write_var`].
#[inline]
pub fn read_var<T, R>(buf: &mut R) -> Result<T, DeltapackError>
where
    T: PackedWord,
    R: ByteReader + ?Sized,
{
    let mut value = T::zero();
    let mut shift = 0usize;
    for _ in 0..T::VARINT_GROUPS {
        let byte = buf.read_byte()?;
        value = value | (T::from_byte(byte & 0x7F) << shift);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
    // Terminal byte: no continuation flag, bits past the word are dropped.
    let byte = buf.read_byte()?;
    Ok(value | (T::from_byte(byte) << shift))
}

/// Number of bytes [`write_var`] uses for `value`.
pub fn var_len<T: PackedWord>(value: T) -> usize {
    let bits = (T::BITS - value.leading_zeros()) as usize;
    bits.div_ceil(7).clamp(1, T::MAX_VARINT_LEN)
}

//==================================================================================
// 2. Public API for Slice Operations
//==================================================================================

/// Delta-encodes every element of `input` into `buf`, the first one against 0.
pub fn compress_variable<T, W>(input: &[T], buf: &mut W) -> Result<(), DeltapackError>
where
    T: PackedWord,
    W: ByteWriter + ?Sized,
{
    let mut init_value = T::zero();
    for &value in input {
        write_var(buf, value.wrapping_sub(&init_value))?;
        init_value = value;
    }
    log::debug!("varint compress: {} values", input.len());
    Ok(())
}

/// Fills all of `output` from `buf`, reversing [`compress_variable`].
pub fn decompress_variable<T, R>(buf: &mut R, output: &mut [T]) -> Result<(), DeltapackError>
where
    T: PackedWord,
    R: ByteReader + ?Sized,
{
    let mut init_value = T::zero();
    for slot in output.iter_mut() {
        let delta: T = read_var(buf)?;
        init_value = init_value.wrapping_add(&delta);
        *slot = init_value;
    }
    log::debug!("varint decompress: {} values", output.len());
    Ok(())
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ByteBuffer;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn encode_one(value: u64) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_var(&mut bytes, value).unwrap();
        assert_eq!(bytes.len(), var_len(value));
        bytes
    }

    #[test]
    fn test_single_value_boundaries() {
        assert_eq!(encode_one(0), vec![0x00]);
        assert_eq!(encode_one(127), vec![0x7F]);
        assert_eq!(encode_one(128), vec![0x80, 0x01]);
        assert_eq!(encode_one(300), vec![0xAC, 0x02]);
        assert_eq!(encode_one(1 << 56), vec![0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        // Terminal byte carries bits 56..63 unmasked.
        assert_eq!(encode_one(u64::MAX), vec![0xFF; 9]);
        assert_eq!(encode_one((1 << 56) - 1), vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_single_value_roundtrip() {
        for value in [0u64, 1, 127, 128, 16_383, 16_384, 1 << 49, (1 << 56) - 1, 1 << 56, 1 << 63, u64::MAX] {
            let bytes = encode_one(value);
            let mut reader: &[u8] = &bytes;
            assert_eq!(read_var::<u64, _>(&mut reader).unwrap(), value);
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn test_u32_is_at_most_five_bytes() {
        let mut bytes = Vec::new();
        write_var(&mut bytes, u32::MAX).unwrap();
        assert_eq!(bytes, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
        let mut reader: &[u8] = &bytes;
        assert_eq!(read_var::<u32, _>(&mut reader).unwrap(), u32::MAX);
    }

    #[test]
    fn test_truncated_value_is_an_error() {
        let mut reader: &[u8] = &[0x80, 0x80];
        let result = read_var::<u64, _>(&mut reader);
        assert!(matches!(result, Err(DeltapackError::VarintDecodeError(_))));
    }

    #[test]
    fn test_sequence_roundtrip_any_length() {
        let mut rng = StdRng::seed_from_u64(128);
        for len in [0usize, 1, 2, 63, 65, 1000] {
            let values: Vec<u64> = (0..len).map(|_| rng.random()).collect();
            let mut buf = ByteBuffer::new();
            compress_variable(&values, &mut buf).unwrap();

            let mut restored = vec![0u64; len];
            decompress_variable(&mut buf, &mut restored).unwrap();
            assert_eq!(restored, values);
            assert_eq!(buf.readable_bytes(), 0);
        }
    }

    #[test]
    fn test_sorted_sequence_is_one_byte_per_small_gap() {
        let values: Vec<u64> = (0..100).map(|i| 1_000 + i * 5).collect();
        let mut bytes = Vec::new();
        compress_variable(&values, &mut bytes).unwrap();
        // 1000 takes two bytes, every gap of 5 takes one.
        assert_eq!(bytes.len(), 2 + 99);
    }

    #[test]
    fn test_decreasing_sequence_wraps() {
        let values = vec![10u64, 3, 0, u64::MAX, 7];
        let mut bytes = Vec::new();
        compress_variable(&values, &mut bytes).unwrap();
        let mut restored = vec![0u64; values.len()];
        decompress_variable(&mut bytes.as_slice(), &mut restored).unwrap();
        assert_eq!(restored, values);
    }
}
