//! This module contains the integrated binary packing codec: it drives width
//! selection and the per-width bit-packing kernels over an arbitrary-length
//! window, one chunk at a time.
//!
//! Stream layout, per chunk of `T::CHUNK_LEN` elements (512 for `u64`):
//!
//! ```text
//! [header][payload of sub-block 1][payload of sub-block 2]...[payload of sub-block k]
//! ```
//!
//! The header word holds one width byte per sub-block, the first sub-block in
//! the most significant used byte (`w1 << 56 | w2 << 48 | ... | w8` for a full
//! `u64` chunk). A trailing partial chunk of `k` sub-blocks writes only `k` bytes
//! into the low end of its header (`w1 << 16 | w2 << 8 | w3` for `k = 3`).
//! Sub-block `j` is delta-packed against the last element of sub-block `j - 1`;
//! the very first one against the caller's `init_value`.
//!
//! The stream is not self-describing. The decoder must be told how many
//! elements to produce, and the window length must be a whole number of
//! sub-blocks.

use num_traits::ToPrimitive;

use crate::error::DeltapackError;
use crate::kernels::bitpack;
use crate::kernels::width::max_diff_bits;
use crate::traits::PackedWord;

/// Upper bound on `T::BLOCKS_PER_CHUNK` over every supported word.
const MAX_BLOCKS_PER_CHUNK: usize = 8;

//==================================================================================
// 1. Helpers
//==================================================================================

/// Rejects windows whose tail after the last full chunk is not a whole number
/// of sub-blocks.
fn check_window<T: PackedWord>(len: usize) -> Result<(), DeltapackError> {
    let remainder = len % T::CHUNK_LEN;
    if remainder % T::BLOCK_LEN != 0 {
        log::error!(
            "integrated codec: unsupported tail of {} elements (window of {})",
            remainder,
            len
        );
        return Err(DeltapackError::UnsupportedTailLength {
            remainder,
            block_len: T::BLOCK_LEN,
        });
    }
    Ok(())
}

/// Width of sub-block `index` out of `blocks` stored in `header`.
///
/// The first width is read together with every byte above it, so stray bits
/// above the used bytes of a partial header surface as an out-of-range width.
#[inline]
fn header_width<T: PackedWord>(header: T, blocks: usize, index: usize) -> u32 {
    let shifted = header >> (8 * (blocks - 1 - index));
    if index == 0 {
        shifted.to_u32().unwrap_or(u32::MAX)
    } else {
        shifted.low_byte() as u32
    }
}

/// Worst-case number of words [`compress_integrated`] writes for `len` elements:
/// every sub-block at full width plus one header per chunk.
pub fn max_compressed_len<T: PackedWord>(len: usize) -> usize {
    len + len.div_ceil(T::CHUNK_LEN)
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Compresses `input` into `output` and returns the number of words written.
///
/// `input.len()` must leave a remainder after the last full chunk that is a
/// multiple of `T::BLOCK_LEN`; anything else is rejected before a single word
/// is written. `output` must hold the packed stream; [`max_compressed_len`]
/// always suffices.
pub fn compress_integrated<T: PackedWord>(
    input: &[T],
    output: &mut [T],
    init_value: T,
) -> Result<usize, DeltapackError> {
    check_window::<T>(input.len())?;

    let mut widths = [0u32; MAX_BLOCKS_PER_CHUNK];
    let mut out_pos = 0;
    let mut init = init_value;

    for chunk in input.chunks(T::CHUNK_LEN) {
        let blocks = chunk.len() / T::BLOCK_LEN;
        let widths = &mut widths[..blocks];

        let mut header = T::zero();
        let mut block_init = init;
        for (width, block) in widths.iter_mut().zip(chunk.chunks_exact(T::BLOCK_LEN)) {
            *width = max_diff_bits(block_init, block)?;
            header = (header << 8) | T::from_width(*width);
            block_init = block[T::BLOCK_LEN - 1];
        }

        let needed = out_pos + 1 + widths.iter().map(|&w| w as usize).sum::<usize>();
        if output.len() < needed {
            return Err(DeltapackError::BufferTooSmall {
                needed,
                actual: output.len(),
            });
        }
        log::trace!("integrated chunk at word {}: widths {:?}", out_pos, widths);

        output[out_pos] = header;
        out_pos += 1;
        for (&width, block) in widths.iter().zip(chunk.chunks_exact(T::BLOCK_LEN)) {
            bitpack::pack(init, block, &mut output[out_pos..], width)?;
            out_pos += width as usize;
            init = block[T::BLOCK_LEN - 1];
        }
    }

    log::debug!(
        "integrated compress: {} values -> {} words",
        input.len(),
        out_pos
    );
    Ok(out_pos)
}

/// Decompresses exactly `output.len()` elements from the front of `input` and
/// returns the number of words consumed.
///
/// `init_value` must be the value passed to [`compress_integrated`]. An empty
/// `output` consumes nothing.
pub fn decompress_integrated<T: PackedWord>(
    input: &[T],
    output: &mut [T],
    init_value: T,
) -> Result<usize, DeltapackError> {
    check_window::<T>(output.len())?;

    let mut in_pos = 0;
    let mut init = init_value;

    for chunk in output.chunks_mut(T::CHUNK_LEN) {
        let blocks = chunk.len() / T::BLOCK_LEN;
        let header = *input.get(in_pos).ok_or(DeltapackError::BufferTooSmall {
            needed: in_pos + 1,
            actual: input.len(),
        })?;
        in_pos += 1;

        for (index, block) in chunk.chunks_exact_mut(T::BLOCK_LEN).enumerate() {
            let width = header_width(header, blocks, index);
            if width > T::BITS {
                log::error!(
                    "integrated codec: header at word {} carries width {}",
                    in_pos - 1,
                    width
                );
                return Err(DeltapackError::UnsupportedBitWidth {
                    width,
                    max: T::BITS,
                });
            }
            let end = in_pos + width as usize;
            let payload = input.get(in_pos..end).ok_or(DeltapackError::BufferTooSmall {
                needed: end,
                actual: input.len(),
            })?;
            bitpack::unpack(init, payload, block, width)?;
            in_pos = end;
            init = block[T::BLOCK_LEN - 1];
        }
    }

    log::debug!(
        "integrated decompress: {} words -> {} values",
        in_pos,
        output.len()
    );
    Ok(in_pos)
}

/// Walks only the headers of a packed stream holding `num_values` elements and
/// returns the width of every sub-block, in order.
pub fn scan_widths<T: PackedWord>(
    input: &[T],
    num_values: usize,
) -> Result<Vec<u32>, DeltapackError> {
    check_window::<T>(num_values)?;

    let mut widths = Vec::with_capacity(num_values / T::BLOCK_LEN);
    let mut in_pos = 0;
    let mut remaining = num_values;
    while remaining > 0 {
        let blocks = remaining.min(T::CHUNK_LEN) / T::BLOCK_LEN;
        let header = *input.get(in_pos).ok_or(DeltapackError::BufferTooSmall {
            needed: in_pos + 1,
            actual: input.len(),
        })?;
        in_pos += 1;
        for index in 0..blocks {
            let width = header_width(header, blocks, index);
            if width > T::BITS {
                return Err(DeltapackError::UnsupportedBitWidth {
                    width,
                    max: T::BITS,
                });
            }
            widths.push(width);
            in_pos += width as usize;
        }
        remaining -= blocks * T::BLOCK_LEN;
    }
    if in_pos > input.len() {
        return Err(DeltapackError::BufferTooSmall {
            needed: in_pos,
            actual: input.len(),
        });
    }
    Ok(widths)
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sorted_u64(rng: &mut StdRng, len: usize, max_gap: u64) -> Vec<u64> {
        let mut acc = 0u64;
        (0..len)
            .map(|_| {
                acc += rng.random_range(0..=max_gap);
                acc
            })
            .collect()
    }

    fn roundtrip_u64(values: &[u64], init_value: u64) -> usize {
        let mut packed = vec![0u64; max_compressed_len::<u64>(values.len())];
        let written = compress_integrated(values, &mut packed, init_value).unwrap();

        let mut restored = vec![0u64; values.len()];
        let consumed = decompress_integrated(&packed[..written], &mut restored, init_value).unwrap();
        assert_eq!(consumed, written);
        assert_eq!(restored, values);
        written
    }

    #[test]
    fn test_roundtrip_lengths() {
        let mut rng = StdRng::seed_from_u64(512);
        for len in [0, 64, 128, 448, 512, 576, 1024, 4096 + 64, 4096 + 448] {
            let values = sorted_u64(&mut rng, len, 1000);
            roundtrip_u64(&values, 0);
        }
    }

    #[test]
    fn test_roundtrip_unsorted_with_init_value() {
        let mut rng = StdRng::seed_from_u64(99);
        let values: Vec<u64> = (0..1088).map(|_| rng.random()).collect();
        roundtrip_u64(&values, 123_456);
    }

    #[test]
    fn test_full_chunk_header_layout() {
        // Sub-block j (1-based) is a run of stride j, so its width is bits(j).
        let mut values = Vec::with_capacity(512);
        let mut acc = 0u64;
        for stride in 1..=8u64 {
            for _ in 0..64 {
                acc += stride;
                values.push(acc);
            }
        }
        let mut packed = vec![0u64; max_compressed_len::<u64>(512)];
        let written = compress_integrated(&values, &mut packed, 0).unwrap();

        let expected_widths = [1u64, 2, 2, 3, 3, 3, 3, 4];
        let expected_header = expected_widths
            .iter()
            .fold(0u64, |acc, &w| (acc << 8) | w);
        assert_eq!(packed[0], expected_header);
        assert_eq!(packed[0] >> 56, 1);
        assert_eq!(written, 1 + expected_widths.iter().sum::<u64>() as usize);
    }

    #[test]
    fn test_partial_chunk_header_layout() {
        // Three sub-blocks: constant, stride 1, stride 4.
        let mut values = vec![9u64; 64];
        values.extend((1..=64).map(|i| 9 + i));
        let last = *values.last().unwrap();
        values.extend((1..=64).map(|i| last + 4 * i));

        let mut packed = vec![0u64; max_compressed_len::<u64>(values.len())];
        let written = compress_integrated(&values, &mut packed, 9).unwrap();
        assert_eq!(packed[0], (0u64 << 16) | (1 << 8) | 3);
        assert_eq!(written, 1 + 0 + 1 + 3);
        assert_eq!(scan_widths(&packed[..written], values.len()).unwrap(), vec![0, 1, 3]);
    }

    #[test]
    fn test_constant_input_is_headers_only() {
        let values = vec![42u64; 1024];
        let written = roundtrip_u64(&values, 42);
        assert_eq!(written, 2);
    }

    #[test]
    fn test_init_value_threads_across_chunks() {
        // Strictly +1 everywhere, including across the chunk boundary.
        let values: Vec<u64> = (1..=1024).collect();
        let mut packed = vec![0u64; max_compressed_len::<u64>(1024)];
        let written = compress_integrated(&values, &mut packed, 0).unwrap();
        assert_eq!(written, 2 * (1 + 8));
        assert_eq!(packed[0], 0x0101_0101_0101_0101);
        assert_eq!(packed[9], 0x0101_0101_0101_0101);
    }

    #[test]
    fn test_unsupported_tail_is_rejected_without_writing() {
        let values = vec![1u64; 512 + 65];
        let mut packed = vec![0xABu64; max_compressed_len::<u64>(values.len())];
        let result = compress_integrated(&values, &mut packed, 0);
        assert!(matches!(
            result,
            Err(DeltapackError::UnsupportedTailLength { remainder: 65, block_len: 64 })
        ));
        assert!(packed.iter().all(|&w| w == 0xAB));

        let mut restored = vec![0u64; 100];
        assert!(matches!(
            decompress_integrated(&packed, &mut restored, 0),
            Err(DeltapackError::UnsupportedTailLength { remainder: 100, .. })
        ));
    }

    #[test]
    fn test_corrupt_header_width_is_rejected() {
        let packed = vec![65u64, 0, 0];
        let mut restored = vec![0u64; 64];
        assert!(matches!(
            decompress_integrated(&packed, &mut restored, 0),
            Err(DeltapackError::UnsupportedBitWidth { width: 65, max: 64 })
        ));
    }

    #[test]
    fn test_stray_bits_above_partial_header_are_rejected() {
        let mut restored = vec![0u64; 64];
        let packed = vec![0xFF00_0000_0000_0001u64, u64::MAX];
        assert!(matches!(
            decompress_integrated(&packed, &mut restored, 0),
            Err(DeltapackError::UnsupportedBitWidth { width: u32::MAX, max: 64 })
        ));

        // Two sub-blocks use the low two bytes; the third byte must be clear.
        let mut restored = vec![0u64; 128];
        let packed = vec![(1u64 << 16) | (1 << 8) | 1, 0, 0];
        assert!(matches!(
            decompress_integrated(&packed, &mut restored, 0),
            Err(DeltapackError::UnsupportedBitWidth { width: 257, max: 64 })
        ));
        assert!(scan_widths(&packed, 128).is_err());
    }

    #[test]
    fn test_truncated_stream_is_rejected() {
        let values: Vec<u64> = (0..512).map(|i| i * 1000).collect();
        let mut packed = vec![0u64; max_compressed_len::<u64>(512)];
        let written = compress_integrated(&values, &mut packed, 0).unwrap();

        let mut restored = vec![0u64; 512];
        assert!(matches!(
            decompress_integrated(&packed[..written - 1], &mut restored, 0),
            Err(DeltapackError::BufferTooSmall { .. })
        ));
        assert!(scan_widths(&packed[..written - 1], 512).is_err());
    }

    #[test]
    fn test_undersized_output_is_rejected() {
        let values: Vec<u64> = (0..64).map(|i| i * 3).collect();
        let mut packed = vec![0u64; 2];
        assert!(matches!(
            compress_integrated(&values, &mut packed, 0),
            Err(DeltapackError::BufferTooSmall { needed: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_u32_roundtrip_and_header() {
        let mut rng = StdRng::seed_from_u64(32);
        let mut acc = 0u32;
        let values: Vec<u32> = (0..128 + 96)
            .map(|_| {
                acc = acc.wrapping_add(rng.random_range(0..200));
                acc
            })
            .collect();
        let mut packed = vec![0u32; max_compressed_len::<u32>(values.len())];
        let written = compress_integrated(&values, &mut packed, 0).unwrap();

        let widths = scan_widths(&packed[..written], values.len()).unwrap();
        assert_eq!(widths.len(), 7);
        assert_eq!(packed[0] >> 24, widths[0]);

        let mut restored = vec![0u32; values.len()];
        decompress_integrated(&packed[..written], &mut restored, 0).unwrap();
        assert_eq!(restored, values);

        let bad = vec![0u32; 128 + 40];
        assert!(matches!(
            compress_integrated(&bad, &mut packed, 0),
            Err(DeltapackError::UnsupportedTailLength { remainder: 40, block_len: 32 })
        ));
    }
}
