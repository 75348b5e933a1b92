// In: src/bridge/stateless_api.rs

use crate::bridge::format::PackingStats;
use crate::config::CodecConfig;
use crate::error::DeltapackError;
use crate::kernels;
use crate::kernels::integrated::scan_widths;
use crate::traits::PackedWord;

/// Compresses `values` under `config` into a fresh byte vector.
pub fn compress<T: PackedWord>(values: &[T], config: &CodecConfig) -> Result<Vec<u8>, DeltapackError> {
    let mut bytes = Vec::new();
    kernels::encode_values(config, values, &mut bytes)?;
    Ok(bytes)
}

/// Decompresses exactly `num_values` values. `config` must match the one used
/// to compress.
pub fn decompress<T: PackedWord>(
    bytes: &[u8],
    num_values: usize,
    config: &CodecConfig,
) -> Result<Vec<T>, DeltapackError> {
    kernels::decode_values(config, bytes, num_values)
}

/// Summarizes an integrated word stream holding `num_values` values without
/// unpacking any payload.
pub fn analyze<T: PackedWord>(words: &[T], num_values: usize) -> Result<PackingStats, DeltapackError> {
    let widths = scan_widths(words, num_values)?;

    let mut width_histogram = vec![0usize; T::BITS as usize + 1];
    for &width in &widths {
        width_histogram[width as usize] += 1;
    }
    let header_words = num_values.div_ceil(T::CHUNK_LEN);
    let payload_words = widths.iter().map(|&w| w as usize).sum();
    let total_bits = (header_words + payload_words) * T::BITS as usize;

    Ok(PackingStats {
        num_values,
        header_words,
        payload_words,
        width_histogram,
        bits_per_value: if num_values == 0 {
            0.0
        } else {
            total_bits as f64 / num_values as f64
        },
    })
}
