//! This module serves as the public API and dispatcher for the collection of
//! pure, stateless packing kernels.
//!
//! It declares the kernel sub-modules and provides a single dispatcher for
//! encoding and one for decoding raw byte buffers. The dispatcher picks the
//! typed kernel from the `ElementType` and the strategy from the `CodecConfig`.

use num_traits::NumCast;

use crate::config::{CodecConfig, PackingStrategy};
use crate::error::DeltapackError;
use crate::traits::PackedWord;
use crate::types::ElementType;
use crate::utils::{bytes_to_typed_vec, leading_values, typed_slice_to_bytes};

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Width selection for one sub-block.
pub mod width;

/// Per-width delta bit-packing of one sub-block.
pub mod bitpack;

/// Chunked orchestration with width headers.
pub mod integrated;

/// Per-element delta varints.
pub mod leb128;


//==================================================================================
// 2. Typed Strategy Execution
//==================================================================================

fn init_value_as<T: PackedWord>(config: &CodecConfig) -> Result<T, DeltapackError> {
    <T as NumCast>::from(config.init_value).ok_or_else(|| {
        DeltapackError::ConfigError(format!(
            "init_value {} does not fit in a {}-bit word",
            config.init_value,
            T::BITS
        ))
    })
}

/// Appends the encoding of `values` under `config` to `output_buf`.
pub(crate) fn encode_values<T: PackedWord>(
    config: &CodecConfig,
    values: &[T],
    output_buf: &mut Vec<u8>,
) -> Result<(), DeltapackError> {
    let packed_len = match config.strategy {
        PackingStrategy::Integrated => values.len(),
        PackingStrategy::Variable => 0,
        PackingStrategy::Hybrid => values.len() - values.len() % T::BLOCK_LEN,
    };
    let (packed, rest) = values.split_at(packed_len);

    if !packed.is_empty() || config.strategy == PackingStrategy::Integrated {
        let init_value = init_value_as::<T>(config)?;
        let mut words = vec![T::zero(); integrated::max_compressed_len::<T>(packed.len())];
        let written = integrated::compress_integrated(packed, &mut words, init_value)?;
        output_buf.extend_from_slice(typed_slice_to_bytes(&words[..written]));
    }
    leb128::compress_variable(rest, output_buf)
}

/// Decodes exactly `num_values` values from `input_bytes` under `config`.
pub(crate) fn decode_values<T: PackedWord>(
    config: &CodecConfig,
    input_bytes: &[u8],
    num_values: usize,
) -> Result<Vec<T>, DeltapackError> {
    let mut output = vec![T::zero(); num_values];
    let packed_len = match config.strategy {
        PackingStrategy::Integrated => num_values,
        PackingStrategy::Variable => 0,
        PackingStrategy::Hybrid => num_values - num_values % T::BLOCK_LEN,
    };
    let (packed, rest) = output.split_at_mut(packed_len);

    let mut consumed_bytes = 0;
    match config.strategy {
        PackingStrategy::Integrated => {
            let words = bytes_to_typed_vec::<T>(input_bytes)?;
            let consumed = integrated::decompress_integrated(&words, packed, init_value_as(config)?)?;
            consumed_bytes = consumed * std::mem::size_of::<T>();
        }
        PackingStrategy::Hybrid if !packed.is_empty() => {
            // The varint tail is not word-aligned, so only whole words are lifted.
            let words = leading_values::<T>(input_bytes);
            let consumed = integrated::decompress_integrated(&words, packed, init_value_as(config)?)?;
            consumed_bytes = consumed * std::mem::size_of::<T>();
        }
        _ => {}
    }

    let mut tail = &input_bytes[consumed_bytes..];
    leb128::decompress_variable(&mut tail, rest)?;
    if !tail.is_empty() {
        return Err(DeltapackError::TrailingBytes(tail.len()));
    }
    Ok(output)
}

//==================================================================================
// 3. Public API (Unified Dispatchers)
//==================================================================================

/// The single, unified dispatcher for all ENCODE operations.
///
/// `input_bytes` holds values of `element_type` in native byte order;
/// `output_buf` is cleared and receives the packed stream.
pub fn dispatch_encode(
    config: &CodecConfig,
    input_bytes: &[u8],
    output_buf: &mut Vec<u8>,
    element_type: ElementType,
) -> Result<(), DeltapackError> {
    output_buf.clear();
    log::debug!(
        "dispatch_encode: {} {} values with {:?}",
        input_bytes.len() / element_type.byte_width(),
        element_type,
        config.strategy
    );
    match element_type {
        ElementType::UInt32 => {
            encode_values(config, &bytes_to_typed_vec::<u32>(input_bytes)?, output_buf)
        }
        ElementType::UInt64 => {
            encode_values(config, &bytes_to_typed_vec::<u64>(input_bytes)?, output_buf)
        }
    }
}

/// The single, unified dispatcher for all DECODE operations.
///
/// `num_values` must be the element count that was encoded; `output_buf` is
/// cleared and receives the values in native byte order.
pub fn dispatch_decode(
    config: &CodecConfig,
    input_bytes: &[u8],
    output_buf: &mut Vec<u8>,
    element_type: ElementType,
    num_values: usize,
) -> Result<(), DeltapackError> {
    output_buf.clear();
    output_buf.reserve(num_values * element_type.byte_width());
    match element_type {
        ElementType::UInt32 => {
            let values = decode_values::<u32>(config, input_bytes, num_values)?;
            output_buf.extend_from_slice(typed_slice_to_bytes(&values));
        }
        ElementType::UInt64 => {
            let values = decode_values::<u64>(config, input_bytes, num_values)?;
            output_buf.extend_from_slice(typed_slice_to_bytes(&values));
        }
    }
    Ok(())
}

//==================================================================================
// 4. Unit Tests
//==================================================================================
