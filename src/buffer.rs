//! The minimal byte-buffer capability consumed by the varint codec.
//!
//! The codec only ever needs to push or pull one byte at a time with an
//! implicit cursor. Ownership, pooling and lifetime of the underlying storage
//! stay with the caller; anything that can hand out or accept single bytes can
//! implement these traits.

use std::io::Cursor;

use crate::error::DeltapackError;

/// A source of bytes with implicit position advancement.
pub trait ByteReader {
    fn read_byte(&mut self) -> Result<u8, DeltapackError>;
}

/// A sink of bytes with implicit position advancement.
pub trait ByteWriter {
    fn write_byte(&mut self, byte: u8) -> Result<(), DeltapackError>;
}

fn end_of_buffer() -> DeltapackError {
    DeltapackError::VarintDecodeError("Unexpected end of buffer".to_string())
}

//==================================================================================
// 1. Adapters for std types
//==================================================================================

impl ByteWriter for Vec<u8> {
    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<(), DeltapackError> {
        self.push(byte);
        Ok(())
    }
}

/// Reading from a slice consumes it from the front.
impl ByteReader for &[u8] {
    #[inline]
    fn read_byte(&mut self) -> Result<u8, DeltapackError> {
        let (&first, rest) = self.split_first().ok_or_else(end_of_buffer)?;
        *self = rest;
        Ok(first)
    }
}

impl<B: AsRef<[u8]>> ByteReader for Cursor<B> {
    #[inline]
    fn read_byte(&mut self) -> Result<u8, DeltapackError> {
        let pos = self.position() as usize;
        let byte = *self.get_ref().as_ref().get(pos).ok_or_else(end_of_buffer)?;
        self.set_position((pos + 1) as u64);
        Ok(byte)
    }
}

impl<R: ByteReader + ?Sized> ByteReader for &mut R {
    #[inline]
    fn read_byte(&mut self) -> Result<u8, DeltapackError> {
        (**self).read_byte()
    }
}

impl<W: ByteWriter + ?Sized> ByteWriter for &mut W {
    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<(), DeltapackError> {
        (**self).write_byte(byte)
    }
}

//==================================================================================
// 2. Growable read/write buffer
//==================================================================================

/// An owned buffer with independent reader and writer indices.
///
/// Writes always append; reads advance from the front and never pass the
/// writer index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    data: Vec<u8>,
    reader_index: usize,
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            reader_index: 0,
        }
    }

    /// Wraps existing bytes for reading from the start.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data,
            reader_index: 0,
        }
    }

    pub fn reader_index(&self) -> usize {
        self.reader_index
    }

    /// Bytes written but not yet read.
    pub fn readable_bytes(&self) -> usize {
        self.data.len() - self.reader_index
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl ByteReader for ByteBuffer {
    #[inline]
    fn read_byte(&mut self) -> Result<u8, DeltapackError> {
        let byte = *self.data.get(self.reader_index).ok_or_else(end_of_buffer)?;
        self.reader_index += 1;
        Ok(byte)
    }
}

impl ByteWriter for ByteBuffer {
    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<(), DeltapackError> {
        self.data.push(byte);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_reader_advances_and_reports_eof() {
        let bytes = [1u8, 2];
        let mut reader: &[u8] = &bytes;
        assert_eq!(reader.read_byte().unwrap(), 1);
        assert_eq!(reader.read_byte().unwrap(), 2);
        assert!(matches!(
            reader.read_byte(),
            Err(DeltapackError::VarintDecodeError(_))
        ));
    }

    #[test]
    fn test_cursor_reader() {
        let mut cursor = Cursor::new(vec![7u8, 8, 9]);
        cursor.set_position(1);
        assert_eq!(cursor.read_byte().unwrap(), 8);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_byte_buffer_interleaved_read_write() {
        let mut buf = ByteBuffer::new();
        buf.write_byte(0xAA).unwrap();
        buf.write_byte(0xBB).unwrap();
        assert_eq!(buf.read_byte().unwrap(), 0xAA);
        buf.write_byte(0xCC).unwrap();
        assert_eq!(buf.readable_bytes(), 2);
        assert_eq!(buf.read_byte().unwrap(), 0xBB);
        assert_eq!(buf.read_byte().unwrap(), 0xCC);
        assert!(buf.read_byte().is_err());
        assert_eq!(buf.reader_index(), 3);
    }
}
