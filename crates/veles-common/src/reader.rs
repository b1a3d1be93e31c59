//! Binary reader for bounds-checked parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! binary data from a borrowed byte slice without copying. Every read either
//! succeeds completely or fails with [`Error::OutOfBounds`]; a corrupt length
//! field never results in a silently truncated value.

use byteorder::ByteOrder;
use zerocopy::FromBytes;

use crate::{Error, Result, Sha1Digest};

/// A binary reader over a borrowed byte slice.
///
/// The reader only borrows its buffer. Slices it hands out point into that
/// buffer, so nothing is allocated beyond what the caller copies.
///
/// # Example
///
/// ```
/// use veles_common::BinaryReader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// assert_eq!(reader.read_u32().unwrap(), 0x08070605);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek to an absolute position.
    ///
    /// Seeking to exactly the end of the buffer is allowed; anything past it
    /// fails with [`Error::InvalidOffset`].
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        match usize::try_from(offset) {
            Ok(position) if position <= self.data.len() => {
                self.position = position;
                Ok(())
            }
            _ => Err(Error::InvalidOffset {
                offset,
                len: self.data.len(),
            }),
        }
    }

    /// Skip a number of bytes.
    #[inline]
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::OutOfBounds {
                offset: self.position,
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-size byte array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read a 20-byte SHA-1 digest.
    #[inline]
    pub fn read_digest(&mut self) -> Result<Sha1Digest> {
        self.read_array().map(Sha1Digest::from_bytes)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a boolean (non-zero = true).
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_u8().map(|b| b != 0)
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a little-endian u64.
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.read_bytes(8)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    /// Read a u16 with the given byte order.
    #[inline]
    pub fn read_u16_with<E: ByteOrder>(&mut self) -> Result<u16> {
        self.read_bytes(2).map(E::read_u16)
    }

    /// Read a u32 with the given byte order.
    #[inline]
    pub fn read_u32_with<E: ByteOrder>(&mut self) -> Result<u32> {
        self.read_bytes(4).map(E::read_u32)
    }

    /// Read a u64 with the given byte order.
    #[inline]
    pub fn read_u64_with<E: ByteOrder>(&mut self) -> Result<u64> {
        self.read_bytes(8).map(E::read_u64)
    }

    /// Read a string of a specific length.
    pub fn read_string(&mut self, length: usize) -> Result<&'a str> {
        let bytes = self.read_bytes(length)?;
        std::str::from_utf8(bytes).map_err(Error::Utf8)
    }

    /// Read a UTF-8 string prefixed by its little-endian u32 byte length.
    ///
    /// The position is left untouched when the declared length runs past the
    /// end of the buffer.
    pub fn read_prefixed_str(&mut self) -> Result<&'a str> {
        let start = self.position;
        let length = self.read_u32()? as usize;
        let result = self.read_string(length);
        if result.is_err() {
            self.position = start;
        }
        result
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let offset = self.position;
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::OutOfBounds {
            offset,
            needed: size,
            available: bytes.len(),
        })
    }

    /// Peek at a value without advancing.
    #[inline]
    pub fn peek_u32(&self) -> Result<u32> {
        let bytes = self.peek_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

#[cfg(test)]
mod tests {
    use byteorder::BigEndian;

    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x04030201
            0xFF, 0xFF, 0xFF, 0xFF, // u32: 0xFFFFFFFF
        ];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.read_u32().unwrap(), 0xFFFFFFFF);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_explicit_endianness() {
        let data = [0x00, 0x00, 0x05, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2A];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32_with::<BigEndian>().unwrap(), 0x05F0);
        assert_eq!(reader.read_u64_with::<BigEndian>().unwrap(), 42);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.peek_u32().unwrap(), 0x04030201);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        let err = reader.read_u32().unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfBounds {
                offset: 0,
                needed: 4,
                available: 2
            }
        ));
        // A failed read must not move the cursor.
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_seek_bounds() {
        let data = [0u8; 8];
        let mut reader = BinaryReader::new(&data);

        reader.seek(8).unwrap();
        assert!(reader.is_empty());

        let err = reader.seek(9).unwrap_err();
        assert!(matches!(err, Error::InvalidOffset { offset: 9, len: 8 }));
        assert_eq!(reader.position(), 8);
    }

    #[test]
    fn test_prefixed_str() {
        let mut data = Vec::new();
        data.extend_from_slice(&5u32.to_le_bytes());
        data.extend_from_slice(b"hello");
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(b"pak");

        let mut reader = BinaryReader::new(&data);
        assert_eq!(reader.read_prefixed_str().unwrap(), "hello");
        assert_eq!(reader.read_prefixed_str().unwrap(), "pak");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_prefixed_str_corrupt_length() {
        let mut data = Vec::new();
        data.extend_from_slice(&1000u32.to_le_bytes());
        data.extend_from_slice(b"short");

        let mut reader = BinaryReader::new(&data);
        assert!(matches!(
            reader.read_prefixed_str(),
            Err(Error::OutOfBounds { needed: 1000, .. })
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_read_digest() {
        let data = [0xABu8; 21];
        let mut reader = BinaryReader::new(&data);

        let digest = reader.read_digest().unwrap();
        assert_eq!(digest.as_bytes(), &[0xAB; 20]);
        assert_eq!(reader.remaining(), 1);
    }
}
