//! Raw font bytes and positioned reads over them.

use std::ops::RangeBounds;

use font_types::{FixedSize, Scalar};

use crate::read::ReadError;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, providing the read methods the
/// rest of the crate is built on. All multi-byte values in a font are
/// big-endian, and all reads here decode them as such.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns self[pos..], if `pos` is in bounds.
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData { bytes })
    }

    /// Returns the sub-slice covering `range`, if it is in bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| FontData { bytes })
    }

    /// Read a big-endian scalar at the provided offset.
    pub fn read_at<T: Scalar + FixedSize>(&self, offset: usize) -> Result<T, ReadError> {
        offset
            .checked_add(T::RAW_BYTE_LEN)
            .and_then(|end| self.bytes.get(offset..end))
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    fn read_be_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], ReadError> {
        offset
            .checked_add(N)
            .and_then(|end| self.bytes.get(offset..end))
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(ReadError::OutOfBounds)
    }

    pub(crate) fn check_in_bounds(&self, offset: usize) -> Result<(), ReadError> {
        self.bytes
            .get(..offset)
            .ok_or(ReadError::OutOfBounds)
            .map(|_| ())
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

/// A cursor over [`FontData`] for decoding fields in sequence.
///
/// The integer widths that fonts use natively go through the generic
/// [`read`](Self::read) method; 64-bit integers and IEEE-754 floats have
/// no scalar representation in `font-types` and get dedicated methods.
#[derive(Debug, Default, Clone, Copy)]
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> Cursor<'a> {
    /// Advance past `n_bytes`, failing if fewer remain.
    pub fn skip(&mut self, n_bytes: usize) -> Result<(), ReadError> {
        let end = self
            .pos
            .checked_add(n_bytes)
            .ok_or(ReadError::OutOfBounds)?;
        if end > self.data.len() {
            return Err(ReadError::OutOfBounds);
        }
        self.pos = end;
        Ok(())
    }

    /// Read a big-endian scalar and advance past it.
    pub fn read<T: Scalar + FixedSize>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.pos += T::RAW_BYTE_LEN;
        temp
    }

    pub fn read_u64(&mut self) -> Result<u64, ReadError> {
        let raw = self.data.read_be_array::<8>(self.pos)?;
        self.pos += 8;
        Ok(u64::from_be_bytes(raw))
    }

    pub fn read_i64(&mut self) -> Result<i64, ReadError> {
        let raw = self.data.read_be_array::<8>(self.pos)?;
        self.pos += 8;
        Ok(i64::from_be_bytes(raw))
    }

    pub fn read_f32(&mut self) -> Result<f32, ReadError> {
        let raw = self.data.read_be_array::<4>(self.pos)?;
        self.pos += 4;
        Ok(f32::from_bits(u32::from_be_bytes(raw)))
    }

    pub fn read_f64(&mut self) -> Result<f64, ReadError> {
        let raw = self.data.read_be_array::<8>(self.pos)?;
        self.pos += 8;
        Ok(f64::from_bits(u64::from_be_bytes(raw)))
    }

    /// Return the current position, or an error if we are out of bounds.
    pub fn position(&self) -> Result<usize, ReadError> {
        self.data.check_in_bounds(self.pos).map(|_| self.pos)
    }
}
