use crate::{Error, Result};

/// ReadCursor is a wrapper around `&[u8]` and its purpose is to:
///
/// * Provide bounds-checked methods such as [read_u8][`ReadCursor::read_u8`] and [read_slice][`ReadCursor::read_slice`].
/// * Never read past the end of the wrapped slice: every read fails with [`Error::TruncatedInput`] instead.
/// * Keep track of the absolute position inside the original input, including in nested sub-cursors,
///   so that decoding errors can point at the offending octet.
#[derive(Debug, Clone)]
pub struct ReadCursor<'a> {
    inner: &'a [u8],
    pos: usize,
    offset: usize,
}

impl<'a> ReadCursor<'a> {
    /// Creates a new cursor wrapping the provided underlying in-memory buffer.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_offset(bytes, 0)
    }

    /// Creates a cursor over `bytes` that reports positions starting at `offset`.
    pub fn with_offset(bytes: &'a [u8], offset: usize) -> Self {
        Self {
            inner: bytes,
            pos: 0,
            offset,
        }
    }

    /// Returns the size of the remaining bytes.
    pub fn len(&self) -> usize {
        self.inner.len() - self.pos
    }

    /// Returns `true` if there are no bytes left.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the remaining bytes without consuming them.
    pub fn remaining(&self) -> &'a [u8] {
        &self.inner[self.pos..]
    }

    /// Returns the absolute position of the next byte to be read.
    pub fn position(&self) -> usize {
        self.offset + self.pos
    }

    pub fn ensure_size(&self, name: &'static str, expected: usize) -> Result<()> {
        let received = self.len();

        if received < expected {
            return Err(Error::TruncatedInput {
                name,
                expected,
                received,
            });
        }

        Ok(())
    }

    pub fn read_u8(&mut self, name: &'static str) -> Result<u8> {
        let [byte] = self.read_array::<1>(name)?;

        Ok(byte)
    }

    pub fn peek_u8(&self, name: &'static str) -> Result<u8> {
        self.ensure_size(name, 1)?;

        Ok(self.inner[self.pos])
    }

    pub fn read_array<const N: usize>(&mut self, name: &'static str) -> Result<[u8; N]> {
        let mut array = [0; N];
        array.copy_from_slice(self.read_slice(name, N)?);

        Ok(array)
    }

    pub fn read_slice(&mut self, name: &'static str, n: usize) -> Result<&'a [u8]> {
        self.ensure_size(name, n)?;

        let bytes = &self.inner[self.pos..self.pos + n];
        self.pos += n;

        Ok(bytes)
    }

    /// Reads the remaining of the underlying in-memory buffer.
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let bytes = &self.inner[self.pos..];
        self.pos = self.inner.len();

        bytes
    }

    /// Splits off the next `n` bytes as a nested cursor and advances past them.
    pub fn sub_cursor(&mut self, name: &'static str, n: usize) -> Result<ReadCursor<'a>> {
        let offset = self.position();
        let bytes = self.read_slice(name, n)?;

        Ok(ReadCursor::with_offset(bytes, offset))
    }
}
