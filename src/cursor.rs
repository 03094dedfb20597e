//! Bounded sequential reader and writer over handshake bytes.
//!
//! [`ReadCursor`] hands out slices borrowed from the input, so the exact
//! bytes a peer sent can be hashed later without re-encoding them.
//! [`WriteCursor`] appends to a [`Buf`] but refuses to grow past a limit.

use std::ops::Range;

use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u8};
use nom::IResult;

use crate::buffer::Buf;
use crate::Error;

/// Reader over bytes that are already resident in memory.
#[derive(Debug, Clone)]
pub struct ReadCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ReadCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        ReadCursor { buf, pos: 0 }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The unread tail of the input.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.parse("u8", |i| be_u8(i))
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.parse("u16", |i| be_u16(i))
    }

    /// Borrow the next `n` bytes without copying.
    pub fn read_raw(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if n > self.remaining() {
            return Err(Error::TruncatedInput(format!(
                "need {} bytes, {} remaining",
                n,
                self.remaining()
            )));
        }
        self.parse("raw", |i| take(n)(i))
    }

    /// Read a u16 length prefix and borrow that many bytes.
    pub fn read_vector16(&mut self) -> Result<&'a [u8], Error> {
        let len = self.read_u16()?;
        self.read_raw(len as usize)
    }

    /// Borrow an already consumed region of the input.
    ///
    /// The range must lie within what has been read so far.
    pub fn consumed(&self, range: Range<usize>) -> &'a [u8] {
        debug_assert!(
            range.start <= range.end && range.end <= self.pos,
            "range {:?} not consumed (position {})",
            range,
            self.pos
        );
        let end = range.end.min(self.pos);
        let start = range.start.min(end);
        &self.buf[start..end]
    }

    fn parse<O, F>(&mut self, what: &str, parser: F) -> Result<O, Error>
    where
        F: FnOnce(&'a [u8]) -> IResult<&'a [u8], O>,
    {
        let input = self.rest();
        let (rest, value) = parser(input).map_err(|_| {
            Error::TruncatedInput(format!("{} with {} bytes remaining", what, input.len()))
        })?;
        self.pos += input.len() - rest.len();
        Ok(value)
    }
}

/// Writer appending to a [`Buf`] up to a fixed limit.
#[derive(Debug)]
pub struct WriteCursor<'b> {
    buf: &'b mut Buf,
    limit: usize,
}

impl<'b> WriteCursor<'b> {
    /// Create a writer that lets `buf` grow to at most `limit` bytes.
    pub fn new(buf: &'b mut Buf, limit: usize) -> Self {
        WriteCursor { buf, limit }
    }

    /// Offset at which the next byte will be written.
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.write_bytes(&[value])
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), Error> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.reserve(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Write a u16 length prefix followed by `bytes`.
    pub fn write_vector16(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let len = u16::try_from(bytes.len()).map_err(|_| {
            Error::AllocationFailure(format!("{} bytes do not fit a u16 length", bytes.len()))
        })?;
        self.reserve(2 + bytes.len())?;
        self.write_u16(len)?;
        self.write_bytes(bytes)
    }

    /// Reserve `n` zeroed bytes and hand them out for filling in place.
    pub fn write_raw(&mut self, n: usize) -> Result<&mut [u8], Error> {
        self.reserve(n)?;
        let start = self.buf.len();
        self.buf.resize(start + n, 0);
        Ok(&mut self.buf[start..])
    }

    /// Borrow a region that has already been written.
    ///
    /// The range must lie within what has been written so far.
    pub fn written(&self, range: Range<usize>) -> &[u8] {
        debug_assert!(
            range.start <= range.end && range.end <= self.buf.len(),
            "range {:?} not written (length {})",
            range,
            self.buf.len()
        );
        let end = range.end.min(self.buf.len());
        let start = range.start.min(end);
        &self.buf[start..end]
    }

    fn reserve(&self, n: usize) -> Result<(), Error> {
        let wanted = self.buf.len().saturating_add(n);
        if wanted > self.limit {
            return Err(Error::AllocationFailure(format!(
                "{} bytes exceed the {} byte limit",
                wanted, self.limit
            )));
        }
        Ok(())
    }
}
