//! Stream reader
//!
//! Zero-copy, forward-only decoder over a borrowed byte slice.

use std::hash::Hash;

use bytes::Buf;

use crate::error::{CfgError, Result};
use crate::keyed::KeyedList;

/// Sequential decoder over a fully buffered blob
///
/// Primitive reads either consume exactly their width or fail with
/// `TruncatedStream` without moving the cursor.
#[derive(Debug, Clone)]
pub struct Stream<'a> {
    /// Unread bytes
    buf: &'a [u8],
    /// Absolute offset of `buf[0]` from the start of the outermost blob
    offset: usize,
}

impl<'a> Stream<'a> {
    /// Create a stream positioned at the start of `bytes`
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            buf: bytes,
            offset: 0,
        }
    }

    /// Absolute offset of the next unread byte
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.buf.len() < needed {
            return Err(CfgError::TruncatedStream {
                offset: self.offset,
                needed,
                remaining: self.buf.len(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        self.offset += 1;
        Ok(self.buf.get_u8())
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        self.offset += 1;
        Ok(self.buf.get_i8())
    }

    /// One byte, nonzero = true
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        self.offset += 2;
        Ok(self.buf.get_u16_le())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        self.offset += 2;
        Ok(self.buf.get_i16_le())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        self.offset += 4;
        Ok(self.buf.get_u32_le())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        self.offset += 4;
        Ok(self.buf.get_i32_le())
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        self.offset += 8;
        Ok(self.buf.get_u64_le())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.ensure(8)?;
        self.offset += 8;
        Ok(self.buf.get_i64_le())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.ensure(4)?;
        self.offset += 4;
        Ok(self.buf.get_f32_le())
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.ensure(8)?;
        self.offset += 8;
        Ok(self.buf.get_f64_le())
    }

    // =========================================================================
    // Length-prefixed values
    // =========================================================================

    /// Read an int32 prefix that must not be negative
    fn read_len(&mut self, what: &str) -> Result<usize> {
        let at = self.offset;
        let raw = self.read_i32()?;
        usize::try_from(raw).map_err(|_| {
            CfgError::MalformedField(format!("negative {} {} at offset {}", what, raw, at))
        })
    }

    /// Read an element count (int32, non-negative)
    pub fn read_count(&mut self) -> Result<usize> {
        self.read_len("count")
    }

    /// Borrow the next `len` bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        self.offset += len;
        Ok(head)
    }

    /// Length-prefixed UTF-8 string, borrowed from the blob
    pub fn read_str(&mut self) -> Result<&'a str> {
        let len = self.read_len("string length")?;
        let at = self.offset;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes).map_err(|e| {
            CfgError::MalformedField(format!("invalid UTF-8 in string at offset {}: {}", at, e))
        })
    }

    /// Length-prefixed UTF-8 string, owned
    pub fn read_string(&mut self) -> Result<String> {
        self.read_str().map(str::to_owned)
    }

    // =========================================================================
    // Compound values
    // =========================================================================

    /// Count-prefixed repetition of `item`
    pub fn read_list<T, F>(&mut self, mut item: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let count = self.read_count()?;
        // A bogus count must not turn into a huge allocation
        let mut items = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            items.push(item(self)?);
        }
        Ok(items)
    }

    /// Count-prefixed `(key, value)` pairs.
    ///
    /// The offline writer emits maps, so a repeated key means the blob is
    /// corrupt and is reported as `MalformedField`.
    pub fn read_map<K, V, FK, FV>(&mut self, mut key: FK, mut value: FV) -> Result<KeyedList<K, V>>
    where
        K: Eq + Hash,
        FK: FnMut(&mut Self) -> Result<K>,
        FV: FnMut(&mut Self) -> Result<V>,
    {
        let count = self.read_count()?;
        let mut map = KeyedList::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            let at = self.offset;
            let k = key(self)?;
            let v = value(self)?;
            if !map.insert(k, v) {
                return Err(CfgError::MalformedField(format!(
                    "duplicate map key at offset {}",
                    at
                )));
            }
        }
        Ok(map)
    }

    // =========================================================================
    // Framing
    // =========================================================================

    /// Skip `len` bytes
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Split off a sub-stream over the next `len` bytes.
    ///
    /// The parent advances past them; the child keeps absolute offsets.
    pub fn split_to(&mut self, len: usize) -> Result<Stream<'a>> {
        let offset = self.offset;
        let bytes = self.read_bytes(len)?;
        Ok(Stream { buf: bytes, offset })
    }

    /// Read an int32 byte length, then split off that many bytes
    pub fn read_section(&mut self) -> Result<Stream<'a>> {
        let len = self.read_len("section length")?;
        self.split_to(len)
    }

    /// Fail unless every byte has been consumed
    pub fn expect_end(&self, what: &str) -> Result<()> {
        if !self.buf.is_empty() {
            return Err(CfgError::MalformedField(format!(
                "{} trailing bytes after {} at offset {}",
                self.buf.len(),
                what,
                self.offset
            )));
        }
        Ok(())
    }
}
