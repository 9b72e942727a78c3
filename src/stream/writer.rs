//! Stream writer
//!
//! Encoder mirroring the offline table writer. The runtime never encodes
//! tables; this exists to build fixtures for tests and benchmarks.

use bytes::{BufMut, Bytes, BytesMut};

/// Little-endian encoder for table payloads
#[derive(Debug, Default)]
pub struct StreamWriter {
    buf: BytesMut,
}

impl StreamWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    pub fn write_u8(&mut self, v: u8) -> &mut Self {
        self.buf.put_u8(v);
        self
    }

    pub fn write_i8(&mut self, v: i8) -> &mut Self {
        self.buf.put_i8(v);
        self
    }

    pub fn write_bool(&mut self, v: bool) -> &mut Self {
        self.buf.put_u8(u8::from(v));
        self
    }

    pub fn write_u16(&mut self, v: u16) -> &mut Self {
        self.buf.put_u16_le(v);
        self
    }

    pub fn write_i16(&mut self, v: i16) -> &mut Self {
        self.buf.put_i16_le(v);
        self
    }

    pub fn write_u32(&mut self, v: u32) -> &mut Self {
        self.buf.put_u32_le(v);
        self
    }

    pub fn write_i32(&mut self, v: i32) -> &mut Self {
        self.buf.put_i32_le(v);
        self
    }

    pub fn write_u64(&mut self, v: u64) -> &mut Self {
        self.buf.put_u64_le(v);
        self
    }

    pub fn write_i64(&mut self, v: i64) -> &mut Self {
        self.buf.put_i64_le(v);
        self
    }

    pub fn write_f32(&mut self, v: f32) -> &mut Self {
        self.buf.put_f32_le(v);
        self
    }

    pub fn write_f64(&mut self, v: f64) -> &mut Self {
        self.buf.put_f64_le(v);
        self
    }

    // =========================================================================
    // Length-prefixed values
    // =========================================================================

    /// Count prefix. Panics if `count` does not fit an int32.
    pub fn write_count(&mut self, count: usize) -> &mut Self {
        let count = i32::try_from(count).expect("count exceeds i32::MAX");
        self.write_i32(count)
    }

    /// int32 length + UTF-8 bytes
    pub fn write_str(&mut self, s: &str) -> &mut Self {
        self.write_count(s.len());
        self.buf.put_slice(s.as_bytes());
        self
    }

    /// Raw bytes, no prefix
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.put_slice(bytes);
        self
    }

    /// Count-prefixed repetition
    pub fn write_list<T, F>(&mut self, items: &[T], mut item: F) -> &mut Self
    where
        F: FnMut(&mut Self, &T),
    {
        self.write_count(items.len());
        for v in items {
            item(self, v);
        }
        self
    }

    /// Count-prefixed `(key, value)` pairs
    pub fn write_map<'a, K, V, I, FK, FV>(&mut self, entries: I, mut key: FK, mut value: FV) -> &mut Self
    where
        K: 'a,
        V: 'a,
        I: IntoIterator<Item = (&'a K, &'a V)>,
        I::IntoIter: ExactSizeIterator,
        FK: FnMut(&mut Self, &K),
        FV: FnMut(&mut Self, &V),
    {
        let entries = entries.into_iter();
        self.write_count(entries.len());
        for (k, v) in entries {
            key(self, k);
            value(self, v);
        }
        self
    }

    // =========================================================================
    // Output
    // =========================================================================

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Encode one table payload: record count, then each record
pub fn encode_table<T, F>(records: &[T], mut record: F) -> Bytes
where
    F: FnMut(&mut StreamWriter, &T),
{
    let mut writer = StreamWriter::new();
    writer.write_list(records, |w, r| record(w, r));
    writer.finish()
}

/// Assembles table payloads into one blob
#[derive(Debug, Default)]
pub struct BlobBuilder {
    sections: Vec<(String, Bytes)>,
}

impl BlobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table payload
    pub fn section(mut self, name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        self.sections.push((name.into(), payload.into()));
        self
    }

    /// `tableCount`, then `name + byteLength + payload` per section
    pub fn build_sectioned(&self) -> Bytes {
        let mut writer = StreamWriter::new();
        writer.write_count(self.sections.len());
        for (name, payload) in &self.sections {
            writer.write_str(name);
            writer.write_count(payload.len());
            writer.write_bytes(payload);
        }
        writer.finish()
    }

    /// Payloads back to back, no headers
    pub fn build_contiguous(&self) -> Bytes {
        let mut writer = StreamWriter::new();
        for (_, payload) in &self.sections {
            writer.write_bytes(payload);
        }
        writer.finish()
    }
}
