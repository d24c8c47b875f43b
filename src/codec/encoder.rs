//! Write cursor
//!
//! Appends fixed-width integers and length-prefixed blobs to a caller-owned
//! buffer. An encoder built with [`Encoder::sizing`] writes nothing and only
//! counts, so callers can size a buffer before the real pass.

use bytes::{BufMut, BytesMut};

macro_rules! put_fixed {
    ($name:ident, $ty:ty, $put:ident) => {
        #[doc = concat!("Write a little-endian `", stringify!($ty), "`")]
        pub fn $name(&mut self, v: $ty) {
            self.written += std::mem::size_of::<$ty>();
            if let Some(buf) = self.buf.as_deref_mut() {
                buf.$put(v);
            }
        }
    };
}

/// Write cursor into a caller-supplied buffer
pub struct Encoder<'a> {
    /// Destination; `None` in sizing mode
    buf: Option<&'a mut BytesMut>,
    /// Bytes written (or that would have been written) by this encoder
    written: usize,
}

impl<'a> Encoder<'a> {
    /// Create an encoder appending to `buf`
    pub fn new(buf: &'a mut BytesMut) -> Self {
        Self {
            buf: Some(buf),
            written: 0,
        }
    }

    /// Create an encoder that only counts bytes
    pub fn sizing() -> Self {
        Self {
            buf: None,
            written: 0,
        }
    }

    /// Bytes written so far by this encoder
    pub fn written(&self) -> usize {
        self.written
    }

    put_fixed!(put_u8, u8, put_u8);
    put_fixed!(put_i8, i8, put_i8);
    put_fixed!(put_u16, u16, put_u16_le);
    put_fixed!(put_i16, i16, put_i16_le);
    put_fixed!(put_u32, u32, put_u32_le);
    put_fixed!(put_i32, i32, put_i32_le);
    put_fixed!(put_u64, u64, put_u64_le);
    put_fixed!(put_i64, i64, put_i64_le);

    /// Write bytes with no length prefix
    pub fn put_raw(&mut self, bytes: &[u8]) {
        self.written += bytes.len();
        if let Some(buf) = self.buf.as_deref_mut() {
            buf.put_slice(bytes);
        }
    }

    /// Write a `u32` length prefix followed by the bytes
    ///
    /// Blobs are bounded well below 4 GiB by every message that carries them.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.put_u32(bytes.len() as u32);
        self.put_raw(bytes);
    }

    /// Write a length-prefixed UTF-8 string
    pub fn put_str(&mut self, s: &str) {
        self.put_bytes(s.as_bytes());
    }
}
