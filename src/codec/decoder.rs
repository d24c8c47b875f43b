//! Read cursor
//!
//! Reads fixed-width integers and length-prefixed blobs from a caller-owned,
//! immutable buffer. Every read is bounds-checked against the buffer end
//! before any byte is touched, and the first failure latches: once a read
//! has failed, every later read on the same decoder returns that error.

use bytes::Buf;

use crate::config::CodecConfig;
use crate::error::{Result, WireError};

macro_rules! get_fixed {
    ($name:ident, $ty:ty, $get:ident) => {
        #[doc = concat!("Read a little-endian `", stringify!($ty), "`")]
        pub fn $name(&mut self) -> Result<$ty> {
            let mut bytes = self.take(std::mem::size_of::<$ty>())?;
            Ok(bytes.$get())
        }
    };
}

/// Read cursor over a caller-owned buffer
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    /// Current read position
    pos: usize,
    /// Limits applied to wire-supplied counts and lengths
    config: CodecConfig,
    /// First error seen; sticky
    error: Option<WireError>,
}

impl<'a> Decoder<'a> {
    /// Create a decoder with default limits
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_config(buf, CodecConfig::default())
    }

    /// Create a decoder with explicit limits
    pub fn with_config(buf: &'a [u8], config: CodecConfig) -> Self {
        Self {
            buf,
            pos: 0,
            config,
            error: None,
        }
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before the end of the buffer
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The unread tail of the buffer
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Limits in effect for this decoder
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Whether a previous read has failed
    pub fn has_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Latch `err` as this decoder's failure and hand it back
    pub fn fail(&mut self, err: WireError) -> WireError {
        tracing::debug!(position = self.pos, error = %err, "decode failed");
        if self.error.is_none() {
            self.error = Some(err.clone());
        }
        err
    }

    fn check_latch(&self) -> Result<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Look at the next `n` bytes without consuming them
    pub fn peek(&mut self, n: usize) -> Result<&'a [u8]> {
        self.check_latch()?;
        let remaining = self.remaining();
        if n > remaining {
            return Err(self.fail(WireError::TruncatedInput { needed: n, remaining }));
        }
        Ok(&self.buf[self.pos..self.pos + n])
    }

    /// Consume the next `n` bytes
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let bytes = self.peek(n)?;
        self.pos += n;
        Ok(bytes)
    }

    get_fixed!(get_u8, u8, get_u8);
    get_fixed!(get_i8, i8, get_i8);
    get_fixed!(get_u16, u16, get_u16_le);
    get_fixed!(get_i16, i16, get_i16_le);
    get_fixed!(get_u32, u32, get_u32_le);
    get_fixed!(get_i32, i32, get_i32_le);
    get_fixed!(get_u64, u64, get_u64_le);
    get_fixed!(get_i64, i64, get_i64_le);

    /// Read a `u32` length prefix and borrow that many bytes
    pub fn get_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.get_u32()? as usize;
        self.take(len)
    }

    /// Read a length-prefixed UTF-8 string of at most `max_len` bytes
    pub fn get_string(&mut self, max_len: u32, what: &str) -> Result<String> {
        let len = self.get_u32()?;
        if len > max_len {
            return Err(self.fail(WireError::malformed(format!(
                "{} length {} exceeds limit {}",
                what, len, max_len
            ))));
        }
        let bytes = self.take(len as usize)?;
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_owned()),
            Err(e) => Err(self.fail(WireError::malformed(format!(
                "{} is not valid UTF-8: {}",
                what, e
            )))),
        }
    }

    /// Read a `u32` element count
    ///
    /// The count must not exceed `limit`, and `count * min_elem_size` bytes
    /// must still be available, so a hostile count can never size an
    /// allocation larger than the input could fill.
    pub fn get_count(&mut self, limit: u32, min_elem_size: usize, what: &str) -> Result<usize> {
        let count = self.get_u32()?;
        if count > limit {
            tracing::warn!(count, limit, "{} count exceeds configured limit", what);
            return Err(self.fail(WireError::malformed(format!(
                "{} count {} exceeds limit {}",
                what, count, limit
            ))));
        }
        let count = count as usize;
        let needed = count.saturating_mul(min_elem_size);
        let remaining = self.remaining();
        if needed > remaining {
            return Err(self.fail(WireError::TruncatedInput { needed, remaining }));
        }
        Ok(count)
    }
}
