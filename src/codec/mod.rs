//! Codec Module
//!
//! Primitive building blocks shared by every message codec.
//!
//! ## Conventions
//! - Fixed-width integers are little-endian.
//! - Strings and byte blobs carry a `u32` length prefix.
//!
//! ```text
//! ┌───────────┬─────────────────────┐
//! │ Len (4)   │ Bytes (Len)         │   string / blob
//! └───────────┴─────────────────────┘
//! ┌───────────┬──────────┬───────────┬────────────┐
//! │ KLen (4)  │ Key      │ VLen (4)  │ Value      │   key-value
//! └───────────┴──────────┴───────────┴────────────┘
//! ```
//!
//! Every replica must serialize the same logical request to the same bytes,
//! so these conventions are fixed crate-wide and never negotiated.

mod decoder;
mod encoder;
mod kv;

use bytes::{Bytes, BytesMut};

use crate::error::Result;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use kv::KeyValue;

pub(crate) use kv::MIN_KV_SIZE;

/// Width of every length prefix on the wire
pub const LEN_PREFIX_SIZE: usize = 4;

/// A value with a fixed binary layout
///
/// `encode_to` and `decode_from` work on caller-owned cursors so that nested
/// messages share one buffer; `encode` and `decode` are the one-shot forms.
pub trait WireCodec: Sized {
    /// Append this value to the encoder
    fn encode_to(&self, enc: &mut Encoder<'_>);

    /// Read one value, advancing the decoder past it
    fn decode_from(dec: &mut Decoder<'_>) -> Result<Self>;

    /// Exact number of bytes `encode_to` writes
    fn encoded_len(&self) -> usize {
        let mut enc = Encoder::sizing();
        self.encode_to(&mut enc);
        enc.written()
    }

    /// Encode into a freshly allocated buffer
    fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_to(&mut Encoder::new(&mut buf));
        buf.freeze()
    }

    /// Decode one value from the front of `bytes` with default limits
    ///
    /// Trailing bytes are left alone; use a `Decoder` to find out where the
    /// value ended.
    fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_from(&mut Decoder::new(bytes))
    }
}
