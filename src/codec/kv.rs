//! Key-value pair codec
//!
//! Format: key_len (4) + key + value_len (4) + value.
//! The value may be empty, in which case no value bytes follow its length.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{Decoder, Encoder, WireCodec, LEN_PREFIX_SIZE};

/// Smallest possible encoding: two empty length prefixes
pub(crate) const MIN_KV_SIZE: usize = 2 * LEN_PREFIX_SIZE;

/// An opaque key with an opaque value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Write a pair from borrowed parts without building a `KeyValue`
    pub fn encode_parts(enc: &mut Encoder<'_>, key: &[u8], value: &[u8]) {
        enc.put_bytes(key);
        enc.put_bytes(value);
    }

    /// Read a pair as borrowed slices into the decoder's buffer
    pub fn decode_parts<'a>(dec: &mut Decoder<'a>) -> Result<(&'a [u8], &'a [u8])> {
        let key = dec.get_bytes()?;
        let value = dec.get_bytes()?;
        Ok((key, value))
    }
}

impl WireCodec for KeyValue {
    fn encode_to(&self, enc: &mut Encoder<'_>) {
        Self::encode_parts(enc, &self.key, &self.value);
    }

    fn decode_from(dec: &mut Decoder<'_>) -> Result<Self> {
        let (key, value) = Self::decode_parts(dec)?;
        Ok(Self::new(key, value))
    }
}
