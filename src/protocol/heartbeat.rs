//! Heartbeat requests
//!
//! Format: conn_id (4) + hb_type (4) + count (4) + count × key-value.
//!
//! Entries are written in whatever order the map yields them, so two
//! encodings of equal requests may differ in entry order. Nothing that
//! decodes a heartbeat may depend on that order.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::codec::{Decoder, Encoder, KeyValue, WireCodec, MIN_KV_SIZE};
use crate::error::Result;

/// Identifies the connection a heartbeat belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnKey {
    pub conn_id: i32,
    pub hb_type: i32,
}

impl ConnKey {
    pub fn new(conn_id: i32, hb_type: i32) -> Self {
        Self { conn_id, hb_type }
    }
}

impl WireCodec for ConnKey {
    fn encode_to(&self, enc: &mut Encoder<'_>) {
        enc.put_i32(self.conn_id);
        enc.put_i32(self.hb_type);
    }

    fn decode_from(dec: &mut Decoder<'_>) -> Result<Self> {
        let conn_id = dec.get_i32()?;
        let hb_type = dec.get_i32()?;
        Ok(Self { conn_id, hb_type })
    }
}

/// A connection heartbeat with an open-ended key/value bag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatReq {
    pub conn_key: ConnKey,
    pub info: HashMap<Vec<u8>, Vec<u8>>,
}

impl HeartbeatReq {
    pub fn new(conn_key: ConnKey) -> Self {
        Self {
            conn_key,
            info: HashMap::new(),
        }
    }

    /// Insert an entry, replacing any previous value for the key
    pub fn with_entry(mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }
}

impl WireCodec for HeartbeatReq {
    fn encode_to(&self, enc: &mut Encoder<'_>) {
        self.conn_key.encode_to(enc);
        enc.put_u32(self.info.len() as u32);
        for (key, value) in &self.info {
            KeyValue::encode_parts(enc, key, value);
        }
    }

    fn decode_from(dec: &mut Decoder<'_>) -> Result<Self> {
        let conn_key = ConnKey::decode_from(dec)?;
        let limit = dec.config().max_kv_entries;
        let count = dec.get_count(limit, MIN_KV_SIZE, "heartbeat entry")?;

        let mut info = HashMap::new();
        info.try_reserve(count).map_err(|e| dec.fail(e.into()))?;
        for _ in 0..count {
            let (key, value) = KeyValue::decode_parts(dec)?;
            // A repeated key keeps the last value seen
            info.insert(key.to_vec(), value.to_vec());
        }

        tracing::trace!(conn_id = conn_key.conn_id, entries = info.len(), "decoded heartbeat");

        Ok(Self { conn_key, info })
    }
}

/// Batched heartbeat
///
/// Carries no payload yet: encoding writes nothing and decoding consumes
/// nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatBatchReq;

impl WireCodec for HeartbeatBatchReq {
    fn encode_to(&self, _enc: &mut Encoder<'_>) {}

    fn decode_from(_dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(HeartbeatBatchReq)
    }
}

/// Encode a heartbeat to bytes
pub fn encode_heartbeat_req(req: &HeartbeatReq) -> Bytes {
    req.encode()
}

/// Decode a heartbeat from the front of `bytes`
pub fn decode_heartbeat_req(bytes: &[u8]) -> Result<HeartbeatReq> {
    HeartbeatReq::decode(bytes)
}

/// Encode a heartbeat batch; always empty
pub fn encode_heartbeat_batch_req(req: &HeartbeatBatchReq) -> Bytes {
    req.encode()
}

/// Decode a heartbeat batch, returning the input untouched
pub fn decode_heartbeat_batch_req(bytes: &[u8]) -> Result<(HeartbeatBatchReq, &[u8])> {
    let mut dec = Decoder::new(bytes);
    let req = HeartbeatBatchReq::decode_from(&mut dec)?;
    Ok((req, dec.rest()))
}
