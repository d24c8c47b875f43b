//! Create-table batches
//!
//! Format: version (8) + count (4) + count × create-table request.
//! Order is preserved in both directions, and one bad element fails the
//! whole batch.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::codec::{Decoder, Encoder, WireCodec};
use crate::error::Result;

use super::create_table::{CreateTableReq, MIN_CREATE_TABLE_REQ_SIZE};

/// An ordered batch of create-table requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTableBatchReq {
    pub version: u64,
    pub reqs: Vec<CreateTableReq>,
}

impl CreateTableBatchReq {
    pub fn new(version: u64, reqs: Vec<CreateTableReq>) -> Self {
        Self { version, reqs }
    }

    pub fn len(&self) -> usize {
        self.reqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reqs.is_empty()
    }
}

impl WireCodec for CreateTableBatchReq {
    fn encode_to(&self, enc: &mut Encoder<'_>) {
        enc.put_u64(self.version);
        enc.put_u32(self.reqs.len() as u32);
        for req in &self.reqs {
            req.encode_to(enc);
        }
    }

    fn decode_from(dec: &mut Decoder<'_>) -> Result<Self> {
        let version = dec.get_u64()?;
        let limit = dec.config().max_batch_reqs;
        let count = dec.get_count(limit, MIN_CREATE_TABLE_REQ_SIZE, "batch request")?;

        let mut reqs = Vec::new();
        reqs.try_reserve_exact(count).map_err(|e| dec.fail(e.into()))?;
        for i in 0..count {
            match CreateTableReq::decode_from(dec) {
                Ok(req) => reqs.push(req),
                Err(e) => {
                    tracing::debug!(index = i, count, error = %e, "batch element failed to decode");
                    return Err(e);
                }
            }
        }

        Ok(Self { version, reqs })
    }
}

/// Encode a create-table batch to bytes
pub fn encode_create_table_batch_req(batch: &CreateTableBatchReq) -> Bytes {
    batch.encode()
}

/// Decode a create-table batch from the front of `bytes`
pub fn decode_create_table_batch_req(bytes: &[u8]) -> Result<CreateTableBatchReq> {
    CreateTableBatchReq::decode(bytes)
}
