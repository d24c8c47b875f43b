//! Submit message builder
//!
//! Packs per-table rows into a submit message the iterators can walk.

use bytes::{Bytes, BytesMut};

use crate::codec::Encoder;
use crate::error::{Result, WireError};
use crate::row::RowRef;

use super::SUBMIT_MSG_HEADER_SIZE;

/// Collects one table's rows
#[derive(Debug, Clone)]
pub struct SubmitBlkBuilder {
    uid: i64,
    tid: i32,
    sversion: i32,
    schema: Vec<u8>,
    data: Vec<u8>,
    num_of_rows: usize,
}

impl SubmitBlkBuilder {
    pub fn new(uid: i64, tid: i32, sversion: i32) -> Self {
        Self {
            uid,
            tid,
            sversion,
            schema: Vec::new(),
            data: Vec::new(),
            num_of_rows: 0,
        }
    }

    /// Attach opaque schema bytes
    pub fn schema(mut self, schema: impl Into<Vec<u8>>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Append one encoded row; its header must describe exactly `row`
    pub fn add_row(&mut self, row: &[u8]) -> Result<()> {
        let parsed = RowRef::parse(row)?;
        if parsed.len() != row.len() {
            return Err(WireError::malformed(format!(
                "row header declares {} bytes, {} supplied",
                parsed.len(),
                row.len()
            )));
        }
        self.data.extend_from_slice(row);
        self.num_of_rows += 1;
        Ok(())
    }

    pub fn num_of_rows(&self) -> usize {
        self.num_of_rows
    }

    fn write_to(&self, enc: &mut Encoder<'_>) -> Result<()> {
        if self.data.is_empty() {
            return Err(WireError::malformed(format!(
                "submit block for uid {} has no rows",
                self.uid
            )));
        }
        let data_len = i32::try_from(self.data.len())
            .map_err(|_| WireError::malformed("submit block data too large"))?;
        let schema_len = i32::try_from(self.schema.len())
            .map_err(|_| WireError::malformed("submit block schema too large"))?;
        let num_of_rows = i16::try_from(self.num_of_rows)
            .map_err(|_| WireError::malformed("too many rows in submit block"))?;

        enc.put_i64(self.uid);
        enc.put_i32(self.tid);
        enc.put_i32(self.sversion);
        enc.put_i32(data_len);
        enc.put_i32(schema_len);
        enc.put_i16(num_of_rows);
        enc.put_raw(&self.schema);
        enc.put_raw(&self.data);
        Ok(())
    }
}

/// Builds a submit message from blocks
///
/// Writes a placeholder header on creation; `finish()` patches the total
/// length and block count.
pub struct SubmitMsgBuilder {
    buf: BytesMut,
    num_of_blocks: i32,
}

impl SubmitMsgBuilder {
    pub fn new(vg_id: i32) -> Self {
        let mut buf = BytesMut::with_capacity(SUBMIT_MSG_HEADER_SIZE);
        let mut enc = Encoder::new(&mut buf);
        enc.put_u32(0); // Placeholder for length
        enc.put_i32(vg_id);
        enc.put_i32(0); // Placeholder for block count
        Self {
            buf,
            num_of_blocks: 0,
        }
    }

    /// Append a block; blocks are laid out in the order they are added
    pub fn add_block(&mut self, blk: &SubmitBlkBuilder) -> Result<()> {
        // Encode into a scratch buffer so a rejected block leaves no trace
        let mut scratch = BytesMut::new();
        blk.write_to(&mut Encoder::new(&mut scratch))?;
        self.buf.extend_from_slice(&scratch);
        self.num_of_blocks += 1;
        Ok(())
    }

    /// Patch the header and return the finished message
    pub fn finish(mut self) -> Result<Bytes> {
        if self.num_of_blocks == 0 {
            return Err(WireError::malformed("submit message has no blocks"));
        }
        let length = u32::try_from(self.buf.len())
            .map_err(|_| WireError::malformed("submit message too large"))?;

        self.buf[0..4].copy_from_slice(&length.to_le_bytes());
        self.buf[8..12].copy_from_slice(&self.num_of_blocks.to_le_bytes());

        tracing::trace!(length, blocks = self.num_of_blocks, "built submit message");
        Ok(self.buf.freeze())
    }
}
