//! Submit Module
//!
//! Write batches: one submit message carries one block per target table,
//! each block carries that table's rows. Neither the number of blocks nor
//! the number of rows is trusted; traversal relies only on lengths embedded
//! in the buffer, each checked against the enclosing extent before use.
//!
//! ## Message Format
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Header (12 bytes)                                        │
//! │   Length: u32 (4) | VgId: i32 (4) | NumOfBlocks: i32 (4) │
//! ├──────────────────────────────────────────────────────────┤
//! │ Block 1                                                  │
//! │ ┌──────────────────────────────────────────────────────┐ │
//! │ │ Header (26 bytes)                                    │ │
//! │ │   Uid: i64 | Tid: i32 | SVersion: i32                │ │
//! │ │   DataLen: i32 | SchemaLen: i32 | NumOfRows: i16     │ │
//! │ ├──────────────────────────────────────────────────────┤ │
//! │ │ Schema (SchemaLen bytes)                             │ │
//! │ ├──────────────────────────────────────────────────────┤ │
//! │ │ Rows (DataLen bytes, each row self-describing)       │ │
//! │ └──────────────────────────────────────────────────────┘ │
//! ├──────────────────────────────────────────────────────────┤
//! │ Block 2 ...                                              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//! `Length` counts the whole message, header included. Blocks are packed
//! back to back with no padding.

mod builder;
mod iterator;

use crate::codec::Decoder;
use crate::error::{Result, WireError};

pub use builder::{SubmitBlkBuilder, SubmitMsgBuilder};
pub use iterator::{SubmitBlkIter, SubmitMsgIter};

// =============================================================================
// Shared Constants
// =============================================================================

/// Length (4) + VgId (4) + NumOfBlocks (4)
pub const SUBMIT_MSG_HEADER_SIZE: usize = 12;

/// Uid (8) + Tid (4) + SVersion (4) + DataLen (4) + SchemaLen (4) + NumOfRows (2)
pub const SUBMIT_BLK_HEADER_SIZE: usize = 26;

// =============================================================================
// Headers
// =============================================================================

/// Fixed header at the front of a submit message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitMsgHeader {
    /// Total message length, header included
    pub length: u32,
    pub vg_id: i32,
    /// Block count as declared by the sender; not used for traversal
    pub num_of_blocks: i32,
}

impl SubmitMsgHeader {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < SUBMIT_MSG_HEADER_SIZE {
            return Err(WireError::malformed(format!(
                "submit message of {} bytes is shorter than its {} byte header",
                buf.len(),
                SUBMIT_MSG_HEADER_SIZE
            )));
        }
        let mut dec = Decoder::new(buf);
        Ok(Self {
            length: dec.get_u32()?,
            vg_id: dec.get_i32()?,
            num_of_blocks: dec.get_i32()?,
        })
    }
}

/// Fixed header at the front of a submit block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitBlkHeader {
    pub uid: i64,
    pub tid: i32,
    pub sversion: i32,
    pub data_len: i32,
    pub schema_len: i32,
    pub num_of_rows: i16,
}

impl SubmitBlkHeader {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < SUBMIT_BLK_HEADER_SIZE {
            return Err(WireError::malformed(format!(
                "submit block header needs {} bytes, {} available",
                SUBMIT_BLK_HEADER_SIZE,
                buf.len()
            )));
        }
        let mut dec = Decoder::new(buf);
        Ok(Self {
            uid: dec.get_i64()?,
            tid: dec.get_i32()?,
            sversion: dec.get_i32()?,
            data_len: dec.get_i32()?,
            schema_len: dec.get_i32()?,
            num_of_rows: dec.get_i16()?,
        })
    }

    /// Header + schema + data, or `None` if either length is negative
    pub fn block_len(&self) -> Option<usize> {
        let data_len = usize::try_from(self.data_len).ok()?;
        let schema_len = usize::try_from(self.schema_len).ok()?;
        Some(SUBMIT_BLK_HEADER_SIZE + schema_len + data_len)
    }
}

// =============================================================================
// Block View
// =============================================================================

/// One table's write batch, borrowed from a submit message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitBlk<'a> {
    header: SubmitBlkHeader,
    schema: &'a [u8],
    data: &'a [u8],
}

impl<'a> SubmitBlk<'a> {
    /// Parse the block at the front of `buf`
    ///
    /// Checks that the declared schema and data fit inside `buf`; an empty
    /// data section is accepted here and rejected by [`SubmitBlkIter::new`].
    pub fn parse(buf: &'a [u8]) -> Result<Self> {
        let header = SubmitBlkHeader::parse(buf)?;
        let block_len = header.block_len().ok_or_else(|| {
            WireError::malformed(format!(
                "negative block length: data_len={} schema_len={}",
                header.data_len, header.schema_len
            ))
        })?;
        if block_len > buf.len() {
            return Err(WireError::malformed(format!(
                "block declares {} bytes, only {} available",
                block_len,
                buf.len()
            )));
        }

        let schema_end = SUBMIT_BLK_HEADER_SIZE + header.schema_len as usize;
        Ok(Self {
            header,
            schema: &buf[SUBMIT_BLK_HEADER_SIZE..schema_end],
            data: &buf[schema_end..block_len],
        })
    }

    pub fn header(&self) -> &SubmitBlkHeader {
        &self.header
    }

    pub fn uid(&self) -> i64 {
        self.header.uid
    }

    pub fn tid(&self) -> i32 {
        self.header.tid
    }

    pub fn sversion(&self) -> i32 {
        self.header.sversion
    }

    pub fn num_of_rows(&self) -> i16 {
        self.header.num_of_rows
    }

    /// Schema bytes, opaque to the codec
    pub fn schema(&self) -> &'a [u8] {
        self.schema
    }

    /// Packed row bytes
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Total encoded block length, header included
    pub fn len(&self) -> usize {
        SUBMIT_BLK_HEADER_SIZE + self.schema.len() + self.data.len()
    }

    /// True when the block holds no row bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate the rows of this block
    pub fn rows(&self) -> Result<SubmitBlkIter<'a>> {
        SubmitBlkIter::new(self)
    }
}
