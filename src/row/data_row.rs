//! Submit rows
//!
//! Rows inside a submit block are opaque to the codec except for their
//! header, which says how long the row is.

use bytes::BytesMut;

use crate::codec::Encoder;
use crate::error::{Result, WireError};

use super::kv_row::{KvRow, KvRowRef, KV_ROW_HEADER_SIZE};

/// Kind (1) + Len (4)
pub const DATA_ROW_HEADER_SIZE: usize = 5;

/// Row kind tag, the first byte of every row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RowKind {
    Data = 0x00,
    Kv = 0x01,
}

impl TryFrom<u8> for RowKind {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(RowKind::Data),
            0x01 => Ok(RowKind::Kv),
            other => Err(WireError::malformed(format!(
                "Unknown row kind: 0x{:02x}",
                other
            ))),
        }
    }
}

/// A single row borrowed from a submit block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRef<'a> {
    kind: RowKind,
    /// Exactly the row's bytes, header included
    bytes: &'a [u8],
}

impl<'a> RowRef<'a> {
    /// Total length of the row starting at `buf[0]`, from its header alone
    ///
    /// Fails if the header itself does not fit in `buf` or declares a length
    /// too short to hold the header.
    pub fn total_len(buf: &[u8]) -> Result<usize> {
        let kind_byte = *buf
            .first()
            .ok_or_else(|| WireError::malformed("row header missing"))?;

        match RowKind::try_from(kind_byte)? {
            RowKind::Data => {
                if buf.len() < DATA_ROW_HEADER_SIZE {
                    return Err(WireError::malformed(format!(
                        "data row header needs {} bytes, got {}",
                        DATA_ROW_HEADER_SIZE,
                        buf.len()
                    )));
                }
                let len = u32::from_le_bytes([buf[1], buf[2], buf[3], buf[4]]) as usize;
                if len < DATA_ROW_HEADER_SIZE {
                    return Err(WireError::malformed(format!(
                        "data row declares {} bytes, shorter than its header",
                        len
                    )));
                }
                Ok(len)
            }
            RowKind::Kv => {
                let kv_len = KvRowRef::declared_len(&buf[1..])?;
                if kv_len < KV_ROW_HEADER_SIZE {
                    return Err(WireError::malformed(format!(
                        "KV row declares {} bytes, shorter than its header",
                        kv_len
                    )));
                }
                Ok(1 + kv_len)
            }
        }
    }

    /// Parse the row at the front of `buf`, ignoring anything after it
    pub fn parse(buf: &'a [u8]) -> Result<Self> {
        let len = Self::total_len(buf)?;
        if len > buf.len() {
            return Err(WireError::malformed(format!(
                "row declares {} bytes, only {} available",
                len,
                buf.len()
            )));
        }

        let bytes = &buf[..len];
        let kind = RowKind::try_from(bytes[0])?;
        if kind == RowKind::Kv {
            KvRowRef::parse(&bytes[1..])?;
        }
        Ok(Self { kind, bytes })
    }

    pub fn kind(&self) -> RowKind {
        self.kind
    }

    /// Row length in bytes, header included
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: a parsed row contains at least its header
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Row body after the kind/length header
    pub fn payload(&self) -> &'a [u8] {
        match self.kind {
            RowKind::Data => &self.bytes[DATA_ROW_HEADER_SIZE..],
            RowKind::Kv => &self.bytes[1..],
        }
    }

    /// The KV row inside, for KV-kind rows
    pub fn as_kv_row(&self) -> Option<KvRowRef<'a>> {
        match self.kind {
            RowKind::Kv => KvRowRef::parse(&self.bytes[1..]).ok(),
            RowKind::Data => None,
        }
    }
}

/// Frame an opaque payload as a data row
pub fn encode_data_row(payload: &[u8]) -> Result<Vec<u8>> {
    let len = DATA_ROW_HEADER_SIZE + payload.len();
    let len32 = u32::try_from(len)
        .map_err(|_| WireError::malformed(format!("data row of {} bytes is too large", len)))?;

    let mut buf = BytesMut::with_capacity(len);
    let mut enc = Encoder::new(&mut buf);
    enc.put_u8(RowKind::Data as u8);
    enc.put_u32(len32);
    enc.put_raw(payload);
    Ok(buf.to_vec())
}

/// Frame a KV row as a submit row
pub fn encode_kv_row(row: &KvRow) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(1 + row.len());
    let mut enc = Encoder::new(&mut buf);
    enc.put_u8(RowKind::Kv as u8);
    enc.put_raw(row.as_bytes());
    buf.to_vec()
}
