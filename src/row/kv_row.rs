//! Key-value rows
//!
//! A KV row packs `(column id, value)` pairs behind a small index so a
//! single column can be located without scanning the values. Child tables
//! carry their tag values in one of these.

use bytes::BytesMut;
use serde::{Deserialize, Serialize};

use crate::codec::{Decoder, Encoder, WireCodec};
use crate::error::{Result, WireError};

/// Len (2) + NCols (2)
pub const KV_ROW_HEADER_SIZE: usize = 4;

/// ColId (2) + Offset (2)
const COL_IDX_SIZE: usize = 4;

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

// =============================================================================
// Borrowed View
// =============================================================================

/// Validated view over a KV row's bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KvRowRef<'a> {
    bytes: &'a [u8],
}

impl<'a> KvRowRef<'a> {
    /// Declared row length, read from the header
    ///
    /// Only the two length bytes need to be present.
    pub fn declared_len(bytes: &[u8]) -> Result<usize> {
        if bytes.len() < 2 {
            return Err(WireError::malformed(format!(
                "KV row header needs 2 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(read_u16(bytes, 0) as usize)
    }

    /// Validate `bytes` as exactly one KV row
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < KV_ROW_HEADER_SIZE {
            return Err(WireError::malformed(format!(
                "KV row shorter than header: {} bytes",
                bytes.len()
            )));
        }

        let len = read_u16(bytes, 0) as usize;
        if len != bytes.len() {
            return Err(WireError::malformed(format!(
                "KV row declares {} bytes, buffer holds {}",
                len,
                bytes.len()
            )));
        }

        let ncols = read_u16(bytes, 2) as usize;
        let value_base = KV_ROW_HEADER_SIZE + ncols * COL_IDX_SIZE;
        if value_base > len {
            return Err(WireError::malformed(format!(
                "KV row index for {} columns overruns {} bytes",
                ncols, len
            )));
        }

        let value_area = len - value_base;
        let mut prev: Option<(i16, usize)> = None;
        for i in 0..ncols {
            let at = KV_ROW_HEADER_SIZE + i * COL_IDX_SIZE;
            let col_id = read_u16(bytes, at) as i16;
            let offset = read_u16(bytes, at + 2) as usize;

            if offset > value_area {
                return Err(WireError::malformed(format!(
                    "KV row column {} offset {} past value area of {} bytes",
                    col_id, offset, value_area
                )));
            }
            if let Some((prev_id, prev_offset)) = prev {
                if col_id <= prev_id || offset < prev_offset {
                    return Err(WireError::malformed(format!(
                        "KV row index out of order at column {}",
                        col_id
                    )));
                }
            }
            prev = Some((col_id, offset));
        }

        Ok(Self { bytes })
    }

    /// Raw row bytes, header included
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Total row length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Number of columns in the row
    pub fn ncols(&self) -> usize {
        read_u16(self.bytes, 2) as usize
    }

    /// A row with no columns
    pub fn is_empty(&self) -> bool {
        self.ncols() == 0
    }

    fn value_base(&self) -> usize {
        KV_ROW_HEADER_SIZE + self.ncols() * COL_IDX_SIZE
    }

    fn entry(&self, i: usize) -> (i16, &'a [u8]) {
        let at = KV_ROW_HEADER_SIZE + i * COL_IDX_SIZE;
        let col_id = read_u16(self.bytes, at) as i16;
        let start = self.value_base() + read_u16(self.bytes, at + 2) as usize;
        let end = if i + 1 < self.ncols() {
            self.value_base() + read_u16(self.bytes, at + COL_IDX_SIZE + 2) as usize
        } else {
            self.bytes.len()
        };
        (col_id, &self.bytes[start..end])
    }

    /// Value of a column, found by binary search on the sorted index
    pub fn get(&self, col_id: i16) -> Option<&'a [u8]> {
        let (mut lo, mut hi) = (0, self.ncols());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let (id, value) = self.entry(mid);
            match id.cmp(&col_id) {
                std::cmp::Ordering::Equal => return Some(value),
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
            }
        }
        None
    }

    /// Iterate `(column id, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (i16, &'a [u8])> + 'a {
        let row = *self;
        (0..row.ncols()).map(move |i| row.entry(i))
    }
}

// =============================================================================
// Owned Row
// =============================================================================

/// Owned, validated KV row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct KvRow {
    bytes: Vec<u8>,
}

impl KvRow {
    /// Start building a row
    pub fn builder() -> KvRowBuilder {
        KvRowBuilder::default()
    }

    /// Borrowed view of this row
    pub fn view(&self) -> KvRowRef<'_> {
        KvRowRef { bytes: &self.bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn ncols(&self) -> usize {
        self.view().ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }

    pub fn get(&self, col_id: i16) -> Option<&[u8]> {
        self.view().get(col_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i16, &[u8])> + '_ {
        self.view().iter()
    }
}

impl TryFrom<Vec<u8>> for KvRow {
    type Error = WireError;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        KvRowRef::parse(&bytes)?;
        Ok(Self { bytes })
    }
}

impl From<KvRow> for Vec<u8> {
    fn from(row: KvRow) -> Self {
        row.bytes
    }
}

impl<'a> From<KvRowRef<'a>> for KvRow {
    fn from(row: KvRowRef<'a>) -> Self {
        Self {
            bytes: row.as_bytes().to_vec(),
        }
    }
}

impl WireCodec for KvRow {
    /// The row is framed by its own length header, so it is written as-is
    fn encode_to(&self, enc: &mut Encoder<'_>) {
        enc.put_raw(&self.bytes);
    }

    fn decode_from(dec: &mut Decoder<'_>) -> Result<Self> {
        let header = dec.peek(2)?;
        let len = read_u16(header, 0) as usize;
        let bytes = dec.take(len)?;
        match KvRowRef::parse(bytes) {
            Ok(row) => Ok(row.into()),
            Err(e) => Err(dec.fail(e)),
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects tag values and packs them into a [`KvRow`]
#[derive(Debug, Default)]
pub struct KvRowBuilder {
    cols: Vec<(i16, Vec<u8>)>,
}

impl KvRowBuilder {
    /// Add a column value; order of calls does not matter
    pub fn add(mut self, col_id: i16, value: impl AsRef<[u8]>) -> Self {
        self.cols.push((col_id, value.as_ref().to_vec()));
        self
    }

    /// Sort by column id and pack
    pub fn build(mut self) -> Result<KvRow> {
        self.cols.sort_by_key(|(id, _)| *id);
        if let Some(pair) = self.cols.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(WireError::malformed(format!(
                "duplicate column {} in KV row",
                pair[0].0
            )));
        }

        let index_len = self.cols.len() * COL_IDX_SIZE;
        let value_len: usize = self.cols.iter().map(|(_, v)| v.len()).sum();
        let total = KV_ROW_HEADER_SIZE + index_len + value_len;
        if total > u16::MAX as usize {
            return Err(WireError::malformed(format!(
                "KV row of {} bytes exceeds {}",
                total,
                u16::MAX
            )));
        }

        let mut buf = BytesMut::with_capacity(total);
        let mut enc = Encoder::new(&mut buf);
        enc.put_u16(total as u16);
        enc.put_u16(self.cols.len() as u16);
        let mut offset = 0usize;
        for (col_id, value) in &self.cols {
            enc.put_i16(*col_id);
            enc.put_u16(offset as u16);
            offset += value.len();
        }
        for (_, value) in &self.cols {
            enc.put_raw(value);
        }

        Ok(KvRow { bytes: buf.to_vec() })
    }
}
