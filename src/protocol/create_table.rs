//! Create-table requests
//!
//! A request creates exactly one of three kinds of table. Each kind carries
//! only its own fields, so a super table can never be built with a child
//! table's tag row and vice versa.

use serde::{Deserialize, Serialize};

use crate::codec::{Decoder, Encoder, WireCodec, LEN_PREFIX_SIZE};
use crate::error::{Result, WireError};
use crate::row::KvRow;

/// Type (1) + ColId (4) + Bytes (4) + empty name (4)
pub(crate) const MIN_COLUMN_SIZE: usize = 1 + 4 + 4 + LEN_PREFIX_SIZE;

/// Version (8) + empty name (4) + TTL (4) + Keep (4) + Kind (1)
pub(crate) const MIN_CREATE_TABLE_REQ_SIZE: usize = 8 + LEN_PREFIX_SIZE + 4 + 4 + 1;

// =============================================================================
// Columns
// =============================================================================

/// Column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ColumnType {
    Null = 0,
    Bool = 1,
    TinyInt = 2,
    SmallInt = 3,
    Int = 4,
    BigInt = 5,
    Float = 6,
    Double = 7,
    Binary = 8,
    Timestamp = 9,
    NChar = 10,
    UTinyInt = 11,
    USmallInt = 12,
    UInt = 13,
    UBigInt = 14,
    Json = 15,
}

impl ColumnType {
    /// Byte width for fixed-size types, `None` for variable-length ones
    pub fn fixed_width(&self) -> Option<i32> {
        match self {
            ColumnType::Null | ColumnType::Bool | ColumnType::TinyInt | ColumnType::UTinyInt => {
                Some(1)
            }
            ColumnType::SmallInt | ColumnType::USmallInt => Some(2),
            ColumnType::Int | ColumnType::UInt | ColumnType::Float => Some(4),
            ColumnType::BigInt
            | ColumnType::UBigInt
            | ColumnType::Double
            | ColumnType::Timestamp => Some(8),
            ColumnType::Binary | ColumnType::NChar | ColumnType::Json => None,
        }
    }
}

impl TryFrom<u8> for ColumnType {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self> {
        let ty = match value {
            0 => ColumnType::Null,
            1 => ColumnType::Bool,
            2 => ColumnType::TinyInt,
            3 => ColumnType::SmallInt,
            4 => ColumnType::Int,
            5 => ColumnType::BigInt,
            6 => ColumnType::Float,
            7 => ColumnType::Double,
            8 => ColumnType::Binary,
            9 => ColumnType::Timestamp,
            10 => ColumnType::NChar,
            11 => ColumnType::UTinyInt,
            12 => ColumnType::USmallInt,
            13 => ColumnType::UInt,
            14 => ColumnType::UBigInt,
            15 => ColumnType::Json,
            other => {
                return Err(WireError::malformed(format!(
                    "Unknown column type: {}",
                    other
                )))
            }
        };
        Ok(ty)
    }
}

/// A column or tag-column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub col_type: ColumnType,
    pub col_id: i32,
    /// Byte width of a value
    pub bytes: i32,
    pub name: String,
}

impl Column {
    pub fn new(col_type: ColumnType, col_id: i32, bytes: i32, name: impl Into<String>) -> Self {
        Self {
            col_type,
            col_id,
            bytes,
            name: name.into(),
        }
    }
}

impl WireCodec for Column {
    fn encode_to(&self, enc: &mut Encoder<'_>) {
        enc.put_u8(self.col_type as u8);
        enc.put_i32(self.col_id);
        enc.put_i32(self.bytes);
        enc.put_str(&self.name);
    }

    fn decode_from(dec: &mut Decoder<'_>) -> Result<Self> {
        let type_byte = dec.get_u8()?;
        let col_type = ColumnType::try_from(type_byte).map_err(|e| dec.fail(e))?;
        let col_id = dec.get_i32()?;
        let bytes = dec.get_i32()?;
        let max_name_len = dec.config().max_column_name_len;
        let name = dec.get_string(max_name_len, "column name")?;
        Ok(Self {
            col_type,
            col_id,
            bytes,
            name,
        })
    }
}

fn encode_columns(enc: &mut Encoder<'_>, columns: &[Column]) {
    enc.put_u32(columns.len() as u32);
    for col in columns {
        col.encode_to(enc);
    }
}

/// Count-prefixed column group; the count is checked before anything is
/// allocated, and a failure part-way drops the columns already read
fn decode_columns(dec: &mut Decoder<'_>, limit: u32, what: &str) -> Result<Vec<Column>> {
    let count = dec.get_count(limit, MIN_COLUMN_SIZE, what)?;
    let mut columns = Vec::new();
    columns
        .try_reserve_exact(count)
        .map_err(|e| dec.fail(e.into()))?;
    for _ in 0..count {
        columns.push(Column::decode_from(dec)?);
    }
    Ok(columns)
}

// =============================================================================
// Table Kinds
// =============================================================================

/// Wire tag for the kind of table being created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TableKind {
    Super = 0,
    Child = 1,
    Normal = 2,
}

impl TryFrom<u8> for TableKind {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(TableKind::Super),
            1 => Ok(TableKind::Child),
            2 => Ok(TableKind::Normal),
            other => Err(WireError::InvalidTableKind(other)),
        }
    }
}

/// Kind-specific part of a create-table request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableConfig {
    /// Schema template shared by child tables
    Super {
        suid: u64,
        columns: Vec<Column>,
        tags: Vec<Column>,
    },

    /// Instance of a super table, identified by its tag values
    Child { suid: u64, tag_row: KvRow },

    /// Standalone table
    Normal { columns: Vec<Column> },
}

impl TableConfig {
    pub fn kind(&self) -> TableKind {
        match self {
            TableConfig::Super { .. } => TableKind::Super,
            TableConfig::Child { .. } => TableKind::Child,
            TableConfig::Normal { .. } => TableKind::Normal,
        }
    }
}

// =============================================================================
// Request
// =============================================================================

/// Request to create one table
///
/// Wire format:
/// ```text
/// ┌─────────┬──────┬─────────┬──────────┬──────────┬──────────────────┐
/// │ Ver (8) │ Name │ TTL (4) │ Keep (4) │ Kind (1) │ Kind payload     │
/// └─────────┴──────┴─────────┴──────────┴──────────┴──────────────────┘
/// Super:  SUid (8) | NCols (4) | Columns | NTags (4) | Tag columns
/// Child:  SUid (8) | KvRow
/// Normal: NCols (4) | Columns
/// Column: Type (1) | ColId (4) | Bytes (4) | Name
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTableReq {
    pub version: u64,
    pub name: String,
    pub ttl: u32,
    pub keep: u32,
    pub config: TableConfig,
}

impl CreateTableReq {
    /// Create a request with zero version, ttl and keep
    pub fn new(name: impl Into<String>, config: TableConfig) -> Self {
        Self {
            version: 0,
            name: name.into(),
            ttl: 0,
            keep: 0,
            config,
        }
    }

    pub fn super_table(name: impl Into<String>, suid: u64, columns: Vec<Column>, tags: Vec<Column>) -> Self {
        Self::new(name, TableConfig::Super { suid, columns, tags })
    }

    pub fn child_table(name: impl Into<String>, suid: u64, tag_row: KvRow) -> Self {
        Self::new(name, TableConfig::Child { suid, tag_row })
    }

    pub fn normal_table(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self::new(name, TableConfig::Normal { columns })
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_keep(mut self, keep: u32) -> Self {
        self.keep = keep;
        self
    }

    pub fn kind(&self) -> TableKind {
        self.config.kind()
    }
}

impl WireCodec for CreateTableReq {
    fn encode_to(&self, enc: &mut Encoder<'_>) {
        enc.put_u64(self.version);
        enc.put_str(&self.name);
        enc.put_u32(self.ttl);
        enc.put_u32(self.keep);
        enc.put_u8(self.kind() as u8);

        match &self.config {
            TableConfig::Super { suid, columns, tags } => {
                enc.put_u64(*suid);
                encode_columns(enc, columns);
                encode_columns(enc, tags);
            }
            TableConfig::Child { suid, tag_row } => {
                enc.put_u64(*suid);
                tag_row.encode_to(enc);
            }
            TableConfig::Normal { columns } => {
                encode_columns(enc, columns);
            }
        }
    }

    fn decode_from(dec: &mut Decoder<'_>) -> Result<Self> {
        let version = dec.get_u64()?;
        let max_name_len = dec.config().max_table_name_len;
        let name = dec.get_string(max_name_len, "table name")?;
        let ttl = dec.get_u32()?;
        let keep = dec.get_u32()?;
        let kind_byte = dec.get_u8()?;
        let kind = TableKind::try_from(kind_byte).map_err(|e| dec.fail(e))?;

        let config = match kind {
            TableKind::Super => {
                let suid = dec.get_u64()?;
                let max_columns = dec.config().max_columns;
                let columns = decode_columns(dec, max_columns, "column")?;
                let max_tags = dec.config().max_tag_columns;
                let tags = decode_columns(dec, max_tags, "tag column")?;
                TableConfig::Super { suid, columns, tags }
            }
            TableKind::Child => {
                let suid = dec.get_u64()?;
                let tag_row = KvRow::decode_from(dec)?;
                TableConfig::Child { suid, tag_row }
            }
            TableKind::Normal => {
                let max_columns = dec.config().max_columns;
                let columns = decode_columns(dec, max_columns, "column")?;
                TableConfig::Normal { columns }
            }
        };

        tracing::trace!(table = %name, kind = ?kind, version, "decoded create-table request");

        Ok(Self {
            version,
            name,
            ttl,
            keep,
            config,
        })
    }
}

// =============================================================================
// One-shot helpers
// =============================================================================

/// Encode a create-table request to bytes
pub fn encode_create_table_req(req: &CreateTableReq) -> bytes::Bytes {
    req.encode()
}

/// Decode a create-table request from the front of `bytes`
pub fn decode_create_table_req(bytes: &[u8]) -> Result<CreateTableReq> {
    CreateTableReq::decode(bytes)
}
