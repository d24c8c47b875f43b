//! Row Module
//!
//! Self-describing rows: a row's total length always comes from its own
//! header, never from the container holding it.
//!
//! ## Row Format
//! ```text
//! Data row
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Kind (1) │ Len (4)  │ Payload (Len - 5)           │   Len counts the whole row
//! └──────────┴──────────┴─────────────────────────────┘
//!
//! KV row
//! ┌──────────┬──────────────────────────────────────────┐
//! │ Kind (1) │ KvRow (its own Len header)               │
//! └──────────┴──────────────────────────────────────────┘
//! ```
//!
//! ## KvRow Format (tag rows)
//! ```text
//! ┌─────────┬───────────┬──────────────────────────────┬──────────┐
//! │ Len (2) │ NCols (2) │ NCols × [ColId (2)|Off (2)]  │ Values   │
//! └─────────┴───────────┴──────────────────────────────┴──────────┘
//! ```
//! Offsets are relative to the start of the value area. A value runs to
//! the next column's offset, the last one to the end of the row.

mod data_row;
mod kv_row;

pub use data_row::{encode_data_row, encode_kv_row, RowKind, RowRef, DATA_ROW_HEADER_SIZE};
pub use kv_row::{KvRow, KvRowBuilder, KvRowRef, KV_ROW_HEADER_SIZE};
