//! Protocol Module
//!
//! Request messages exchanged between the dispatch layer and the node that
//! owns table metadata.
//!
//! ## Messages
//! - Create-table request: super, child or normal table
//! - Create-table batch: version + ordered requests
//! - Heartbeat: connection key + key/value bag
//! - Heartbeat batch: reserved, carries no payload
//!
//! Integers are little-endian and strings carry a `u32` length prefix; see
//! [`crate::codec`].

mod batch;
mod create_table;
mod heartbeat;

pub use batch::{decode_create_table_batch_req, encode_create_table_batch_req, CreateTableBatchReq};
pub use create_table::{
    decode_create_table_req, encode_create_table_req, Column, ColumnType, CreateTableReq,
    TableConfig, TableKind,
};
pub use heartbeat::{
    decode_heartbeat_batch_req, decode_heartbeat_req, encode_heartbeat_batch_req,
    encode_heartbeat_req, ConnKey, HeartbeatBatchReq, HeartbeatReq,
};
