//! # tablewire
//!
//! Write-path binary codec for a distributed table store:
//! - Create-table requests (super, child and normal tables) and batches
//! - Connection heartbeats with an open key/value bag
//! - Bounded iteration over submitted write batches
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Dispatch / Node Management Layer               │
//! │                (owns buffers and connections)               │
//! └──────────────┬───────────────────────────────┬──────────────┘
//!                │                               │
//!                ▼                               ▼
//!   ┌────────────────────────┐      ┌────────────────────────┐
//!   │        Protocol        │      │         Submit         │
//!   │ create-table, batch,   │      │  message ─► block ─►   │
//!   │ heartbeat              │      │  row iterators         │
//!   └───────────┬────────────┘      └───────────┬────────────┘
//!               │                               │
//!               ▼                               ▼
//!   ┌────────────────────────┐      ┌────────────────────────┐
//!   │         Codec          │◄─────│          Row           │
//!   │ Encoder, Decoder,      │      │ data rows, KV rows     │
//!   │ KeyValue               │      │                        │
//!   └────────────────────────┘      └────────────────────────┘
//! ```
//!
//! Every operation is a pure function of its input buffer. Nothing is
//! shared between calls, so independent messages can be handled on any
//! number of threads.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod codec;
pub mod protocol;
pub mod row;
pub mod submit;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use codec::{Decoder, Encoder, KeyValue, WireCodec};
pub use config::CodecConfig;
pub use error::{Result, WireError};
pub use protocol::{
    Column, ColumnType, ConnKey, CreateTableBatchReq, CreateTableReq, HeartbeatBatchReq,
    HeartbeatReq, TableConfig, TableKind,
};
pub use row::{KvRow, RowRef};
pub use submit::{SubmitBlk, SubmitBlkIter, SubmitMsgBuilder, SubmitMsgIter};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of tablewire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
