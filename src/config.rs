//! Configuration for tablewire
//!
//! Decode-time limits applied to counts and lengths read off the wire.
//! The codec keeps no state of its own; a `CodecConfig` is handed to each
//! `Decoder` that needs non-default limits.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WireError};

/// Decode limits for untrusted input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    // -------------------------------------------------------------------------
    // Schema Limits
    // -------------------------------------------------------------------------
    /// Max columns in a super or normal table
    pub max_columns: u32,

    /// Max tag columns in a super table
    pub max_tag_columns: u32,

    /// Max bytes in a table name
    pub max_table_name_len: u32,

    /// Max bytes in a column name
    pub max_column_name_len: u32,

    // -------------------------------------------------------------------------
    // Collection Limits
    // -------------------------------------------------------------------------
    /// Max requests in a create-table batch
    pub max_batch_reqs: u32,

    /// Max key-value entries in a heartbeat
    pub max_kv_entries: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_columns: 4096,
            max_tag_columns: 128,
            max_table_name_len: 192,
            max_column_name_len: 64,
            max_batch_reqs: 65536,
            max_kv_entries: 65536,
        }
    }
}

impl CodecConfig {
    /// Create a new config builder
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }

    /// No limits beyond what the input length itself allows
    pub fn unbounded() -> Self {
        Self {
            max_columns: u32::MAX,
            max_tag_columns: u32::MAX,
            max_table_name_len: u32::MAX,
            max_column_name_len: u32::MAX,
            max_batch_reqs: u32::MAX,
            max_kv_entries: u32::MAX,
        }
    }

    /// Reject limits that would make every non-trivial message undecodable
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("max_columns", self.max_columns),
            ("max_table_name_len", self.max_table_name_len),
            ("max_column_name_len", self.max_column_name_len),
            ("max_batch_reqs", self.max_batch_reqs),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(WireError::Config(format!("{} must be greater than 0", name)));
            }
        }
        Ok(())
    }
}

/// Builder for CodecConfig
#[derive(Default)]
pub struct CodecConfigBuilder {
    config: CodecConfig,
}

impl CodecConfigBuilder {
    /// Set the max column count
    pub fn max_columns(mut self, count: u32) -> Self {
        self.config.max_columns = count;
        self
    }

    /// Set the max tag column count
    pub fn max_tag_columns(mut self, count: u32) -> Self {
        self.config.max_tag_columns = count;
        self
    }

    /// Set the max table name length (in bytes)
    pub fn max_table_name_len(mut self, len: u32) -> Self {
        self.config.max_table_name_len = len;
        self
    }

    /// Set the max column name length (in bytes)
    pub fn max_column_name_len(mut self, len: u32) -> Self {
        self.config.max_column_name_len = len;
        self
    }

    /// Set the max number of requests per batch
    pub fn max_batch_reqs(mut self, count: u32) -> Self {
        self.config.max_batch_reqs = count;
        self
    }

    /// Set the max number of heartbeat entries
    pub fn max_kv_entries(mut self, count: u32) -> Self {
        self.config.max_kv_entries = count;
        self
    }

    pub fn build(self) -> Result<CodecConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
