//! Submit iterators
//!
//! `SubmitMsgIter` walks the blocks of a message, `SubmitBlkIter` walks the
//! rows of a block. Both yield `Result`s: `None` means the sequence ended
//! cleanly, `Some(Err(_))` means the buffer is structurally broken. After an
//! error the iterator is finished and only returns `None`.

use crate::error::{Result, WireError};
use crate::row::RowRef;

use super::{SubmitBlk, SubmitMsgHeader, SUBMIT_BLK_HEADER_SIZE, SUBMIT_MSG_HEADER_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IterState {
    /// No block returned yet
    Start,
    /// Last returned block spans `offset..offset + len`
    InProgress { len: usize },
    Done,
    Failed,
}

// =============================================================================
// Message Iterator
// =============================================================================

/// Iterator over the blocks of a submit message
pub struct SubmitMsgIter<'a> {
    buf: &'a [u8],
    header: SubmitMsgHeader,
    /// Declared message length
    total_len: usize,
    /// Start of the current block
    offset: usize,
    state: IterState,
}

impl<'a> SubmitMsgIter<'a> {
    /// Start iterating a submit message
    ///
    /// Fails unless the declared length is larger than the header, i.e. the
    /// message has room for at least one block.
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        let header = SubmitMsgHeader::parse(buf)?;
        let total_len = header.length as usize;
        if total_len <= SUBMIT_MSG_HEADER_SIZE {
            tracing::debug!(total_len, "submit message has no room for blocks");
            return Err(WireError::malformed(format!(
                "submit message length {} must exceed header size {}",
                total_len, SUBMIT_MSG_HEADER_SIZE
            )));
        }

        Ok(Self {
            buf,
            header,
            total_len,
            offset: 0,
            state: IterState::Start,
        })
    }

    pub fn header(&self) -> &SubmitMsgHeader {
        &self.header
    }

    fn fail(&mut self, err: WireError) -> Option<Result<SubmitBlk<'a>>> {
        tracing::debug!(
            offset = self.offset,
            total_len = self.total_len,
            error = %err,
            "malformed submit message"
        );
        self.state = IterState::Failed;
        Some(Err(err))
    }

    /// Parse and bounds-check the block starting at `self.offset`
    fn block_at_offset(&self) -> Result<SubmitBlk<'a>> {
        // Never look past the declared length or the real buffer end
        let end = self.total_len.min(self.buf.len());
        if self.offset + SUBMIT_BLK_HEADER_SIZE > end {
            return Err(WireError::malformed(format!(
                "block header at offset {} overruns message end {}",
                self.offset, end
            )));
        }

        let blk = SubmitBlk::parse(&self.buf[self.offset..end])?;
        if blk.header().data_len <= 0 {
            return Err(WireError::malformed(format!(
                "block at offset {} has data_len {}",
                self.offset,
                blk.header().data_len
            )));
        }
        Ok(blk)
    }
}

impl<'a> Iterator for SubmitMsgIter<'a> {
    type Item = Result<SubmitBlk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let next_offset = match self.state {
            IterState::Done | IterState::Failed => return None,
            IterState::Start => SUBMIT_MSG_HEADER_SIZE,
            IterState::InProgress { len } => self.offset + len,
        };
        self.offset = next_offset;

        if self.offset > self.total_len {
            let err = WireError::malformed(format!(
                "next block offset {} exceeds message length {}",
                self.offset, self.total_len
            ));
            return self.fail(err);
        }
        if self.offset == self.total_len {
            self.state = IterState::Done;
            return None;
        }

        match self.block_at_offset() {
            Ok(blk) => {
                tracing::trace!(
                    offset = self.offset,
                    uid = blk.uid(),
                    len = blk.len(),
                    "submit block"
                );
                self.state = IterState::InProgress { len: blk.len() };
                Some(Ok(blk))
            }
            Err(err) => self.fail(err),
        }
    }
}

// =============================================================================
// Block Iterator
// =============================================================================

/// Iterator over the rows of one submit block
pub struct SubmitBlkIter<'a> {
    data: &'a [u8],
    /// Bytes consumed so far
    offset: usize,
    finished: bool,
}

impl<'a> SubmitBlkIter<'a> {
    /// Start iterating a block's rows; the block must have `data_len > 0`
    pub fn new(blk: &SubmitBlk<'a>) -> Result<Self> {
        let data_len = blk.header().data_len;
        if data_len <= 0 {
            tracing::debug!(uid = blk.uid(), data_len, "submit block has no rows");
            return Err(WireError::malformed(format!(
                "submit block data_len must be positive, got {}",
                data_len
            )));
        }

        Ok(Self {
            data: blk.data(),
            offset: 0,
            finished: false,
        })
    }

    /// Bytes of row data consumed so far
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for SubmitBlkIter<'a> {
    type Item = Result<RowRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.offset >= self.data.len() {
            self.finished = true;
            return None;
        }

        // The row may only use what is left of data_len
        match RowRef::parse(&self.data[self.offset..]) {
            Ok(row) => {
                self.offset += row.len();
                Some(Ok(row))
            }
            Err(e) => {
                tracing::debug!(
                    offset = self.offset,
                    data_len = self.data.len(),
                    error = %e,
                    "truncated or corrupt row"
                );
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
