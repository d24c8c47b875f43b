//! Submit Iterator Tests
//!
//! Tests for walking submit messages block by block and blocks row by row.

use tablewire::row::{encode_data_row, encode_kv_row};
use tablewire::submit::{
    SubmitBlkBuilder, SubmitMsgHeader, SUBMIT_BLK_HEADER_SIZE, SUBMIT_MSG_HEADER_SIZE,
};
use tablewire::{KvRow, RowRef, SubmitBlk, SubmitBlkIter, SubmitMsgBuilder, SubmitMsgIter, WireError};

/// Fixed-length row: 8-byte payload + 5-byte header
fn fixed_row(n: u64) -> Vec<u8> {
    encode_data_row(&n.to_le_bytes()).unwrap()
}

fn block(uid: i64, rows: &[Vec<u8>]) -> SubmitBlkBuilder {
    let mut blk = SubmitBlkBuilder::new(uid, uid as i32, 1).schema(b"schema".to_vec());
    for row in rows {
        blk.add_row(row).unwrap();
    }
    blk
}

fn two_block_message() -> Vec<u8> {
    let mut builder = SubmitMsgBuilder::new(3);
    builder.add_block(&block(10, &[fixed_row(1), fixed_row(2)])).unwrap();
    builder.add_block(&block(20, &[fixed_row(3)])).unwrap();
    builder.finish().unwrap().to_vec()
}

/// Hand-built block header + schema + data, with an optional data_len lie
fn raw_block(schema: &[u8], data: &[u8], data_len: Option<i32>) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&1i64.to_le_bytes());
    buf.extend_from_slice(&1i32.to_le_bytes());
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&data_len.unwrap_or(data.len() as i32).to_le_bytes());
    buf.extend_from_slice(&(schema.len() as i32).to_le_bytes());
    buf.extend_from_slice(&0i16.to_le_bytes());
    buf.extend_from_slice(schema);
    buf.extend_from_slice(data);
    buf
}

fn set_length(msg: &mut [u8], length: usize) {
    msg[0..4].copy_from_slice(&(length as u32).to_le_bytes());
}

// =============================================================================
// Message Iterator Tests
// =============================================================================

#[test]
fn test_two_blocks_then_exhausted() {
    let msg = two_block_message();
    let header = SubmitMsgHeader::parse(&msg).unwrap();
    assert_eq!(header.length as usize, msg.len());
    assert_eq!(header.num_of_blocks, 2);
    assert_eq!(header.vg_id, 3);

    let mut iter = SubmitMsgIter::new(&msg).unwrap();
    let first = iter.next().unwrap().unwrap();
    assert_eq!(first.uid(), 10);
    assert_eq!(first.schema(), b"schema");
    assert_eq!(first.num_of_rows(), 2);
    let second = iter.next().unwrap().unwrap();
    assert_eq!(second.uid(), 20);
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}

#[test]
fn test_blocks_are_packed_back_to_back() {
    let msg = two_block_message();
    let total: usize = SubmitMsgIter::new(&msg)
        .unwrap()
        .map(|blk| blk.unwrap().len())
        .sum();
    assert_eq!(SUBMIT_MSG_HEADER_SIZE + total, msg.len());
}

#[test]
fn test_declared_length_beyond_blocks() {
    for extra in 1..=2 * SUBMIT_BLK_HEADER_SIZE {
        let mut msg = two_block_message();
        msg.extend(std::iter::repeat(0u8).take(extra));
        let len = msg.len();
        set_length(&mut msg, len);

        let mut iter = SubmitMsgIter::new(&msg).unwrap();
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().unwrap().is_ok());
        let err = iter.next().unwrap().unwrap_err();
        assert!(matches!(err, WireError::MalformedMessage(_)), "extra={}", extra);
        assert!(iter.next().is_none());
    }
}

#[test]
fn test_declared_length_past_buffer_end() {
    let mut msg = two_block_message();
    let len = msg.len();
    set_length(&mut msg, len + 100);

    let results: Vec<_> = SubmitMsgIter::new(&msg).unwrap().collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(WireError::MalformedMessage(_))));
}

#[test]
fn test_declared_length_cuts_a_block() {
    let mut msg = two_block_message();
    let len = msg.len();
    set_length(&mut msg, len - 1);

    let mut iter = SubmitMsgIter::new(&msg).unwrap();
    assert!(iter.next().unwrap().is_ok());
    assert!(matches!(iter.next(), Some(Err(WireError::MalformedMessage(_)))));
    assert!(iter.next().is_none());
}

#[test]
fn test_block_data_len_overruns_message() {
    let data = fixed_row(1);
    let blk = raw_block(b"", &data, Some(1000));
    let mut msg = vec![0u8; SUBMIT_MSG_HEADER_SIZE];
    msg.extend_from_slice(&blk);
    let len = msg.len();
    set_length(&mut msg, len);

    let mut iter = SubmitMsgIter::new(&msg).unwrap();
    assert!(matches!(iter.next(), Some(Err(WireError::MalformedMessage(_)))));
}

#[test]
fn test_length_not_above_header() {
    let mut msg = vec![0u8; SUBMIT_MSG_HEADER_SIZE];
    set_length(&mut msg, SUBMIT_MSG_HEADER_SIZE);
    assert!(matches!(
        SubmitMsgIter::new(&msg),
        Err(WireError::MalformedMessage(_))
    ));
}

#[test]
fn test_buffer_shorter_than_header() {
    let msg = [40u8, 0, 0, 0, 1];
    assert!(matches!(
        SubmitMsgIter::new(&msg),
        Err(WireError::MalformedMessage(_))
    ));
}

#[test]
fn test_builder_rejects_empty_message_and_block() {
    assert!(SubmitMsgBuilder::new(1).finish().is_err());

    let mut builder = SubmitMsgBuilder::new(1);
    let err = builder.add_block(&SubmitBlkBuilder::new(1, 1, 1)).unwrap_err();
    assert!(matches!(err, WireError::MalformedMessage(_)));
}

#[test]
fn test_builder_rejects_row_with_wrong_length() {
    let mut row = fixed_row(1);
    row.push(0xAA);
    let mut blk = SubmitBlkBuilder::new(1, 1, 1);
    assert!(blk.add_row(&row).is_err());
    assert_eq!(blk.num_of_rows(), 0);
}

// =============================================================================
// Block Iterator Tests
// =============================================================================

#[test]
fn test_three_fixed_rows() {
    let rows = [fixed_row(11), fixed_row(22), fixed_row(33)];
    let data: Vec<u8> = rows.concat();
    let buf = raw_block(b"sch", &data, None);
    let blk = SubmitBlk::parse(&buf).unwrap();
    assert_eq!(blk.header().data_len as usize, 3 * 13);

    let mut iter = SubmitBlkIter::new(&blk).unwrap();
    for expected in &rows {
        let row = iter.next().unwrap().unwrap();
        assert_eq!(row.as_bytes(), &expected[..]);
    }
    assert!(iter.next().is_none());
    assert_eq!(iter.offset(), data.len());
}

#[test]
fn test_zero_data_len_fails_init() {
    let buf = raw_block(b"sch", &[], None);
    let blk = SubmitBlk::parse(&buf).unwrap();
    assert!(blk.is_empty());
    assert!(matches!(
        SubmitBlkIter::new(&blk),
        Err(WireError::MalformedMessage(_))
    ));
    assert!(blk.rows().is_err());
}

#[test]
fn test_row_runs_past_data_len() {
    let mut data = fixed_row(1);
    let second = fixed_row(2);
    data.extend_from_slice(&second[..7]);
    let buf = raw_block(b"", &data, None);
    let blk = SubmitBlk::parse(&buf).unwrap();

    let mut iter = blk.rows().unwrap();
    assert!(iter.next().unwrap().is_ok());
    assert!(matches!(iter.next(), Some(Err(WireError::MalformedMessage(_)))));
    assert!(iter.next().is_none());
}

#[test]
fn test_row_cannot_read_into_next_block() {
    // data_len covers only part of the row; the remainder sits after the block
    let row = fixed_row(9);
    let mut buf = raw_block(b"", &row[..6], None);
    buf.extend_from_slice(&row[6..]);
    let blk = SubmitBlk::parse(&buf).unwrap();

    let mut iter = blk.rows().unwrap();
    assert!(matches!(iter.next(), Some(Err(WireError::MalformedMessage(_)))));
}

#[test]
fn test_zero_length_row_is_an_error() {
    let data = [0x00, 0x00, 0x00, 0x00, 0x00, 0xFF];
    let buf = raw_block(b"", &data, None);
    let blk = SubmitBlk::parse(&buf).unwrap();

    let mut iter = blk.rows().unwrap();
    assert!(matches!(iter.next(), Some(Err(WireError::MalformedMessage(_)))));
    assert!(iter.next().is_none());
}

#[test]
fn test_negative_schema_len() {
    let mut buf = raw_block(b"", &fixed_row(1), None);
    buf[20..24].copy_from_slice(&(-1i32).to_le_bytes());
    assert!(matches!(
        SubmitBlk::parse(&buf),
        Err(WireError::MalformedMessage(_))
    ));
}

#[test]
fn test_mixed_row_kinds() {
    let tags = KvRow::builder().add(1, b"t").build().unwrap();
    let rows = vec![fixed_row(1), encode_kv_row(&tags), encode_data_row(b"variable length").unwrap()];

    let mut builder = SubmitMsgBuilder::new(0);
    builder.add_block(&block(5, &rows)).unwrap();
    let msg = builder.finish().unwrap();

    let blk = SubmitMsgIter::new(&msg).unwrap().next().unwrap().unwrap();
    let parsed: Vec<RowRef<'_>> = blk.rows().unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[1].as_kv_row().unwrap().get(1), Some(&b"t"[..]));
    assert_eq!(parsed[2].payload(), b"variable length");
}
