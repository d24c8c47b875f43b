//! Batch Codec Tests
//!
//! Tests for create-table batch encoding/decoding.

use tablewire::protocol::{decode_create_table_batch_req, encode_create_table_batch_req};
use tablewire::{
    CodecConfig, Column, ColumnType, CreateTableBatchReq, CreateTableReq, Decoder, KvRow,
    TableKind, WireCodec, WireError,
};

fn mixed_batch() -> CreateTableBatchReq {
    let tags = KvRow::builder().add(3, b"rack-12").build().unwrap();
    CreateTableBatchReq::new(
        42,
        vec![
            CreateTableReq::super_table(
                "cpu",
                100,
                vec![
                    Column::new(ColumnType::Timestamp, 1, 8, "ts"),
                    Column::new(ColumnType::Double, 2, 8, "usage"),
                ],
                vec![Column::new(ColumnType::Binary, 3, 32, "host")],
            ),
            CreateTableReq::child_table("cpu_host1", 100, tags),
            CreateTableReq::normal_table(
                "events",
                vec![Column::new(ColumnType::Timestamp, 1, 8, "ts")],
            )
            .with_ttl(7),
        ],
    )
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_mixed_batch_roundtrip_preserves_order() {
    let batch = mixed_batch();
    let decoded = decode_create_table_batch_req(&encode_create_table_batch_req(&batch)).unwrap();

    assert_eq!(decoded.version, 42);
    assert_eq!(decoded.len(), 3);
    let kinds: Vec<TableKind> = decoded.reqs.iter().map(|r| r.kind()).collect();
    assert_eq!(kinds, vec![TableKind::Super, TableKind::Child, TableKind::Normal]);
    let names: Vec<&str> = decoded.reqs.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["cpu", "cpu_host1", "events"]);
    assert_eq!(decoded, batch);
}

#[test]
fn test_empty_batch() {
    let batch = CreateTableBatchReq::new(1, vec![]);
    let encoded = batch.encode();
    assert_eq!(encoded.len(), 12);

    let decoded = CreateTableBatchReq::decode(&encoded).unwrap();
    assert!(decoded.is_empty());
    assert_eq!(decoded.version, 1);
}

#[test]
fn test_wire_format_batch_header() {
    let batch = mixed_batch();
    let encoded = batch.encode();

    assert_eq!(&encoded[0..8], &42u64.to_le_bytes());
    assert_eq!(&encoded[8..12], &3u32.to_le_bytes());
    assert_eq!(&encoded[12..], &batch.reqs[0].encode()[..]);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_bad_element_fails_whole_batch() {
    let batch = mixed_batch();
    let mut encoded = batch.encode().to_vec();

    // Kind byte of the second element: header + first element + fixed prefix
    let second = 12 + batch.reqs[0].encoded_len();
    let kind_at = second + 8 + 4 + "cpu_host1".len() + 4 + 4;
    assert_eq!(encoded[kind_at], TableKind::Child as u8);
    encoded[kind_at] = 9;

    let err = CreateTableBatchReq::decode(&encoded).unwrap_err();
    assert_eq!(err, WireError::InvalidTableKind(9));
}

#[test]
fn test_count_beyond_elements() {
    let batch = mixed_batch();
    let mut encoded = batch.encode().to_vec();
    encoded[8..12].copy_from_slice(&4u32.to_le_bytes());

    let err = CreateTableBatchReq::decode(&encoded).unwrap_err();
    assert!(matches!(err, WireError::TruncatedInput { .. }));
}

#[test]
fn test_hostile_count_rejected_before_allocation() {
    let mut buf = 0u64.to_le_bytes().to_vec();
    buf.extend_from_slice(&u32::MAX.to_le_bytes());

    let mut dec = Decoder::with_config(&buf, CodecConfig::unbounded());
    let err = CreateTableBatchReq::decode_from(&mut dec).unwrap_err();
    assert!(matches!(err, WireError::TruncatedInput { .. }));

    let err = CreateTableBatchReq::decode(&buf).unwrap_err();
    assert!(matches!(err, WireError::MalformedMessage(_)));
}

#[test]
fn test_batch_limit_from_config() {
    let config = CodecConfig::builder().max_batch_reqs(2).build().unwrap();
    let encoded = mixed_batch().encode();
    let mut dec = Decoder::with_config(&encoded, config);
    assert!(matches!(
        CreateTableBatchReq::decode_from(&mut dec),
        Err(WireError::MalformedMessage(_))
    ));
}
