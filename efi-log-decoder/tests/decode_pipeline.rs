// End-to-end checks of the public decoding pipeline on synthetic logs
use efi_log_decoder::formats::layout_constants::{
    FULL_DATA_START, MAGIC_COMPACT, MAGIC_STANDARD, STANDARD_FLOATS_PER_ROW,
};
use efi_log_decoder::{
    decode, decompress, dlz, identify, ChannelMap, ContainerKind, DecoderConfig, DecoderError,
    LogFile, Variant,
};

const STRIDE: usize = STANDARD_FLOATS_PER_ROW * 4;

fn put_f32(data: &mut [u8], offset: usize, value: f32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn standard_header(len: usize, version_field: u32) -> Vec<u8> {
    let mut data = vec![0u8; len];
    data[0..4].copy_from_slice(&MAGIC_STANDARD.to_le_bytes());
    data[8..12].copy_from_slice(&version_field.to_le_bytes());
    data
}

/// Run-length encode with the container's scheme (test-only; the library
/// only decodes)
fn rle_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let value = data[i];
        let mut run = 1;
        while i + run < data.len() && data[i + run] == value && run < 255 {
            run += 1;
        }
        if run >= 3 || value == 0xFF {
            out.extend_from_slice(&[0xFF, run as u8, value]);
        } else {
            out.extend(std::iter::repeat(value).take(run));
        }
        i += run;
    }
    out
}

fn compress(expanded: &[u8]) -> Vec<u8> {
    dlz::byte_swap(&rle_encode(&dlz::byte_swap(expanded)))
}

#[test]
fn full_layout_end_to_end() {
    let mut data = standard_header(FULL_DATA_START + 2 * STRIDE, 6);
    put_f32(&mut data, FULL_DATA_START, 2500.0);
    // Filler slot between channels 0 and 1 must be skipped
    put_f32(&mut data, FULL_DATA_START + 4, 999.0);
    put_f32(&mut data, FULL_DATA_START + 8, 37.5);

    let descriptor = identify(&data).unwrap();
    assert_eq!(descriptor.variant(), Variant::Full);
    assert_eq!(descriptor.data_start(), FULL_DATA_START);
    assert!(descriptor.interleaved());

    let table = decode(&data, &descriptor, None);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.channel_count(), 516);
    assert_eq!(table.get(0, 0), Some(2500.0));
    assert_eq!(table.get(0, 1), Some(37.5));
    assert_eq!(table.columns()[1], "Param_001");
}

#[test]
fn trailing_cells_are_missing_not_errors() {
    let data = standard_header(FULL_DATA_START + 3 * STRIDE, 6);
    let descriptor = identify(&data).unwrap();
    assert_eq!(descriptor.row_count(), 3);

    // The last channel of an interleaved row reads one slot past the row; in
    // the final row that slot is past the end of the buffer.
    let table = decode(&data, &descriptor, None);
    assert_eq!(table.get(1, 515), Some(0.0));
    assert_eq!(table.get(2, 514), Some(0.0));
    assert!(table.row(2).unwrap()[515].is_none());
    assert_eq!(table.missing_count(), 1);

    // Decoding a truncated copy with the original layout keeps the row count
    // and marks everything past the cut as missing.
    let cut = data.len() - STRIDE / 2;
    let table = decode(&data[..cut], &descriptor, None);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.get(2, 0), Some(0.0));
    assert!(table.row(2).unwrap()[400..].iter().all(Option::is_none));
}

#[test]
fn sparse_logs_never_produce_a_table() {
    let data = standard_header(FULL_DATA_START + 2 * STRIDE, 5);
    assert!(matches!(
        identify(&data),
        Err(DecoderError::UnsupportedSparse { version_field: 5 })
    ));

    let result = LogFile::from_bytes(data, ContainerKind::Expanded, &DecoderConfig::new());
    match result {
        Err(e @ DecoderError::UnsupportedSparse { .. }) => {
            assert!(e.to_string().contains("vendor EFI software"));
        }
        other => panic!("expected UnsupportedSparse, got {:?}", other.map(|l| l.descriptor().clone())),
    }
}

#[test]
fn compressed_log_round_trips_through_the_pipeline() {
    let mut expanded = standard_header(FULL_DATA_START + 4 * STRIDE, 6);
    expanded[32..FULL_DATA_START].fill(0xFE);
    for row in 0..4 {
        let base = FULL_DATA_START + row * STRIDE;
        put_f32(&mut expanded, base, row as f32);
        put_f32(&mut expanded, base + 16, 3000.0 + 10.0 * row as f32);
    }

    let compressed = compress(&expanded);
    assert!(compressed.len() < expanded.len());
    assert_eq!(compressed[0..4], MAGIC_STANDARD.to_le_bytes());
    assert_eq!(decompress(&compressed), expanded);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pass.dlz");
    std::fs::write(&path, &compressed).unwrap();

    let log = LogFile::open(&path, &DecoderConfig::new()).unwrap();
    assert!(log.was_compressed());

    let table = log.decode(Some(&ChannelMap::common()));
    assert_eq!(table.row_count(), 4);
    let rpm: Vec<f32> = table.column_by_name("RPM").unwrap().flatten().collect();
    assert_eq!(rpm, vec![3000.0, 3010.0, 3020.0, 3030.0]);
}

#[test]
fn compact_log_with_channel_map() {
    let data_start = 2000;
    let stride = 516 * 4;
    let mut data = vec![0u8; data_start + 3 * stride];
    data[0..4].copy_from_slice(&MAGIC_COMPACT.to_le_bytes());
    data[8..12].copy_from_slice(&3u32.to_le_bytes());
    for row in 0..3 {
        put_f32(&mut data, data_start + row * stride + 2 * 4, 800.0 + row as f32);
        put_f32(&mut data, data_start + row * stride + 10 * 4, 14.7);
    }

    let descriptor = identify(&data).unwrap();
    assert_eq!(descriptor.variant(), Variant::Compact);
    assert_eq!(descriptor.data_start(), data_start);
    assert!(!descriptor.interleaved());

    let names = ChannelMap::from_json_str(
        r#"{"channels":[{"slot":2,"name":"RPM","unit":"rpm"},{"slot":10,"name":"AFR"}]}"#,
    )
    .unwrap();
    let table = decode(&data, &descriptor, Some(&names));

    assert_eq!(table.channel_count(), 516);
    assert_eq!(table.get(2, 2), Some(802.0));
    assert_eq!(table.column_index("AFR"), Some(10));
    assert_eq!(table.missing_count(), 0);
}

#[test]
fn unknown_magic_fails_closed() {
    let mut data = vec![0u8; 64];
    data[0..4].copy_from_slice(b"MLVL");
    assert!(matches!(
        identify(&data),
        Err(DecoderError::UnknownFormat { .. })
    ));
}
