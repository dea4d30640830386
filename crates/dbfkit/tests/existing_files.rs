#![cfg(feature = "table")]

use chrono::NaiveDate;
use dbfkit::charset::Charset;
use dbfkit::codec::{CodecError, ColumnType, Version};
use dbfkit::table::{Phase, Table, TableError};

fn descriptor(name: &[u8], type_byte: u8, length: u8, decimals: u8) -> [u8; 32] {
    let mut raw = [0u8; 32];
    raw[..name.len()].copy_from_slice(name);
    raw[11] = type_byte;
    raw[16] = length;
    raw[17] = decimals;
    raw
}

/// A file written by another tool: memo signature, leftover name bytes,
/// one deleted record and a trailing EOF marker.
fn foreign_file() -> Vec<u8> {
    let columns = [
        descriptor(b"ID", b'N', 4, 0),
        descriptor(b"KALB\0\0NR4", b'C', 8, 0),
        descriptor(b"DAY", b'D', 8, 0),
        descriptor(b"OK", b'L', 1, 0),
        descriptor(b"PRICE", b'N', 7, 2),
    ];
    let header_size: u16 = 32 + 32 * columns.len() as u16 + 1;
    let record_size: u16 = 1 + 4 + 8 + 8 + 1 + 7;

    let mut file = vec![0x83, 123, 1, 15];
    file.extend_from_slice(&2u32.to_le_bytes());
    file.extend_from_slice(&header_size.to_le_bytes());
    file.extend_from_slice(&record_size.to_le_bytes());
    file.resize(32, 0);
    file[29] = 0x02;
    for column in &columns {
        file.extend_from_slice(column);
    }
    file.push(0x0D);

    file.extend_from_slice(b"   17Anna\0xyz20230115T  12.50");
    file.extend_from_slice(b"*   2Bob             ?       ");
    file.push(0x1A);
    file
}

#[test]
fn reads_foreign_file() {
    let table = Table::from_bytes(&foreign_file(), Charset::latin1()).expect("file should parse");

    assert_eq!(table.phase(), Phase::DataEntry);
    assert_eq!(table.version(), Version::Level5);
    assert_eq!(table.header().signature(), 0x83);
    assert_eq!(
        table.updated_at(),
        Some(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap())
    );
    assert_eq!(table.record_count(), 2);
    assert_eq!(table.column_names(), vec!["ID", "KALB", "DAY", "OK", "PRICE"]);
    assert_eq!(table.columns().row_length(), table.header().record_size() - 1);
    assert_eq!(table.decimal_places("price").unwrap(), 2);

    let first = table.row(0).unwrap();
    assert_eq!(first.field(0).unwrap().as_int().unwrap(), 17);
    assert_eq!(first.field_by_name("kalb").unwrap().as_text().unwrap(), "Anna");
    assert_eq!(
        first.field_by_name("DAY").unwrap().as_date().unwrap(),
        NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()
    );
    assert!(first.field_by_name("OK").unwrap().as_bool().unwrap());
    assert_eq!(table.float_value_by_name(0, "PRICE").unwrap(), 12.5);
    assert!(!table.row_is_deleted(0).unwrap());

    assert!(table.row_is_deleted(1).unwrap());
    let second = table.row(1).unwrap();
    assert_eq!(second.values(), vec!["2", "Bob", "", "?", ""]);
    assert!(matches!(
        second.field_by_name("DAY").unwrap().as_date(),
        Err(CodecError::EmptyField(_))
    ));
    assert!(matches!(
        second.field_by_name("OK").unwrap().as_bool(),
        Err(CodecError::InvalidValue { .. })
    ));
}

#[test]
fn saving_unchanged_file_is_byte_identical() {
    let original = foreign_file();
    let table = Table::from_bytes(&original, Charset::latin1()).unwrap();
    assert_eq!(table.to_bytes().as_ref(), original.as_slice());
}

#[test]
fn missing_eof_marker_is_tolerated() {
    let mut file = foreign_file();
    file.pop();
    let table = Table::from_bytes(&file, Charset::latin1()).unwrap();
    assert_eq!(table.record_count(), 2);
    assert_eq!(table.to_bytes().last(), Some(&0x1A));
}

#[test]
fn edits_to_loaded_file_persist() {
    let mut table = Table::from_bytes(&foreign_file(), Charset::latin1()).unwrap();
    table.set_field_by_name(1, "DAY", "20240229").unwrap();
    table.set_value_by_name(1, "OK", false).unwrap();
    table.set_row_deleted(1, false).unwrap();
    let row = table.append_row().unwrap();
    table.set_value_by_name(row, "ID", 3).unwrap();

    let reloaded = Table::from_bytes(&table.to_bytes(), Charset::latin1()).unwrap();
    assert_eq!(reloaded.record_count(), 3);
    assert!(!reloaded.row_is_deleted(1).unwrap());
    assert_eq!(
        reloaded.field_by_name(1, "DAY").unwrap().as_date().unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
    assert_eq!(reloaded.field_value_by_name(1, "OK").unwrap(), "F");
    assert_eq!(reloaded.int64_value_by_name(2, "ID").unwrap(), 3);
    assert_eq!(reloaded.field_value_by_name(2, "KALB").unwrap(), "");
}

#[test]
fn loaded_schema_is_frozen() {
    let mut table = Table::from_bytes(&foreign_file(), Charset::latin1()).unwrap();
    assert!(matches!(
        table.add_column("EXTRA", ColumnType::Text, 4, 0),
        Err(TableError::SchemaLocked)
    ));
}

#[test]
fn unsupported_column_type_fails_load() {
    let mut file = foreign_file();
    file[32 + 32 + 11] = b'B';
    let err = Table::from_bytes(&file, Charset::latin1()).unwrap_err();
    assert!(matches!(
        err,
        TableError::Codec(CodecError::UnsupportedColumnType(b'B'))
    ));
}

#[test]
fn duplicate_column_names_fail_load() {
    let mut file = foreign_file();
    // Second column is renamed "id", clashing with "ID" ignoring case.
    file[64..66].copy_from_slice(b"id");
    file[66] = 0;

    let err = Table::from_bytes(&file, Charset::latin1()).unwrap_err();
    assert!(matches!(err, TableError::DuplicateFieldName(name) if name == "id"));
}

#[test]
fn truncated_files_fail_load() {
    let file = foreign_file();
    for len in [0, 11, 40, 180, file.len() - 3] {
        let err = Table::from_bytes(&file[..len], Charset::latin1()).unwrap_err();
        assert!(
            matches!(err, TableError::Codec(CodecError::TruncatedInput { .. })),
            "len {len}: {err}"
        );
    }
}

#[test]
fn stream_roundtrip_through_file() {
    let path = std::env::temp_dir().join(format!("dbfkit-roundtrip-{}.dbf", std::process::id()));

    let table = Table::from_bytes(&foreign_file(), Charset::latin1()).unwrap();
    let mut out = std::fs::File::create(&path).expect("temp file should be creatable");
    table.write_to(&mut out).expect("table should be writable");
    drop(out);

    let input = std::fs::File::open(&path).expect("temp file should be readable");
    let reloaded = Table::read_from(input, Default::default()).expect("table should load");
    std::fs::remove_file(&path).ok();

    assert_eq!(reloaded.to_bytes(), table.to_bytes());
}
