//! End-to-end tests for flat tables.
//!
//! Every test starts from a declarative schema, decodes a hand-assembled image, goes through
//! text and comes back to bytes, checking that nothing is lost on the way.

use romtable::prelude::*;
use std::sync::Arc;

const ITEM_SCHEMA: &str = r#"[
    {"name": "Name", "type": "bytearray", "size": 4},
    {"name": "Price", "size": 2},
    {"name": "Type", "values": ["weapon", "armor", "ring", "consumable"]},
    {"name": "Flags", "type": "bitfield", "bitvalues": ["cursed", "unique", "quest"]},
    {"name": "Script", "type": "hexint", "size": 3},
    {"name": "Level", "type": "one-based int"},
    {"name": "Tradeable", "type": "boolean"}
]"#;

/// Three 13-byte item rows.
fn item_image() -> Vec<u8> {
    vec![
        // Row 0
        0x53, 0x57, 0x44, 0x00, // Name
        0xF4, 0x01, // Price 500
        0x00, // Type WEAPON
        0x00, // Flags {}
        0x00, 0x80, 0xC0, // Script 0xC08000
        0x00, // Level 1
        0x01, // Tradeable
        // Row 1
        0x52, 0x4E, 0x47, 0x00, // Name
        0x10, 0x27, // Price 10000
        0x02, // Type RING
        0x03, // Flags {CURSED, UNIQUE}
        0x34, 0x12, 0xC1, // Script 0xC11234
        0x09, // Level 10
        0x00, // Tradeable
        // Row 2
        0x00, 0x00, 0x00, 0x00, // Name
        0x00, 0x00, // Price 0
        0x07, // Type 7, unnamed
        0x84, // Flags {2, 7}
        0xFF, 0xFF, 0xFF, // Script
        0xFF, // Level 256
        0x00, // Tradeable
    ]
}

fn item_table() -> Table {
    let schema = Schema::from_json_str(ITEM_SCHEMA).unwrap().into_shared();
    Table::with_size(schema, "Items", 39).unwrap()
}

#[test]
fn decode_export_import_encode() {
    let image = item_image();
    let mut items = item_table();
    assert_eq!(items.row_count(), 3);
    items.decode(&image, 0).unwrap();

    let records = items.export_text().unwrap();
    let ring = &records[&1];
    assert_eq!(ring.get("Type"), Some(&TextValue::from("RING")));
    assert_eq!(
        ring.get("Flags"),
        Some(&TextValue::from(vec!["CURSED", "UNIQUE"]))
    );
    assert_eq!(ring.get("Level"), Some(&TextValue::from(10_u64)));
    assert_eq!(ring.get("Tradeable"), Some(&TextValue::from(false)));

    let odd = &records[&2];
    assert_eq!(odd.get("Type"), Some(&TextValue::from(7_u64)));
    assert_eq!(
        odd.get("Flags"),
        Some(&TextValue::List(vec![
            TextValue::from(7_u64),
            TextValue::from("QUEST")
        ]))
    );
    assert_eq!(odd.get("Level"), Some(&TextValue::from(256_u64)));

    let mut copy = item_table();
    copy.import_text(&records).unwrap();
    let mut written = vec![0u8; image.len()];
    copy.encode(&mut written, 0).unwrap();
    assert_eq!(written, image);
}

#[test]
fn document_round_trip_keeps_bytes() {
    let image = item_image();
    let mut items = item_table();
    items.decode(&image, 0).unwrap();

    let mut document = Vec::new();
    items.write_text_document(&mut document).unwrap();
    let document = String::from_utf8(document).unwrap();
    assert!(document.contains("\"Script\": 0xc08000"));
    assert!(document.contains("\"Script\": 0xffffff"));
    assert!(document.contains("\"Price\": 10000"));

    let mut copy = item_table();
    copy.read_text_document(document.as_bytes()).unwrap();
    let mut written = vec![0u8; image.len()];
    copy.encode(&mut written, 0).unwrap();
    assert_eq!(written, image);
}

#[test]
fn edited_text_changes_only_its_bytes() {
    let image = item_image();
    let mut items = item_table();
    items.decode(&image, 0).unwrap();

    let mut records = items.export_text().unwrap();
    if let Some(TextValue::Map(fields)) = records.get_mut(&0) {
        fields.insert("Type".into(), TextValue::from("consumable"));
        fields.insert("Flags".into(), TextValue::from(vec!["quest"]));
    }
    items.import_text(&records).unwrap();

    let mut written = image.clone();
    items.encode(&mut written, 0).unwrap();

    let changed: Vec<usize> = (0..image.len())
        .filter(|index| image[*index] != written[*index])
        .collect();
    assert_eq!(changed, vec![6, 7]);
    assert_eq!(written[6], 0x03);
    assert_eq!(written[7], 0x04);
}

#[test]
fn errors_are_attributed() {
    let mut items = item_table();
    items.decode(&item_image(), 0).unwrap();
    let mut records = items.export_text().unwrap();

    if let Some(TextValue::Map(fields)) = records.get_mut(&2) {
        fields.insert("Flags".into(), TextValue::from(vec![8_u64]));
    }
    let error = items.import_text(&records).unwrap_err();
    assert_eq!(error.location(), Some((Some("Items"), Some(2), Some("Flags"))));
    assert!(matches!(error.root_cause(), Error::InvalidText(_)));
    assert!(error.to_string().starts_with("Table[Items], row[2], column[Flags]:"));

    if let Some(TextValue::Map(fields)) = records.get_mut(&2) {
        fields.remove("Flags");
    }
    let error = items.import_text(&records).unwrap_err();
    assert_eq!(error.location(), Some((Some("Items"), Some(2), Some("Flags"))));
    assert!(matches!(error.root_cause(), Error::MissingData));

    records.remove(&1);
    let error = items.import_text(&records).unwrap_err();
    assert_eq!(error.location(), Some((Some("Items"), Some(1), None)));
}

#[test]
fn short_image_is_out_of_bounds() {
    let mut items = item_table();
    let image = item_image();
    let error = items.decode(&image[..28], 0).unwrap_err();
    assert_eq!(error.location(), Some((Some("Items"), Some(2), Some("Name"))));
    assert!(matches!(error.root_cause(), Error::OutOfBounds));
}

#[test]
fn single_column_table() {
    let schema = Arc::new(Schema::single(
        ColumnCodec::hex_integer("Pointer", 4).unwrap(),
    ));
    let image = [0x00u8, 0x00, 0xC0, 0x00, 0xEF, 0xBE, 0xAD, 0xDE];
    let mut pointers = Table::with_size(schema.clone(), "Pointers", image.len()).unwrap();
    pointers.decode(&image, 0).unwrap();

    let records = pointers.export_text().unwrap();
    assert_eq!(records[&0], TextValue::from(0x00C0_0000_u64));
    assert_eq!(records[&1], TextValue::from(0xDEAD_BEEF_u64));

    let mut document = Vec::new();
    pointers.write_text_document(&mut document).unwrap();
    let mut copy = Table::with_size(schema, "Pointers", image.len()).unwrap();
    copy.read_text_document(document.as_slice()).unwrap();
    assert_eq!(copy, pointers);
}

#[test]
fn shared_registry_across_schemas() {
    let registries = RegistryCache::new();
    let specs = [ColumnSpec::new("Element").values(["fire", "ice", "bolt"])];
    let spells = Schema::compile_with(&specs, &registries).unwrap();
    let weapons = Schema::compile_with(&specs, &registries).unwrap();

    let left = spells.columns()[0].encoding().registry().unwrap();
    let right = weapons.columns()[0].encoding().registry().unwrap();
    assert!(Arc::ptr_eq(left, right));
    assert_eq!(left.value_of("Bolt"), Some(2));
}

#[test]
fn parallel_decode_matches_sequential() {
    let schema = Schema::from_json_str(ITEM_SCHEMA).unwrap().into_shared();
    let mut image = item_image();
    image.extend(item_image());

    let mut first = Table::with_rows(schema.clone(), "First", 3);
    let mut second = Table::with_rows(schema.clone(), "Second", 3);
    decode_tables(&image, &mut [(&mut first, 0), (&mut second, 39)]).unwrap();

    let mut expected = Table::with_rows(schema, "Expected", 3);
    expected.decode(&image, 39).unwrap();
    assert_eq!(first.rows().collect::<Vec<_>>(), expected.rows().collect::<Vec<_>>());
    assert_eq!(second.rows().collect::<Vec<_>>(), expected.rows().collect::<Vec<_>>());
}

#[test]
fn repeated_names_keep_bytes() {
    let schema = Schema::from_json_str(
        r#"[
            {"name": "kind", "values": ["a", "b", "a"]},
            {"name": "mask", "type": "bitfield", "bitvalues": ["x", "x"]}
        ]"#,
    )
    .unwrap()
    .into_shared();
    let image = [0x00u8, 0x01, 0x02, 0x02];

    let mut table = Table::with_size(schema.clone(), "Repeats", image.len()).unwrap();
    table.decode(&image, 0).unwrap();

    let records = table.export_text().unwrap();
    assert_eq!(records[&0].get("kind"), Some(&TextValue::from(0_u64)));
    assert_eq!(records[&0].get("mask"), Some(&TextValue::from(vec![0_u64])));
    assert_eq!(records[&1].get("kind"), Some(&TextValue::from("A")));
    assert_eq!(records[&1].get("mask"), Some(&TextValue::from(vec!["X"])));

    let mut copy = Table::with_size(schema, "Repeats", image.len()).unwrap();
    copy.import_text(&records).unwrap();
    let mut written = vec![0u8; image.len()];
    copy.encode(&mut written, 0).unwrap();
    assert_eq!(written, image);
}
