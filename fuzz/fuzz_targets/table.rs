#![no_main]

use libfuzzer_sys::fuzz_target;
use romtable::prelude::*;

const SCHEMA: &str = r#"[
    {"name": "a", "size": 3},
    {"name": "b", "values": ["x", "y"]},
    {"name": "c", "type": "bitfield", "size": 2, "bitvalues": ["p", "q"]},
    {"name": "d", "type": "one-based int", "size": 2},
    {"name": "e", "type": "bytearray", "size": 3},
    {"name": "f", "type": "boolean"}
]"#;

fuzz_target!(|data: &[u8]| {
    let Ok(schema) = Schema::from_json_str(SCHEMA) else {
        return;
    };
    let schema = schema.into_shared();
    let rows = data.len() / schema.row_byte_width();

    let mut table = Table::with_rows(schema.clone(), "Fuzz", rows);
    if table.decode(data, 0).is_err() {
        return;
    }

    let records = table.export_text().unwrap();
    let mut copy = Table::with_rows(schema, "Fuzz", rows);
    copy.import_text(&records).unwrap();
    assert_eq!(copy, table);

    let mut written = vec![0u8; table.size()];
    copy.encode(&mut written, 0).unwrap();
    let mut again = copy.clone();
    again.decode(&written, 0).unwrap();
    assert_eq!(again, table);
});
