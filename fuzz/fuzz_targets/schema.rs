#![no_main]

use libfuzzer_sys::fuzz_target;
use romtable::tables::Schema;

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = std::str::from_utf8(data) {
        let _ = Schema::from_json_str(json);
    }
});
