#![no_main]
use libfuzzer_sys::fuzz_target;
use sheet_diff::matching::{key_part, KEY_DELIMITER};
use sheet_diff::model::{parse_temporal, NumericTolerance};
use sheet_diff::CellValue;

/// Fuzz value inference, canonicalization and keying.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let value = CellValue::infer(s);
        let _ = value.canonical_string();
        let _ = key_part(&value, KEY_DELIMITER);
        let _ = parse_temporal(s);

        let text = CellValue::text(s);
        assert!(text.equivalent(&text, &NumericTolerance::exact()));
    }
});
