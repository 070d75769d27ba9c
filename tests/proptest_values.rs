//! Property-based tests for cell values and key construction.
//!
//! Ensures value canonicalization handles arbitrary input without panicking,
//! and that comparison and keying invariants hold across random inputs.

use proptest::prelude::*;
use sheet_diff::matching::{key_part, KEY_DELIMITER};
use sheet_diff::model::NumericTolerance;
use sheet_diff::CellValue;

fn cell_value() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Empty),
        "\\PC{0,40}".prop_map(CellValue::Text),
        (-1.0e12f64..1.0e12).prop_map(CellValue::Number),
        any::<bool>().prop_map(CellValue::Boolean),
        (1900i32..2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
            CellValue::Text(format!("{d:02}/{m:02}/{y}"))
        }),
        (0u32..24, 0u32..60).prop_map(|(h, m)| CellValue::Text(format!("{h:02}:{m:02}"))),
    ]
}

proptest! {
    // Value checks are cheap; use a broad sample.
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn infer_and_canonical_dont_panic(s in "\\PC{0,200}") {
        let value = CellValue::infer(&s);
        let _ = value.canonical_string();
        let _ = value.as_number();
        let _ = value.as_temporal();
        let _ = value.is_blank();
    }

    #[test]
    fn canonical_string_is_trimmed(s in "\\PC{0,60}") {
        let canonical = CellValue::Text(s).canonical_string();
        prop_assert_eq!(canonical.trim(), canonical.as_str());
    }

    #[test]
    fn equivalent_is_reflexive(v in cell_value()) {
        prop_assert!(v.equivalent(&v, &NumericTolerance::exact()));
        prop_assert!(v.equivalent(&v, &NumericTolerance::default()));
    }

    #[test]
    fn equivalent_is_symmetric(a in cell_value(), b in cell_value()) {
        let tolerance = NumericTolerance::default();
        prop_assert_eq!(a.equivalent(&b, &tolerance), b.equivalent(&a, &tolerance));
    }

    #[test]
    fn padded_text_equals_trimmed(s in "[a-zA-Z0-9 ]{1,30}", pad in " {0,3}") {
        let padded = CellValue::Text(format!("{pad}{s}{pad}"));
        let plain = CellValue::Text(s.clone());
        prop_assert!(padded.equivalent(&plain, &NumericTolerance::exact()));
    }

    #[test]
    fn numbers_and_numeric_text_agree(n in -1.0e9f64..1.0e9) {
        let number = CellValue::Number(n);
        let text = CellValue::Text(n.to_string());
        prop_assert!(number.equivalent(&text, &NumericTolerance::default()));
    }

    #[test]
    fn numbers_and_numeric_text_share_key_parts(n in -1.0e9f64..1.0e9, pad in " {0,2}") {
        let number = CellValue::Number(n);
        let text = CellValue::Text(format!("{pad}{n}{pad}"));
        prop_assert_eq!(key_part(&number, KEY_DELIMITER), key_part(&text, KEY_DELIMITER));

        let integral = n.trunc();
        let padded_fraction = CellValue::Text(format!("{integral:.2}"));
        prop_assert_eq!(
            key_part(&CellValue::Number(integral), KEY_DELIMITER),
            key_part(&padded_fraction, KEY_DELIMITER)
        );
    }

    #[test]
    fn key_part_never_contains_bare_delimiter(v in cell_value()) {
        let part = key_part(&v, KEY_DELIMITER);
        let mut escaped = false;
        for ch in part.chars() {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else {
                prop_assert_ne!(ch, KEY_DELIMITER);
            }
        }
        prop_assert!(!escaped, "dangling escape in {:?}", part);
    }

    #[test]
    fn key_part_is_injective_on_canonical_form(a in cell_value(), b in cell_value()) {
        if a.canonical_string() != b.canonical_string() {
            prop_assert_ne!(key_part(&a, KEY_DELIMITER), key_part(&b, KEY_DELIMITER));
        }
    }
}
