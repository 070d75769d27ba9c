#![no_main]
use libfuzzer_sys::fuzz_target;
use sheet_diff::loaders::JsonLoader;
use sheet_diff::{DiffEngine, IdentifierSpec};

/// Fuzz the JSON dataset loader.
///
/// Wraps input in a sheet envelope to get past the document shape, then
/// compares whatever loads against itself.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let loader = JsonLoader::new();

        // Try raw input
        let _ = loader.parse_str(s, "fuzz.json");

        // Try wrapping as the rows of one sheet
        if s.len() < 10_000 {
            let wrapped = format!(r#"{{"sheets":{{"S":{{"rows":[{s}]}}}}}}"#);
            if let Ok(dataset) = loader.parse_str(&wrapped, "fuzz.json") {
                let _ = DiffEngine::new(IdentifierSpec::default()).compare_datasets(&dataset, &dataset);
            }
        }
    }
});
