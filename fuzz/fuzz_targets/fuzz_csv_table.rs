#![no_main]
use libfuzzer_sys::fuzz_target;
use sheet_diff::loaders::CsvLoader;

/// Fuzz the delimited-text loader with both delimiters.
fuzz_target!(|data: &[u8]| {
    let _ = CsvLoader::new().parse_table(data, "fuzz.csv");
    let _ = CsvLoader::tsv().parse_table(data, "fuzz.tsv");
});
