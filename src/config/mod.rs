//! Configuration module for sheet-diff.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sheet_diff::config::{AppConfig, ConfigPreset};
//!
//! // Use defaults
//! let config = AppConfig::default();
//!
//! // Use a preset
//! let config = AppConfig::from_preset(ConfigPreset::Ci);
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .identifiers(["Channel Name", "Program Date"])
//!     .tolerance(0.01, 0.0)
//!     .fail_on_diff(true)
//!     .build();
//!
//! // Load from file
//! use sheet_diff::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.sheet-diff.yaml` file in your project root or `~/.config/sheet-diff/`:
//!
//! ```yaml
//! identifiers:
//!   columns: [Channel Name, Program Date, Clip Start Time]
//! comparison:
//!   abs_tolerance: 0.01
//! behavior:
//!   fail_on_diff: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::ConfigPreset;
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, ComparisonConfig, DiffConfig, DiffPaths,
    IdentifierConfig, OutputConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.sheet-diff.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> serde_json::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_lists_sections() {
        let schema = generate_json_schema().unwrap();
        let value: serde_json::Value = serde_json::from_str(&schema).unwrap();
        let properties = value["properties"].as_object().unwrap();
        for section in ["identifiers", "comparison", "output", "behavior"] {
            assert!(properties.contains_key(section), "{section}");
        }
    }
}
