//! Configuration validation for sheet-diff.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AppConfig, BehaviorConfig, ComparisonConfig, IdentifierConfig, OutputConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.identifiers.validate());
        errors.extend(self.comparison.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for IdentifierConfig {
    fn validate(&self) -> Vec<ConfigError> {
        if self.columns.iter().all(|c| c.trim().is_empty()) {
            return vec![ConfigError::new(
                "identifiers.columns",
                "At least one non-blank identifier column is required",
            )];
        }
        Vec::new()
    }
}

impl Validatable for ComparisonConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("comparison.abs_tolerance", self.abs_tolerance),
            ("comparison.rel_tolerance", self.rel_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError::new(
                    field,
                    format!("Tolerance must be a finite, non-negative number, got {value}"),
                ));
            }
        }

        if self.sheets.iter().any(|s| s.trim().is_empty()) {
            errors.push(ConfigError::new(
                "comparison.sheets",
                "Sheet names must not be blank",
            ));
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // Validate output file path if specified
        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        if let Some(ref dir) = self.directory {
            if dir.exists() && !dir.is_dir() {
                errors.push(ConfigError::new(
                    "output.directory",
                    format!("Not a directory: {}", dir.display()),
                ));
            }
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        // Only boolean flags
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportFormat;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_blank_identifiers() {
        let config = AppConfig::builder().identifiers(["", "  "]).build();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "identifiers.columns");
    }

    #[test]
    fn test_negative_tolerance() {
        let config = AppConfig::builder().tolerance(-1.0, f64::NAN).build();
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["comparison.abs_tolerance", "comparison.rel_tolerance"]
        );
    }

    #[test]
    fn test_output_file_parent_must_exist() {
        let config = AppConfig::builder()
            .output_format(ReportFormat::Json)
            .output_file(Some(PathBuf::from("/nonexistent/dir/report.json")))
            .build();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().starts_with("output.file: "));
    }
}
