//! Default configurations and presets for sheet-diff.
//!
//! Provides named presets for common use cases.

use super::types::{AppConfig, BehaviorConfig, OutputConfig};
use crate::diff::DiffOptions;
use crate::reports::ReportFormat;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Default balanced settings suitable for most cases
    Default,
    /// Exact numbers, no fallback keying
    Strict,
    /// Loose numeric tolerance for values that went through float formatting
    Lenient,
    /// CI: JSON output, fail on differences, no color or progress
    Ci,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Lenient => "lenient",
            Self::Ci => "ci",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "balanced" => Some(Self::Default),
            "strict" | "exact" => Some(Self::Strict),
            "lenient" | "loose" => Some(Self::Lenient),
            "ci" | "ci-cd" | "pipeline" => Some(Self::Ci),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Balanced settings suitable for most dataset comparisons",
            Self::Strict => "Exact numeric comparison; sheets without shared identifiers fail",
            Self::Lenient => "Tolerant numeric comparison for exported or recomputed values",
            Self::Ci => "JSON output that fails the build when differences are found",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::Lenient, Self::Ci]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self::strict_preset(),
            ConfigPreset::Lenient => Self::lenient_preset(),
            ConfigPreset::Ci => Self::ci_preset(),
        }
    }

    /// Strict preset.
    ///
    /// - Exact numeric comparison
    /// - Sheets without a shared identifier are reported as failed
    #[must_use]
    pub fn strict_preset() -> Self {
        Self {
            comparison: DiffOptions::strict().into(),
            ..Self::default()
        }
    }

    /// Lenient preset.
    #[must_use]
    pub fn lenient_preset() -> Self {
        Self {
            comparison: DiffOptions::lenient().into(),
            ..Self::default()
        }
    }

    /// CI pipeline preset.
    ///
    /// - JSON output for machine parsing
    /// - Exit with code 1 on any difference
    /// - No color, no progress line
    #[must_use]
    pub fn ci_preset() -> Self {
        Self {
            output: OutputConfig {
                format: ReportFormat::Json,
                no_color: true,
                ..OutputConfig::default()
            },
            behavior: BehaviorConfig {
                fail_on_diff: true,
                quiet: true,
                no_progress: true,
            },
            ..Self::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::FallbackStrategy;

    #[test]
    fn test_preset_names() {
        assert_eq!(ConfigPreset::Default.name(), "default");
        assert_eq!(ConfigPreset::Ci.to_string(), "ci");
        for preset in ConfigPreset::all() {
            assert_eq!(ConfigPreset::from_name(preset.name()), Some(*preset));
        }
    }

    #[test]
    fn test_preset_from_name() {
        assert_eq!(ConfigPreset::from_name("EXACT"), Some(ConfigPreset::Strict));
        assert_eq!(ConfigPreset::from_name("loose"), Some(ConfigPreset::Lenient));
        assert_eq!(ConfigPreset::from_name("pipeline"), Some(ConfigPreset::Ci));
        assert_eq!(ConfigPreset::from_name("invalid"), None);
    }

    #[test]
    fn test_strict_preset() {
        let config = AppConfig::strict_preset();
        assert_eq!(config.comparison.abs_tolerance, 0.0);
        assert_eq!(config.comparison.fallback, FallbackStrategy::Fail);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_lenient_preset() {
        let config = AppConfig::from_preset(ConfigPreset::Lenient);
        assert!(config.comparison.abs_tolerance > AppConfig::default().comparison.abs_tolerance);
    }

    #[test]
    fn test_ci_preset() {
        let config = AppConfig::ci_preset();
        assert_eq!(config.output.format, ReportFormat::Json);
        assert!(config.output.no_color);
        assert!(config.behavior.fail_on_diff);
        assert!(config.behavior.no_progress);
    }

    #[test]
    fn test_presets_are_valid() {
        use crate::config::Validatable;
        for preset in ConfigPreset::all() {
            assert!(AppConfig::from_preset(*preset).is_valid(), "{preset}");
        }
    }
}
