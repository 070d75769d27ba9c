//! Configuration types for sheet-diff operations.
//!
//! Provides structured configuration for the diff and sheet-listing commands.

use crate::diff::DiffOptions;
use crate::error::Result;
use crate::matching::{DuplicatePolicy, FallbackStrategy};
use crate::model::{IdentifierSpec, NumericTolerance, DEFAULT_IDENTIFIERS};
use crate::reports::{ReportConfig, ReportFormat};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// This is the top-level configuration struct that aggregates all configuration
/// options. It can be constructed from CLI arguments, config files, or both
/// (with CLI overriding file settings).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Identifier columns used to build composite keys
    pub identifiers: IdentifierConfig,
    /// Value comparison and keying
    pub comparison: ComparisonConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the identifier columns.
    pub fn identifiers<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.identifiers.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set absolute and relative numeric tolerance.
    pub const fn tolerance(mut self, absolute: f64, relative: f64) -> Self {
        self.config.comparison.abs_tolerance = absolute;
        self.config.comparison.rel_tolerance = relative;
        self
    }

    /// Set the duplicate-key policy.
    pub const fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.config.comparison.duplicate_policy = policy;
        self
    }

    /// Set the fallback keying strategy.
    pub const fn fallback(mut self, fallback: FallbackStrategy) -> Self {
        self.config.comparison.fallback = fallback;
        self
    }

    /// Enable or disable parallel comparison.
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.comparison.parallel = parallel;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Set the per-table CSV output directory.
    pub fn output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config.output.directory = dir;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Exit non-zero when differences are found.
    pub const fn fail_on_diff(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_diff = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Command-specific Configuration Types
// ============================================================================

/// Configuration for diff operations
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Paths to compare
    pub paths: DiffPaths,
    /// Normalized identifier columns
    pub identifiers: IdentifierSpec,
    /// Comparison configuration
    pub comparison: ComparisonConfig,
    /// Output configuration
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl DiffConfig {
    /// Combine input paths with an application config.
    pub fn from_app(paths: DiffPaths, app: AppConfig) -> Result<Self> {
        Ok(Self {
            paths,
            identifiers: app.identifiers.spec()?,
            comparison: app.comparison,
            output: app.output,
            behavior: app.behavior,
        })
    }

    /// Report options, with the input paths recorded as metadata.
    #[must_use]
    pub fn report_config(&self) -> ReportConfig {
        let mut config = self.output.report_config();
        config.metadata.path_a = Some(self.paths.a.display().to_string());
        config.metadata.path_b = Some(self.paths.b.display().to_string());
        config
    }
}

/// Paths for diff operation
#[derive(Debug, Clone)]
pub struct DiffPaths {
    /// Path to dataset A (the reference)
    pub a: PathBuf,
    /// Path to dataset B
    pub b: PathBuf,
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Identifier configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IdentifierConfig {
    /// Column names, in key order
    pub columns: Vec<String>,
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_IDENTIFIERS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl IdentifierConfig {
    /// Normalize into an [`IdentifierSpec`].
    pub fn spec(&self) -> Result<IdentifierSpec> {
        IdentifierSpec::new(self.columns.iter().map(String::as_str))
    }
}

/// Comparison configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Absolute numeric tolerance
    #[schemars(range(min = 0.0))]
    pub abs_tolerance: f64,
    /// Relative numeric tolerance
    #[schemars(range(min = 0.0))]
    pub rel_tolerance: f64,
    /// Which row is kept when a key repeats within one sheet
    pub duplicate_policy: DuplicatePolicy,
    /// Keying strategy when no identifier column is shared
    pub fallback: FallbackStrategy,
    /// Compare large sheets on all cores
    pub parallel: bool,
    /// Minimum number of keys before a sheet is compared in parallel
    pub parallel_threshold: usize,
    /// Restrict the comparison to these sheets (empty for all)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sheets: Vec<String>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        DiffOptions::default().into()
    }
}

impl From<DiffOptions> for ComparisonConfig {
    fn from(options: DiffOptions) -> Self {
        Self {
            abs_tolerance: options.tolerance.absolute,
            rel_tolerance: options.tolerance.relative,
            duplicate_policy: options.duplicate_policy,
            fallback: options.fallback,
            parallel: options.parallel,
            parallel_threshold: options.parallel_threshold,
            sheets: Vec::new(),
        }
    }
}

impl ComparisonConfig {
    /// Engine options for this configuration.
    #[must_use]
    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            tolerance: NumericTolerance {
                absolute: self.abs_tolerance,
                relative: self.rel_tolerance,
            },
            duplicate_policy: self.duplicate_policy,
            fallback: self.fallback,
            parallel: self.parallel,
            parallel_threshold: self.parallel_threshold,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Also write one CSV file per report table into this directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
    /// Modifications listed per sheet in the terminal summary
    pub max_modifications: usize,
    /// One-sided rows listed per sheet and side in the terminal summary
    pub max_unmatched_rows: usize,
    /// Emit identical records in per-sheet detail tables
    pub include_identical: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let report = ReportConfig::default();
        Self {
            format: ReportFormat::Summary,
            file: None,
            directory: None,
            no_color: false,
            max_modifications: report.max_modifications,
            max_unmatched_rows: report.max_unmatched_rows,
            include_identical: report.include_identical,
        }
    }
}

impl OutputConfig {
    /// Report options derived from this configuration.
    #[must_use]
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            max_modifications: self.max_modifications,
            max_unmatched_rows: self.max_unmatched_rows,
            include_identical: self.include_identical,
            ..ReportConfig::default()
        }
    }
}

/// Behavior flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 when differences are found
    pub fail_on_diff: bool,
    /// Suppress non-essential output
    pub quiet: bool,
    /// Hide the progress line on stderr
    pub no_progress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .identifiers(["Channel Name"])
            .tolerance(0.01, 0.0)
            .fallback(FallbackStrategy::RowPosition)
            .output_format(ReportFormat::Json)
            .fail_on_diff(true)
            .build();

        assert_eq!(config.identifiers.columns, vec!["Channel Name"]);
        assert_eq!(config.comparison.abs_tolerance, 0.01);
        assert_eq!(config.output.format, ReportFormat::Json);
        assert!(config.behavior.fail_on_diff);

        let options = config.comparison.diff_options();
        assert_eq!(options.fallback, FallbackStrategy::RowPosition);
        assert_eq!(options.tolerance.absolute, 0.01);
    }

    #[test]
    fn test_defaults_match_engine() {
        let config = AppConfig::default();
        assert_eq!(config.comparison.diff_options(), DiffOptions::default());
        assert_eq!(config.identifiers.spec().unwrap(), IdentifierSpec::default());
    }

    #[test]
    fn test_diff_config_carries_paths() {
        let paths = DiffPaths {
            a: PathBuf::from("a.json"),
            b: PathBuf::from("b.json"),
        };
        let config = DiffConfig::from_app(paths, AppConfig::default()).unwrap();
        let report = config.report_config();
        assert_eq!(report.metadata.path_a.as_deref(), Some("a.json"));
        assert_eq!(report.max_modifications, 5);
    }

    #[test]
    fn test_empty_identifiers_rejected() {
        let app = AppConfig::builder().identifiers([" "]).build();
        let paths = DiffPaths {
            a: PathBuf::from("a"),
            b: PathBuf::from("b"),
        };
        assert!(DiffConfig::from_app(paths, app).is_err());
    }
}
