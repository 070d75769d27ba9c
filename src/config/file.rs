//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".sheet-diff.yaml",
    ".sheet-diff.yml",
    "sheet-diff.yaml",
    "sheet-diff.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/sheet-diff/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    let cwd = std::env::current_dir().ok();
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(cwd) = &cwd {
        candidates.push(cwd.clone());
        if let Some(root) = find_git_root(cwd) {
            candidates.push(root);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("sheet-diff"));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home);
    }

    candidates.iter().find_map(|dir| find_config_in_dir(dir))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Walk up from `start` to the first directory containing `.git`.
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
///
/// An empty file yields the default configuration.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
///
/// A file that exists but cannot be parsed is logged and ignored.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded config file");
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate the effective config as YAML.
pub fn to_yaml(config: &AppConfig) -> Result<String, ConfigFileError> {
    Ok(serde_yaml::to_string(config)?)
}

/// Generate a minimal example config file.
#[must_use]
pub fn generate_example_config() -> String {
    "\
# sheet-diff configuration
identifiers:
  columns:
    - Channel Name
    - Program Date
    - Clip Start Time

comparison:
  abs_tolerance: 0.000000001
  fallback: content-hash

output:
  format: summary
"
    .to_string()
}

/// Generate a full example config file with every option and its default.
#[must_use]
pub fn generate_full_example_config() -> String {
    "\
# sheet-diff configuration
#
# Place this file as .sheet-diff.yaml in the project directory, the git
# root, ~/.config/sheet-diff/ or your home directory.

# Columns that identify a record. Only the ones present in both sheets are
# used, in this order.
identifiers:
  columns:
    - Channel Name
    - Program Date
    - Clip Start Time

comparison:
  # Numbers are equal when |a - b| <= max(abs_tolerance, rel_tolerance * max(|a|, |b|))
  abs_tolerance: 0.000000001
  rel_tolerance: 0.000000001
  # Row kept when a key repeats within a sheet: last-wins, first-wins
  duplicate_policy: last-wins
  # Keying when no identifier is shared: content-hash, row-position, fail
  fallback: content-hash
  # Compare large sheets on all cores
  parallel: true
  parallel_threshold: 2000
  # Restrict the comparison to these sheets
  # sheets:
  #   - January

output:
  # Format: summary, json, markdown, csv
  format: summary
  # Write the report to a file instead of stdout
  # file: ./report.json
  # Also write one CSV file per report table
  # directory: ./report
  no_color: false
  # Rows listed per sheet in the terminal summary
  max_modifications: 5
  max_unmatched_rows: 3
  # Emit identical records in the per-sheet detail tables
  include_identical: true

behavior:
  # Exit with code 1 when differences are found
  fail_on_diff: false
  # Suppress non-essential output
  quiet: false
  # Hide the progress line on stderr
  no_progress: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{DuplicatePolicy, FallbackStrategy};
    use crate::reports::ReportFormat;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".sheet-diff.yaml");
        std::fs::write(&config_path, "output:\n  format: json\n").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_find_git_root() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join(".git")).unwrap();
        let nested = tmp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_git_root(&nested), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r#"
identifiers:
  columns: [Channel Name, Program Date]
comparison:
  abs_tolerance: 0.5
  duplicate_policy: first-wins
  fallback: row-position
output:
  format: markdown
behavior:
  fail_on_diff: true
"#;
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.identifiers.columns, vec!["Channel Name", "Program Date"]);
        assert_eq!(config.comparison.abs_tolerance, 0.5);
        assert_eq!(config.comparison.duplicate_policy, DuplicatePolicy::FirstWriteWins);
        assert_eq!(config.comparison.fallback, FallbackStrategy::RowPosition);
        assert_eq!(config.output.format, ReportFormat::Markdown);
        assert!(config.behavior.fail_on_diff);
        assert!(config.comparison.parallel);
    }

    #[test]
    fn test_load_empty_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(load_config_file(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_unknown_enum_value_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.yaml");
        std::fs::write(&path, "comparison:\n  fallback: guess\n").unwrap();
        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigFileError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_example_configs_parse() {
        let minimal: AppConfig = serde_yaml::from_str(&generate_example_config()).unwrap();
        assert_eq!(minimal, AppConfig::default());

        let full: AppConfig = serde_yaml::from_str(&generate_full_example_config()).unwrap();
        assert_eq!(full, AppConfig::default());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = AppConfig::builder()
            .identifiers(["id"])
            .output_format(ReportFormat::Csv)
            .build();
        let yaml = to_yaml(&config).unwrap();
        let back: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        std::fs::write(&config_path, "output:\n  format: csv\n").unwrap();

        let discovered = discover_config_file(Some(&config_path));
        assert_eq!(discovered, Some(config_path.clone()));

        let (config, loaded_from) = load_or_default(Some(&config_path));
        assert_eq!(loaded_from, Some(config_path));
        assert_eq!(config.output.format, ReportFormat::Csv);
    }
}
