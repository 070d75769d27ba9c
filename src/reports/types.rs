//! Report type definitions.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable terminal summary
    #[default]
    Summary,
    /// Structured JSON output
    Json,
    /// Markdown document
    Markdown,
    /// CSV, one section per report table
    Csv,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Json => write!(f, "json"),
            Self::Markdown => write!(f, "markdown"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Modifications listed per sheet in text reports
    pub max_modifications: usize,
    /// One-sided rows listed per sheet and side in text reports
    pub max_unmatched_rows: usize,
    /// Emit identical records in the per-sheet detail tables
    pub include_identical: bool,
    /// Title for the report
    pub title: Option<String>,
    /// Additional metadata to include
    pub metadata: ReportMetadata,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_modifications: 5,
            max_unmatched_rows: 3,
            include_identical: true,
            title: None,
            metadata: ReportMetadata::default(),
        }
    }
}

/// Metadata included in reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of dataset A
    pub path_a: Option<String>,
    /// Path of dataset B
    pub path_b: Option<String>,
    /// Tool version
    pub tool_version: String,
    /// Custom metadata fields
    pub custom: BTreeMap<String, String>,
}

impl Default for ReportMetadata {
    fn default() -> Self {
        Self {
            path_a: None,
            path_b: None,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            custom: BTreeMap::new(),
        }
    }
}
