//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod diff;
mod progress;
mod sheets;

pub use diff::run_diff;
pub use progress::TerminalProgress;
pub use sheets::{describe_sheets, run_sheets, SheetInfo};

// Re-export config types used by handlers
pub use crate::config::DiffConfig;
