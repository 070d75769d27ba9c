//! Progress reporting and cooperative cancellation.
//!
//! The engine emits one [`ProgressEvent`] per classified key. Sinks observe; they
//! cannot influence the result, and a run produces identical output with or
//! without one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Completion of one key within a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent<'a> {
    pub sheet: &'a str,
    pub completed: usize,
    pub total: usize,
}

impl ProgressEvent<'_> {
    /// Completed share in `[0, 1]`; an empty sheet counts as done.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.completed as f64 / self.total as f64).min(1.0)
        }
    }
}

/// Receives progress notifications from the diff engine.
///
/// When classification runs in parallel, events may arrive from several threads
/// and slightly out of order; every event carries a distinct `completed` count,
/// so a sink that keeps the maximum it has seen always moves forward.
pub trait ProgressSink: Send + Sync {
    /// Called once per classified key.
    fn on_progress(&self, event: &ProgressEvent<'_>);

    /// Called before the first key of a sheet.
    fn on_sheet_start(&self, _sheet: &str, _total: usize) {}

    /// Called after the last key of a sheet.
    fn on_sheet_complete(&self, _sheet: &str) {}
}

/// A sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _event: &ProgressEvent<'_>) {}
}

/// Adapts a closure into a [`ProgressSink`].
pub struct ProgressFn<F>(pub F);

impl<F> ProgressSink for ProgressFn<F>
where
    F: Fn(&ProgressEvent<'_>) + Send + Sync,
{
    fn on_progress(&self, event: &ProgressEvent<'_>) {
        (self.0)(event);
    }
}

/// Shared flag checked between sheets.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that no further sheet is started.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
