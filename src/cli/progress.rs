//! Terminal progress line for the `diff` command.
//!
//! Renders `Comparing <sheet>: <done>/<total> (<pct>%)` on stderr, redrawn in
//! place. Redraws are throttled to whole-percent steps.

use crate::diff::{ProgressEvent, ProgressSink};
use std::io::{IsTerminal, Write};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct LineState {
    completed: usize,
    /// Last rendered percentage, `None` before the first draw of a sheet
    percent: Option<u8>,
}

/// Progress renderer writing to stderr.
#[derive(Debug, Default)]
pub struct TerminalProgress {
    state: Mutex<LineState>,
}

impl TerminalProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when stderr is a terminal and a progress line makes sense.
    #[must_use]
    pub fn is_supported() -> bool {
        std::io::stderr().is_terminal()
    }

    /// Record `event` and return the line to draw, if the visible percentage changed.
    fn advance(&self, event: &ProgressEvent<'_>) -> Option<String> {
        let mut state = self.state.lock().ok()?;
        if event.completed <= state.completed && state.percent.is_some() {
            return None;
        }
        state.completed = state.completed.max(event.completed);

        let done = ProgressEvent {
            completed: state.completed,
            ..*event
        };
        let percent = (done.fraction() * 100.0).floor() as u8;
        if state.percent == Some(percent) {
            return None;
        }
        state.percent = Some(percent);
        Some(render_line(&done, percent))
    }

    fn reset(&self) {
        if let Ok(mut state) = self.state.lock() {
            *state = LineState::default();
        }
    }
}

fn render_line(event: &ProgressEvent<'_>, percent: u8) -> String {
    format!(
        "Comparing {}: {}/{} ({percent}%)",
        event.sheet, event.completed, event.total
    )
}

impl ProgressSink for TerminalProgress {
    fn on_progress(&self, event: &ProgressEvent<'_>) {
        if let Some(line) = self.advance(event) {
            let mut stderr = std::io::stderr().lock();
            let _ = write!(stderr, "\r\x1b[2K{line}");
            let _ = stderr.flush();
        }
    }

    fn on_sheet_start(&self, _sheet: &str, _total: usize) {
        self.reset();
    }

    fn on_sheet_complete(&self, _sheet: &str) {
        self.reset();
        let _ = write!(std::io::stderr(), "\r\x1b[2K");
    }
}
