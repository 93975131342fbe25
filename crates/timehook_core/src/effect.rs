use std::fmt;

use crate::ProcessOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand a line to the caller, in order.
    Emit(Line),
    /// The run is over; always the last effect of the run.
    Finish(ProcessOutcome),
}

/// One human-readable output entry. Lines carry their own newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Normal progress, meant for stdout.
    Progress(String),
    /// Error report, meant for stderr.
    Error(String),
}

impl Line {
    pub fn progress(text: impl Into<String>) -> Self {
        Line::Progress(text.into())
    }

    pub fn error(text: impl Into<String>) -> Self {
        Line::Error(text.into())
    }

    pub fn text(&self) -> &str {
        match self {
            Line::Progress(text) | Line::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Line::Error(_))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
