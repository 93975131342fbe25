//! Writes run events to the terminal: progress to stdout, errors to stderr.

use std::io::{self, Stderr, Stdout, Write};

use timehook_core::{Line, ProcessOutcome};
use timehook_engine::RunEvent;

pub struct Console<O, E> {
    out: O,
    err: E,
    outcome: Option<ProcessOutcome>,
}

impl Console<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Console<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            outcome: None,
        }
    }

    /// Lines carry their own newlines, so each one is written as-is and flushed
    /// straight away to keep `.` ticks visible.
    pub fn show(&mut self, event: &RunEvent) -> io::Result<()> {
        match event {
            RunEvent::Line(Line::Progress(text)) => {
                self.out.write_all(text.as_bytes())?;
                self.out.flush()
            }
            RunEvent::Line(Line::Error(text)) => {
                self.out.flush()?;
                self.err.write_all(text.as_bytes())?;
                self.err.flush()
            }
            RunEvent::Finished(outcome) => {
                self.outcome = Some(*outcome);
                Ok(())
            }
        }
    }

    pub fn outcome(&self) -> Option<ProcessOutcome> {
        self.outcome
    }
}
