#![deny(missing_docs)]
//! Shared logging utilities for the timehook workspace.
//!
//! This crate provides the `hook_*` logging macros used across the codebase,
//! the logger setup used by the command-line client, and a minimal test
//! initializer for the global logger.
//!
//! Diagnostics never go to stdout: stdout is reserved for webhook progress.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Target used by every `hook_*` macro, so the whole client can be filtered as one.
pub const LOG_TARGET: &str = "timehook";

/// Logs a debug-level message under the timehook target.
#[macro_export]
macro_rules! hook_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the timehook target.
#[macro_export]
macro_rules! hook_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the timehook target.
#[macro_export]
macro_rules! hook_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the timehook target.
#[macro_export]
macro_rules! hook_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Where diagnostic output is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Maximum level; `LevelFilter::Off` disables the terminal logger.
    pub level: LevelFilter,
    /// Optional file that receives the same records as the terminal.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::Off,
            file: None,
        }
    }
}

impl LogSettings {
    /// Returns true when no logger would be installed.
    pub fn is_disabled(&self) -> bool {
        self.level == LevelFilter::Off
    }
}

/// Initialize the global logger for the command-line client.
///
/// Terminal records go to stderr. When `settings.file` is set the file is
/// created (truncated) and receives the same records. Calling this twice is
/// harmless; the second call keeps the first logger.
pub fn initialize(settings: &LogSettings) -> io::Result<()> {
    if settings.is_disabled() {
        return Ok(());
    }

    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        settings.level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = &settings.file {
        let file = File::create(path)?;
        loggers.push(WriteLogger::new(settings.level, config, file));
    }

    let _ = CombinedLogger::init(loggers);
    Ok(())
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
