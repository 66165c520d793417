#![deny(missing_docs)]
//! Shared logging utilities for the blogsmith workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! the application logger setup and a minimal test initializer for the global
//! logger.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file, relative to the current working directory.
pub const DEFAULT_LOG_FILE: &str = "./blogsmith.log";

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given file (truncated on startup).
    File(PathBuf),
    /// Write to the terminal (stderr for warnings and errors).
    Terminal,
    /// Write to both the file and the terminal.
    Both(PathBuf),
}

impl Default for LogDestination {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_LOG_FILE))
    }
}

/// Initialize the global logger with the specified destination and level.
///
/// A file that cannot be created is reported on stderr and skipped; a logger
/// that was already installed is left in place.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File(path) => match create_file_logger(&path, level, config) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => vec![TermLogger::new(
            level,
            config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )],
        LogDestination::Both(path) => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) = create_file_logger(&path, level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

/// Parses a destination name: `file`, `terminal` or `both`.
///
/// File destinations use [`DEFAULT_LOG_FILE`]; unknown names yield `None`.
pub fn parse_destination(name: &str) -> Option<LogDestination> {
    match name.trim().to_ascii_lowercase().as_str() {
        "file" => Some(LogDestination::default()),
        "terminal" => Some(LogDestination::Terminal),
        "both" => Some(LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE))),
        _ => None,
    }
}

/// Parses a level name such as `debug` or `WARN`, as found in `RUST_LOG`.
///
/// Unknown names yield `None` so callers can fall back to their default.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse::<LevelFilter>().ok()
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
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
