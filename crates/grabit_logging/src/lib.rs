#![deny(missing_docs)]
//! Shared logging utilities for the grabit workspace.
//!
//! The engine reports progress and warnings through the `log` facade; the
//! binary decides where those records go. This crate holds the simplelog
//! initializers so the CLI and the test suites configure logging the same way.

use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, ConfigBuilder, TermLogger, TerminalMode};

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

/// Initializes a terminal logger at the given level.
///
/// Writer notices ("saved", "skipped") are emitted at info level, so the CLI
/// normally passes `LevelFilter::Info`. Safely no-ops if a logger has already
/// been installed.
pub fn initialize_terminal(level: LevelFilter) {
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        build_config(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
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

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
