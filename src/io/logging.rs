//! Logger installation for the command-line tool

use crate::io::error::{Result, io_error};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::path::Path;

/// Map the quiet flag and verbosity count to a level filter
pub const fn level_filter(quiet: bool, verbose: u8) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger: stderr, plus a log file when requested
///
/// Installing twice is harmless; the first logger stays in place.
///
/// # Errors
///
/// Returns an error if the log file cannot be created
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file {
        let file = std::fs::File::create(path).map_err(|e| io_error(path, "create log file", e))?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }

    if CombinedLogger::init(loggers).is_err() {
        log::debug!("Logger already installed");
    }
    Ok(())
}
