//! CLI entry point for treasure map reconstruction

use clap::Parser;
use std::process::ExitCode;
use treasuremap::io::cli::{Cli, MapProcessor};
use treasuremap::io::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = logging::level_filter(cli.quiet, cli.verbose);
    if let Err(err) = logging::init(level, cli.log_file.as_deref()) {
        log::error!("{err}");
        return ExitCode::FAILURE;
    }

    let mut processor = MapProcessor::new(cli);
    match processor.process() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) if err.is_empty_input() => {
            log::warn!("{err}");
            ExitCode::from(2)
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
