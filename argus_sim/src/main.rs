// argus_sim/src/main.rs

use std::process::ExitCode;

use argus_sim::cli::Cli;
use argus_sim::logging::init_logging;
use clap::Parser;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match argus_sim::run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
