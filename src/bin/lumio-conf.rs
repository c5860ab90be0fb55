//! lumio-conf binary: parse flags, set up logging, run and map the
//! outcome to an exit code.

use clap::Parser;
use lumio_conf::cli::{error_line, Cli, RunContext};
use lumio_conf::logging::init_logging;
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let context = match RunContext::from_cli(&cli) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("{}", error_line(&e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    match context.execute() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("run aborted: {e:#}");
            eprintln!("{}", error_line(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}
