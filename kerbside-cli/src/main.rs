//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use env_logger::Env;
use kerbside_cli::CliError;
use log::error;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    match kerbside_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
