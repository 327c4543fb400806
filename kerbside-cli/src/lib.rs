//! Command-line interface for Kerbside route accessibility analysis.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod analyze;
mod error;

use analyze::{AnalyzeArgs, run_analyze};
pub use error::CliError;

pub(crate) const ARG_ROUTES: &str = "routes";
pub(crate) const ARG_SIDEWALKS: &str = "sidewalks";
pub(crate) const ARG_STREETLIGHTS: &str = "streetlights";
pub(crate) const ARG_TREES: &str = "trees";
pub(crate) const ARG_CURB_RAMPS: &str = "curb-ramps";
pub(crate) const ARG_SPEED_LIMITS: &str = "speed-limits";
pub(crate) const ARG_CENTERLINES: &str = "centerlines";
pub(crate) const ARG_ANALYSIS_CONFIG: &str = "analysis-config";
pub(crate) const ENV_ROUTES: &str = "KERBSIDE_CMDS_ANALYZE_ROUTES";

/// Run the Kerbside CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, inputs
/// cannot be loaded, or the output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Analyze(args) => run_analyze(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "kerbside",
    about = "Accessibility flagging and ranking for walking routes",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyse and rank candidate routes against infrastructure layers.
    Analyze(AnalyzeArgs),
}

#[cfg(test)]
mod tests;
