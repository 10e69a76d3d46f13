//! Command implementations for the station telemetry CLI
//!
//! Each subcommand lives in its own module. All of them read from a file
//! or standard input and write data to standard output, leaving standard
//! error for logs and the run report.

pub mod convert;
pub mod generate;
pub mod shared;
pub mod summarise;

use crate::cli::args::{Args, Commands};
use crate::error::{Result, TelemetryError};
use tokio_util::sync::CancellationToken;

/// Dispatch to the subcommand handler
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<()> {
    let quiet = args.quiet;
    match args.command {
        Some(Commands::Summarise(summarise_args)) => {
            summarise::run_summarise(summarise_args, quiet, cancellation_token).await
        }
        Some(Commands::Convert(convert_args)) => {
            convert::run_convert(convert_args, cancellation_token).await
        }
        Some(Commands::Generate(generate_args)) => {
            generate::run_generate(generate_args, cancellation_token).await
        }
        None => Err(TelemetryError::configuration("no subcommand given")),
    }
}
