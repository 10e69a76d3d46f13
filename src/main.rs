use anyhow::Context;
use clap::{CommandFactory, Parser};
use station_telemetry::TelemetryError;
use station_telemetry::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    let args = Args::parse();

    // Without a subcommand, show help and exit cleanly
    if args.command.is_none() {
        let _ = Args::command().print_help();
        println!();
        process::exit(0);
    }

    match run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    commands::shared::setup_logging(&args)?;

    let runtime = tokio::runtime::Runtime::new().context("failed to create async runtime")?;
    let command_name = args.command.as_ref().map(|c| c.name()).unwrap_or("command");

    runtime.block_on(async {
        let cancellation_token = CancellationToken::new();

        let shutdown_signal = async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler; never resolve so the command runs to completion
                std::future::pending::<()>().await;
            }
            cancellation_token.cancel();
        };

        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result.with_context(|| format!("{} failed", command_name))
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(TelemetryError::interrupted("interrupted by user").into())
            }
        }
    })
}
