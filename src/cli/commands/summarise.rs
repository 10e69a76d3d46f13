//! Summarise command implementation

use crate::cli::args::SummariseArgs;
use crate::cli::commands::shared::{open_input, until_cancelled};
use crate::error::Result;
use crate::pipeline::{PipelineReport, summarise};
use colored::*;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Fold the input and print the summary as JSON on standard output
pub async fn run_summarise(
    args: SummariseArgs,
    quiet: bool,
    cancellation_token: CancellationToken,
) -> Result<()> {
    let config = args.pipeline_config()?;
    let start_time = Instant::now();

    info!(
        "Summarising {} (chunk size {}, {})",
        args.input
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "standard input".to_string()),
        config.chunk_size,
        if config.presorted {
            "presorted".to_string()
        } else {
            format!("sorted by '{}'", config.sort.command)
        }
    );

    let input = open_input(args.input.as_deref()).await?;
    let report = until_cancelled(&cancellation_token, summarise(input, &config)).await?;

    let summary = report.summary.report();
    let json = if args.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{}", json);

    if !quiet {
        print_run_report(&report, start_time.elapsed().as_millis());
    }
    Ok(())
}

fn print_run_report(report: &PipelineReport, elapsed_ms: u128) {
    let stats = &report.stats;
    eprintln!("\n{}", "Telemetry Summary".bright_green().bold());
    eprintln!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        elapsed_ms.to_string().bright_white()
    );
    eprintln!(
        "  {} {}",
        "Lines read:".bright_cyan(),
        stats.lines_read.to_string().bright_white()
    );
    eprintln!(
        "  {} {} ({:.1}%)",
        "Observations:".bright_cyan(),
        stats.observations.to_string().bright_white().bold(),
        stats.acceptance_rate()
    );
    if stats.rejected > 0 {
        eprintln!(
            "  {} {}",
            "Rejected lines:".bright_yellow(),
            stats.rejected.to_string().bright_yellow().bold()
        );
    }
    eprintln!(
        "  {} {:.3} km",
        "Distance:".bright_cyan(),
        report.summary.distance.value()
    );
    eprintln!(
        "  {} {}",
        "Stations:".bright_cyan(),
        report.summary.station_counts.counts().len().to_string().bright_white()
    );
}
