//! Convert command implementation

use crate::cli::args::ConvertArgs;
use crate::cli::commands::shared::{open_input, until_cancelled};
use crate::config::{DistanceUnit, TemperatureUnit};
use crate::error::Result;
use crate::grammar::ObservationCodec;
use crate::pipeline::convert_reader;
use tokio::io::BufWriter;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Re-print accepted lines from the input in the requested units
pub async fn run_convert(args: ConvertArgs, cancellation_token: CancellationToken) -> Result<()> {
    // Units are checked before any input is opened
    let distance: DistanceUnit = args.distance_unit.parse()?;
    let temperature: TemperatureUnit = args.temperature_unit.parse()?;
    let config = args.pipeline_config()?;

    info!("Converting to {} and {}", distance, temperature);

    let codec = ObservationCodec::display(distance, temperature);
    let input = open_input(args.input.as_deref()).await?;
    let mut output = BufWriter::new(tokio::io::stdout());

    let stats = until_cancelled(
        &cancellation_token,
        convert_reader(input, &mut output, &codec, &config),
    )
    .await?;

    info!(
        "{} lines written, {} rejected",
        stats.observations, stats.rejected
    );
    Ok(())
}
