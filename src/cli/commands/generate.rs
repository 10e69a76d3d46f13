//! Generate command implementation

use crate::cli::args::GenerateArgs;
use crate::cli::commands::shared::until_cancelled;
use crate::error::Result;
use crate::generate::ObservationGenerator;
use tokio::io::BufWriter;
use tokio_util::sync::CancellationToken;

/// Write random lines to standard output
pub async fn run_generate(args: GenerateArgs, cancellation_token: CancellationToken) -> Result<()> {
    let config = args.generate_config()?;
    let mut generator = ObservationGenerator::new(&config)?;
    let mut output = BufWriter::new(tokio::io::stdout());

    until_cancelled(
        &cancellation_token,
        generator.write_lines(config.count, &mut output),
    )
    .await?;
    Ok(())
}
