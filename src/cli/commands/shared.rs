//! Shared components for CLI commands

use crate::cli::args::Args;
use crate::error::{Result, TelemetryError};
use std::future::Future;
use std::path::Path;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Byte source for a command
pub type Input = Box<dyn AsyncRead + Unpin + Send>;

/// Set up structured logging on standard error
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("station_telemetry={}", log_level)));

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| TelemetryError::configuration(format!("logging setup failed: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Open `path`, or standard input when absent
pub async fn open_input(path: Option<&Path>) -> Result<Input> {
    match path {
        Some(path) => {
            debug!("Reading from {}", path.display());
            let file = tokio::fs::File::open(path).await?;
            Ok(Box::new(file))
        }
        None => {
            debug!("Reading from standard input");
            Ok(Box::new(tokio::io::stdin()))
        }
    }
}

/// Run `work` unless the token is cancelled first
pub async fn until_cancelled<F, T>(cancellation_token: &CancellationToken, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        result = work => result,
        _ = cancellation_token.cancelled() => {
            Err(TelemetryError::interrupted("cancelled before completion"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_open_input_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "2020-01-01T00:00|0,0|280|GB").unwrap();

        let mut input = open_input(Some(file.path())).await.unwrap();
        let mut content = String::new();
        input.read_to_string(&mut content).await.unwrap();
        assert_eq!(content, "2020-01-01T00:00|0,0|280|GB\n");
    }

    #[tokio::test]
    async fn test_open_missing_input_is_io_error() {
        let result = open_input(Some(Path::new("/nonexistent/telemetry.txt"))).await;
        assert!(matches!(result, Err(TelemetryError::Io(_))));
    }

    #[tokio::test]
    async fn test_cancelled_work_is_interrupted() {
        let token = CancellationToken::new();
        token.cancel();
        let result: Result<()> = until_cancelled(&token, std::future::pending()).await;
        assert!(matches!(result, Err(TelemetryError::Interrupted { .. })));
    }

    #[tokio::test]
    async fn test_uncancelled_work_completes() {
        let token = CancellationToken::new();
        let result = until_cancelled(&token, async { Ok(7) }).await.unwrap();
        assert_eq!(result, 7);
    }
}
