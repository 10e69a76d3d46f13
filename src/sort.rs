//! External total-order sort.
//!
//! Observation lines start with a fixed-width timestamp, so a plain byte
//! order sort of whole lines puts them in temporal order. The sort runs as
//! a child process with `LC_ALL=C`; the input is fed to its stdin from a
//! background task while the pipeline reads its stdout. Its stderr is
//! drained by a third task so a chatty sort cannot block on a full pipe.

use crate::config::SortConfig;
use crate::error::{Result, TelemetryError};
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Spawner for the configured sort program
pub struct ExternalSort;

impl ExternalSort {
    /// Start sorting `input`, returning the sorted byte stream and a handle
    /// that must be awaited once the stream has been drained.
    pub fn spawn<R>(input: R, config: &SortConfig) -> Result<(ChildStdout, SortHandle)>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        config.validate()?;

        let mut child = Command::new(&config.command)
            .args(&config.args)
            .env("LC_ALL", "C")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                TelemetryError::sort_failed(format!("could not start '{}': {}", config.command, e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TelemetryError::sort_failed("sort stdin was not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TelemetryError::sort_failed("sort stdout was not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| TelemetryError::sort_failed("sort stderr was not captured"))?;

        info!("Sorting input with '{}'", config.command);

        let feeder = tokio::spawn(async move {
            let mut input = input;
            let mut stdin = stdin;
            let copied = tokio::io::copy(&mut input, &mut stdin).await?;
            stdin.shutdown().await?;
            debug!("Fed {} bytes to external sort", copied);
            Ok::<_, std::io::Error>(copied)
        });

        let diagnostics = tokio::spawn(async move {
            let mut captured = Vec::new();
            stderr.read_to_end(&mut captured).await?;
            Ok::<_, std::io::Error>(captured)
        });

        Ok((
            stdout,
            SortHandle {
                command: config.command.clone(),
                child,
                feeder,
                diagnostics,
            },
        ))
    }
}

/// Completion handle for a running sort
pub struct SortHandle {
    command: String,
    child: Child,
    feeder: JoinHandle<std::io::Result<u64>>,
    diagnostics: JoinHandle<std::io::Result<Vec<u8>>>,
}

impl SortHandle {
    /// Wait for the sort to exit.
    ///
    /// A non-zero exit status, or a failure while feeding its input, is
    /// reported as [`TelemetryError::SortFailed`].
    pub async fn wait(mut self) -> Result<()> {
        let status = self.child.wait().await?;
        let stderr = match self.diagnostics.await {
            Ok(Ok(captured)) => String::from_utf8_lossy(&captured).into_owned(),
            Ok(Err(e)) => format!("<stderr unreadable: {}>", e),
            Err(e) => format!("<stderr task failed: {}>", e),
        };
        if !status.success() {
            return Err(TelemetryError::sort_failed(format!(
                "'{}' exited with {}: {}",
                self.command,
                status,
                stderr.trim()
            )));
        }
        if !stderr.trim().is_empty() {
            debug!("External sort reported: {}", stderr.trim());
        }

        match self.feeder.await {
            Ok(Ok(bytes)) => {
                debug!("External sort finished after {} bytes", bytes);
                Ok(())
            }
            Ok(Err(e)) => Err(TelemetryError::sort_failed(format!(
                "feeding input failed: {}",
                e
            ))),
            Err(e) => Err(TelemetryError::sort_failed(format!(
                "input feeder task failed: {}",
                e
            ))),
        }
    }
}
