//! Streaming pipeline from raw bytes to a summary.
//!
//! Stages run in order on a single task: byte chunks, then lines, then
//! optional observations, then a left fold into one [`Summary`]. Malformed
//! lines are counted and dropped. A source I/O error ends the run without
//! producing a summary.

pub mod lines;

#[cfg(test)]
pub mod tests;

pub use lines::{LineDecoder, chunk_stream, line_stream};

use crate::config::PipelineConfig;
use crate::error::{Result, TelemetryError};
use crate::grammar::ObservationCodec;
use crate::models::Observation;
use crate::sort::ExternalSort;
use crate::summary::Summary;
use crate::summary::monoids::Monoid;

use futures::stream::{Stream, StreamExt};
use serde::Serialize;
use std::io;
use std::pin::pin;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// Line accounting for one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    /// Non-empty lines seen
    pub lines_read: u64,
    /// Lines that parsed into an observation
    pub observations: u64,
    /// Lines that did not
    pub rejected: u64,
}

impl PipelineStats {
    fn record(&mut self, accepted: bool) {
        self.lines_read += 1;
        if accepted {
            self.observations += 1;
        } else {
            self.rejected += 1;
        }
    }

    /// Fraction of lines that were accepted, as a percentage
    pub fn acceptance_rate(&self) -> f64 {
        if self.lines_read == 0 {
            0.0
        } else {
            (self.observations as f64 / self.lines_read as f64) * 100.0
        }
    }
}

/// Final summary together with the line accounting that produced it
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub summary: Summary,
    pub stats: PipelineStats,
}

fn parse_line(codec: &ObservationCodec, line: &[u8]) -> Option<Observation> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|text| codec.parse_line(text))
}

fn ensure_chunk_size(config: &PipelineConfig) -> Result<()> {
    if config.chunk_size == 0 {
        return Err(TelemetryError::configuration(
            "chunk size must be greater than zero",
        ));
    }
    Ok(())
}

/// One item per non-empty line: the observation, or `None` if rejected
pub fn observation_stream<'a, R>(
    reader: R,
    codec: &'a ObservationCodec,
    config: &PipelineConfig,
) -> impl Stream<Item = io::Result<Option<Observation>>> + use<'a, R>
where
    R: AsyncRead + Unpin,
{
    line_stream(reader, config.chunk_size)
        .map(move |line| line.map(|line| parse_line(codec, &line)))
}

/// Fold every observation from an already-ordered source
pub async fn summarise_reader<R>(reader: R, config: &PipelineConfig) -> Result<PipelineReport>
where
    R: AsyncRead + Unpin,
{
    ensure_chunk_size(config)?;

    let codec = ObservationCodec::standard();
    let mut observations = pin!(observation_stream(reader, &codec, config));
    let mut summary = Summary::empty();
    let mut stats = PipelineStats::default();

    while let Some(parsed) = observations.next().await {
        match parsed? {
            Some(observation) => {
                summary = summary.push(&observation);
                stats.record(true);
            }
            None => stats.record(false),
        }
    }

    info!(
        "Folded {} observations from {} lines ({} rejected)",
        stats.observations, stats.lines_read, stats.rejected
    );

    Ok(PipelineReport { summary, stats })
}

/// Sort the source unless it is presorted, then fold it.
///
/// A failed sort withholds the summary even if its partial output folded.
pub async fn summarise<R>(reader: R, config: &PipelineConfig) -> Result<PipelineReport>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    config.validate()?;

    if config.presorted {
        debug!("Input marked presorted, skipping external sort");
        return summarise_reader(reader, config).await;
    }

    let (sorted, handle) = ExternalSort::spawn(reader, &config.sort)?;
    let report = summarise_reader(sorted, config).await?;
    handle.wait().await?;
    Ok(report)
}

/// Re-print every accepted line through `codec`, one line each
pub async fn convert_reader<R, W>(
    reader: R,
    mut writer: W,
    codec: &ObservationCodec,
    config: &PipelineConfig,
) -> Result<PipelineStats>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    ensure_chunk_size(config)?;

    let source = ObservationCodec::standard();
    let mut observations = pin!(observation_stream(reader, &source, config));
    let mut stats = PipelineStats::default();

    while let Some(parsed) = observations.next().await {
        let printed = parsed?.and_then(|observation| codec.print_line(&observation));
        match printed {
            Some(line) => {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                stats.record(true);
            }
            None => stats.record(false),
        }
    }
    writer.flush().await?;

    info!(
        "Converted {} of {} lines ({} rejected)",
        stats.observations, stats.lines_read, stats.rejected
    );

    Ok(stats)
}
