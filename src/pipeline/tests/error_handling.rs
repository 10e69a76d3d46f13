//! Source failures and configuration errors

use super::FailingReader;
use crate::config::{PipelineConfig, SortConfig};
use crate::error::TelemetryError;
use crate::pipeline::{summarise, summarise_reader};

#[tokio::test]
async fn test_source_error_withholds_summary() {
    let reader = FailingReader::new(b"2020-01-01T00:00|0,0|280|GB\n2020-01-01T00:01|3,4|");
    let result = summarise_reader(reader, &PipelineConfig::default()).await;

    match result {
        Err(TelemetryError::Io(err)) => assert_eq!(err.to_string(), "source went away"),
        other => panic!("expected an I/O error, got {:?}", other.map(|r| r.stats)),
    }
}

#[tokio::test]
async fn test_immediate_source_error() {
    let reader = FailingReader::new(b"");
    let err = summarise_reader(reader, &PipelineConfig::default().with_chunk_size(1))
        .await
        .unwrap_err();
    assert!(matches!(err, TelemetryError::Io(_)));
}

#[tokio::test]
async fn test_zero_chunk_size_is_rejected_before_reading() {
    let reader = FailingReader::new(b"");
    let err = summarise_reader(reader, &PipelineConfig::default().with_chunk_size(0))
        .await
        .unwrap_err();
    assert!(err.is_configuration());
}

#[tokio::test]
async fn test_failed_sort_withholds_summary() {
    if !std::path::Path::new("/bin/sh").exists() {
        println!("Skipping test: /bin/sh not available");
        return;
    }

    let sort = SortConfig::default()
        .with_command("/bin/sh")
        .with_args(["-c", "cat; exit 2"]);
    let config = PipelineConfig::default().with_sort(sort);
    let input: &'static [u8] = b"2020-01-01T00:00|0,0|280|GB\n";

    let err = summarise(input, &config).await.unwrap_err();
    assert!(matches!(err, TelemetryError::SortFailed { .. }));
}

#[tokio::test]
async fn test_missing_sort_program_is_reported() {
    let sort = SortConfig::default().with_command("no-such-sort-program-on-path");
    let config = PipelineConfig::default().with_sort(sort);

    let err = summarise(&b""[..], &config).await.unwrap_err();
    assert!(matches!(err, TelemetryError::SortFailed { .. }));
}
