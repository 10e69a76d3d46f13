//! Station Telemetry Library
//!
//! Normalises line-oriented telemetry from heterogeneous weather stations
//! and reduces it to one statistical summary.
//!
//! This library provides tools for:
//! - Parsing and printing observation lines from a single bidirectional grammar
//! - Converting each station's native units to kilometres and Kelvin
//! - Aggregating observations with lawful monoids, chunk by chunk
//! - Streaming large inputs through a bounded, ordered pipeline
//! - Delegating temporal ordering to an external sort
//! - Generating synthetic telemetry for testing

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod generate;
pub mod grammar;
pub mod models;
pub mod pipeline;
pub mod sort;
pub mod summary;

// Re-export commonly used types
pub use config::{DistanceUnit, GenerateConfig, PipelineConfig, SortConfig, TemperatureUnit};
pub use error::{Result, TelemetryError};
pub use grammar::ObservationCodec;
pub use models::{Observation, Point, StationCode, StationKind};
pub use pipeline::{PipelineReport, PipelineStats, convert_reader, summarise, summarise_reader};
pub use summary::{Summary, SummaryReport};
pub use summary::monoids::{ApproxEq, Monoid};
