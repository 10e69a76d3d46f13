//! Configuration management and validation.
//!
//! Provides the display units for the conversion workflow and the
//! settings for the streaming pipeline, the external sort and the
//! synthetic generator. Defaults can be overridden from the environment,
//! and command-line flags override both.

use crate::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_GENERATE_COUNT, DEFAULT_JUNK_FACTOR, DEFAULT_SORT_COMMAND,
    ENV_CHUNK_SIZE, ENV_SORT_COMMAND,
};
use crate::error::{Result, TelemetryError};
use crate::grammar::iso::{
    Iso, celsius_to_kelvin, fahrenheit_to_kelvin, identity, metres_to_kilometres,
    miles_to_kilometres,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Distance unit for printed coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Kilometres,
    Miles,
    Metres,
}

impl DistanceUnit {
    /// Isomorphism from this unit to kilometres
    pub fn to_kilometres(&self) -> Iso<f64, f64> {
        match self {
            DistanceUnit::Kilometres => identity(),
            DistanceUnit::Miles => miles_to_kilometres(),
            DistanceUnit::Metres => metres_to_kilometres(),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            DistanceUnit::Kilometres => "km",
            DistanceUnit::Miles => "mi",
            DistanceUnit::Metres => "m",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "km" => Ok(DistanceUnit::Kilometres),
            "mi" => Ok(DistanceUnit::Miles),
            "m" => Ok(DistanceUnit::Metres),
            _ => Err(TelemetryError::invalid_distance_unit(s)),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Temperature unit for printed readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Kelvin,
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    /// Isomorphism from this unit to Kelvin
    pub fn to_kelvin(&self) -> Iso<f64, f64> {
        match self {
            TemperatureUnit::Kelvin => identity(),
            TemperatureUnit::Fahrenheit => fahrenheit_to_kelvin(),
            TemperatureUnit::Celsius => celsius_to_kelvin(),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Kelvin => "k",
            TemperatureUnit::Fahrenheit => "f",
            TemperatureUnit::Celsius => "c",
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "k" => Ok(TemperatureUnit::Kelvin),
            "f" => Ok(TemperatureUnit::Fahrenheit),
            "c" => Ok(TemperatureUnit::Celsius),
            _ => Err(TelemetryError::invalid_temperature_unit(s)),
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// External sort invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortConfig {
    /// Program to run; must read stdin and write sorted lines to stdout
    pub command: String,

    /// Extra arguments passed to the program
    pub args: Vec<String>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_SORT_COMMAND.to_string(),
            args: Vec::new(),
        }
    }
}

impl SortConfig {
    /// Set the sort program
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Set the arguments passed to the sort program
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(TelemetryError::configuration("sort command must not be empty"));
        }
        Ok(())
    }
}

/// Streaming pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Bytes requested from the source per read
    pub chunk_size: usize,

    /// Input is already in timestamp order; skip the external sort
    pub presorted: bool,

    /// External sort used when the input is not presorted
    pub sort: SortConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            presorted: false,
            sort: SortConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Set the read chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Mark the input as already sorted
    pub fn with_presorted(mut self) -> Self {
        self.presorted = true;
        self
    }

    /// Configure the external sort
    pub fn with_sort(mut self, sort: SortConfig) -> Self {
        self.sort = sort;
        self
    }

    /// Layer process environment overrides over this configuration
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Layer overrides from `lookup` over this configuration.
    ///
    /// An unparsable chunk size is a configuration error rather than being
    /// silently ignored.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_CHUNK_SIZE) {
            self.chunk_size = value.trim().parse().map_err(|_| {
                TelemetryError::configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_CHUNK_SIZE, value
                ))
            })?;
            debug!("Chunk size overridden from environment: {}", self.chunk_size);
        }

        if let Some(command) = lookup(ENV_SORT_COMMAND) {
            debug!("Sort command overridden from environment: {}", command);
            self.sort.command = command;
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(TelemetryError::configuration(
                "chunk size must be greater than zero",
            ));
        }
        if !self.presorted {
            self.sort.validate()?;
        }
        Ok(())
    }
}

/// Synthetic generator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Number of lines to emit
    pub count: usize,

    /// Probability that a line is junk rather than an observation
    pub junk_factor: f64,

    /// Seed for reproducible output; entropy when absent
    pub seed: Option<u64>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_GENERATE_COUNT,
            junk_factor: DEFAULT_JUNK_FACTOR,
            seed: None,
        }
    }
}

impl GenerateConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_junk_factor(mut self, junk_factor: f64) -> Self {
        self.junk_factor = junk_factor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.junk_factor) {
            return Err(TelemetryError::configuration(format!(
                "junk factor must be within [0, 1], got {}",
                self.junk_factor
            )));
        }
        Ok(())
    }
}
