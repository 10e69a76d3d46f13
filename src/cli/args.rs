//! Command-line argument definitions for station telemetry
//!
//! This module defines the complete CLI interface using clap derive API.
//! Flags layer over environment overrides, which layer over defaults.

use crate::config::{GenerateConfig, PipelineConfig};
use crate::constants::{DEFAULT_GENERATE_COUNT, DEFAULT_JUNK_FACTOR};
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the station telemetry processor
///
/// Normalises heterogeneous weather station records and reduces them to a
/// single statistical summary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "station-telemetry",
    version,
    about = "Normalise, validate and summarise weather station telemetry",
    long_about = "Reads line-oriented telemetry of the form yyyy-mm-ddThh:mm|X,Y|T|CC, \
                  converts every station's native units to kilometres and Kelvin, drops \
                  malformed lines, and folds the rest into one summary: path distance, \
                  temperature extremes and mean, per-station counts, and the first and \
                  last recorded location."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors, and skip the run report
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Fold observations into one JSON summary
    Summarise(SummariseArgs),
    /// Re-print observations in chosen display units
    Convert(ConvertArgs),
    /// Emit random observation lines, mixed with junk
    Generate(GenerateArgs),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Summarise(_) => "summarise",
            Commands::Convert(_) => "convert",
            Commands::Generate(_) => "generate",
        }
    }
}

/// Arguments for the summarise command
#[derive(Debug, Clone, Parser)]
pub struct SummariseArgs {
    /// Input file; standard input when omitted
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Input is already in timestamp order
    ///
    /// Skips the external sort. Distance is only meaningful for input in
    /// timestamp order, so only pass this for input that really is sorted.
    #[arg(long)]
    pub presorted: bool,

    /// Bytes requested from the input per read
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// External program used to sort the input
    #[arg(long, value_name = "CMD")]
    pub sort_command: Option<String>,

    /// Pretty-print the JSON summary
    #[arg(long)]
    pub pretty: bool,
}

impl SummariseArgs {
    /// Defaults, then environment, then flags
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::default().with_env_overrides()?;
        if let Some(chunk_size) = self.chunk_size {
            config = config.with_chunk_size(chunk_size);
        }
        if let Some(command) = &self.sort_command {
            config.sort = config.sort.with_command(command.clone());
        }
        if self.presorted {
            config = config.with_presorted();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// Distance unit for printed coordinates
    #[arg(
        short = 'd',
        long = "distance-unit",
        value_name = "UNIT",
        long_help = "Distance unit for printed coordinates: km, mi or m (case-insensitive)"
    )]
    pub distance_unit: String,

    /// Temperature unit for printed readings
    #[arg(
        short = 't',
        long = "temperature-unit",
        value_name = "UNIT",
        long_help = "Temperature unit for printed readings: k, f or c (case-insensitive)"
    )]
    pub temperature_unit: String,

    /// Input file; standard input when omitted
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Bytes requested from the input per read
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,
}

impl ConvertArgs {
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::default()
            .with_env_overrides()?
            .with_presorted();
        if let Some(chunk_size) = self.chunk_size {
            config = config.with_chunk_size(chunk_size);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Arguments for the generate command
#[derive(Debug, Clone, Parser)]
pub struct GenerateArgs {
    /// Number of lines to emit
    #[arg(short = 'n', long, default_value_t = DEFAULT_GENERATE_COUNT)]
    pub count: usize,

    /// Probability in [0, 1] that a line is junk
    #[arg(short = 'j', long, default_value_t = DEFAULT_JUNK_FACTOR)]
    pub junk_factor: f64,

    /// Seed for reproducible output
    #[arg(short = 's', long)]
    pub seed: Option<u64>,
}

impl GenerateArgs {
    pub fn generate_config(&self) -> Result<GenerateConfig> {
        let mut config = GenerateConfig::default()
            .with_count(self.count)
            .with_junk_factor(self.junk_factor);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_summarise_flags() {
        let args = parse(&[
            "station-telemetry",
            "summarise",
            "--input",
            "data.txt",
            "--presorted",
            "--chunk-size",
            "128",
            "--pretty",
        ]);
        let Some(Commands::Summarise(summarise)) = args.command else {
            panic!("expected summarise");
        };
        assert_eq!(summarise.input, Some(PathBuf::from("data.txt")));
        assert!(summarise.presorted);
        assert!(summarise.pretty);

        let config = summarise.pipeline_config().unwrap();
        assert_eq!(config.chunk_size, 128);
        assert!(config.presorted);
    }

    #[test]
    fn test_sort_command_flag() {
        let args = parse(&["station-telemetry", "summarise", "--sort-command", "gsort"]);
        let Some(Commands::Summarise(summarise)) = args.command else {
            panic!("expected summarise");
        };
        assert_eq!(summarise.pipeline_config().unwrap().sort.command, "gsort");
    }

    #[test]
    fn test_zero_chunk_size_flag_rejected() {
        let args = parse(&["station-telemetry", "summarise", "--chunk-size", "0"]);
        let Some(Commands::Summarise(summarise)) = args.command else {
            panic!("expected summarise");
        };
        assert!(summarise.pipeline_config().unwrap_err().is_configuration());
    }

    #[test]
    fn test_convert_requires_units() {
        assert!(Args::try_parse_from(["station-telemetry", "convert"]).is_err());

        let args = parse(&[
            "station-telemetry",
            "convert",
            "--distance-unit",
            "MI",
            "--temperature-unit",
            "c",
        ]);
        let Some(Commands::Convert(convert)) = args.command else {
            panic!("expected convert");
        };
        assert_eq!(convert.distance_unit, "MI");
        assert!(convert.pipeline_config().unwrap().presorted);
    }

    #[test]
    fn test_generate_defaults_and_bounds() {
        let args = parse(&["station-telemetry", "generate", "--seed", "5"]);
        let Some(Commands::Generate(generate)) = args.command else {
            panic!("expected generate");
        };
        let config = generate.generate_config().unwrap();
        assert_eq!(config.count, DEFAULT_GENERATE_COUNT);
        assert_eq!(config.seed, Some(5));

        let args = parse(&["station-telemetry", "generate", "--junk-factor", "1.5"]);
        let Some(Commands::Generate(generate)) = args.command else {
            panic!("expected generate");
        };
        assert!(generate.generate_config().is_err());
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["station-telemetry"]).get_log_level(), "info");
        assert_eq!(parse(&["station-telemetry", "-v"]).get_log_level(), "debug");
        assert_eq!(
            parse(&["station-telemetry", "generate", "--quiet"]).get_log_level(),
            "warn"
        );
        assert!(Args::try_parse_from(["station-telemetry", "-v", "-q"]).is_err());
    }
}
