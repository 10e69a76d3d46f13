//! Application constants for station telemetry processing
//!
//! Unit conversion factors, wire format bounds, pipeline defaults and the
//! floating-point tolerance used when comparing accumulated values.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Offset between the Celsius and Kelvin scales
pub const KELVIN_OFFSET: f64 = 273.15;

/// Fahrenheit degrees per Kelvin
pub const FAHRENHEIT_SCALE: f64 = 1.8;

/// Freezing point of water in Fahrenheit
pub const FAHRENHEIT_OFFSET: f64 = 32.0;

/// Miles per kilometre
pub const MILES_PER_KILOMETRE: f64 = 0.62137;

/// Metres per kilometre
pub const METRES_PER_KILOMETRE: f64 = 1000.0;

// =============================================================================
// Wire Format
// =============================================================================

/// Station codes with fixed native units
pub mod station_codes {
    /// Celsius temperatures, kilometre coordinates
    pub const AUSTRALIA: &str = "AU";

    /// Kelvin temperatures, metre coordinates
    pub const FRANCE: &str = "FR";

    /// Fahrenheit temperatures, mile coordinates
    pub const UNITED_STATES: &str = "US";
}

/// Field separator between coordinates, temperature and station code
pub const FIELD_SEPARATOR: &str = "|";

/// Largest magnitude of a wire integer, in either direction.
///
/// Well below 2^53, so a value taken through any unit conversion and back
/// still rounds to the integer it started from.
pub const MAX_WIRE_MAGNITUDE: f64 = 1_000_000_000_000.0;

/// Days in each month, January first. February is always 28.
pub const DAYS_IN_MONTH: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

// =============================================================================
// Pipeline Defaults
// =============================================================================

/// Bytes requested from the source per read
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// External total-order sort utility
pub const DEFAULT_SORT_COMMAND: &str = "sort";

/// Environment variable overriding the chunk size
pub const ENV_CHUNK_SIZE: &str = "STATION_TELEMETRY_CHUNK_SIZE";

/// Environment variable overriding the sort command
pub const ENV_SORT_COMMAND: &str = "STATION_TELEMETRY_SORT_COMMAND";

// =============================================================================
// Generation Defaults
// =============================================================================

/// Number of lines emitted by the generator when unspecified
pub const DEFAULT_GENERATE_COUNT: usize = 1000;

/// Fraction of generated lines that are junk when unspecified
pub const DEFAULT_JUNK_FACTOR: f64 = 0.05;

// =============================================================================
// Numeric Comparison
// =============================================================================

/// Relative tolerance for comparing accumulated floating point values.
///
/// Two values match when `|a - b| <= TOLERANCE * max(1, |a|, |b|)`, which is
/// an absolute bound for magnitudes up to one.
pub const TOLERANCE: f64 = 1e-12;
