//! Core data structures for station telemetry.
//!
//! Observations are always held in normalised units: coordinates in
//! kilometres and temperatures in Kelvin. Conversion from each station's
//! native units happens once, in the grammar.

use crate::constants::station_codes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location in kilometres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Two-letter uppercase station code
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationCode(String);

impl StationCode {
    /// Validate and wrap a station code
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        let valid = code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase());
        valid.then_some(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve the unit dispatch variant for this code
    pub fn kind(&self) -> StationKind {
        StationKind::of(self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unit system selected by station code
///
/// Fixed codes are matched first; every other code is `Generic` and is
/// already in kilometres and Kelvin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationKind {
    /// Celsius temperatures, kilometre coordinates
    Australia,
    /// Kelvin temperatures, metre coordinates
    France,
    /// Fahrenheit temperatures, mile coordinates
    UnitedStates,
    /// Kelvin temperatures, kilometre coordinates
    Generic,
}

impl StationKind {
    pub fn of(code: &str) -> Self {
        match code {
            station_codes::AUSTRALIA => StationKind::Australia,
            station_codes::FRANCE => StationKind::France,
            station_codes::UNITED_STATES => StationKind::UnitedStates,
            _ => StationKind::Generic,
        }
    }
}

/// A single normalised station observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// UTC instant at minute precision
    pub timestamp: DateTime<Utc>,
    /// Location in kilometres
    pub location: Point,
    /// Temperature in Kelvin
    pub temperature: f64,
    pub station: StationCode,
}

impl Observation {
    pub fn new(
        timestamp: DateTime<Utc>,
        location: Point,
        temperature: f64,
        station: StationCode,
    ) -> Self {
        Self {
            timestamp,
            location,
            temperature,
            station,
        }
    }
}

/// Location, temperature and station of one line, without its timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub location: Point,
    pub temperature: f64,
    pub station: StationCode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let origin = Point::new(0.0, 0.0);
        let target = Point::new(3.0, 4.0);
        assert_eq!(origin.distance_to(&target), 5.0);
        assert_eq!(target.distance_to(&origin), 5.0);
        assert_eq!(target.distance_to(&target), 0.0);
    }

    #[test]
    fn test_station_code_validation() {
        assert!(StationCode::new("AU").is_some());
        assert!(StationCode::new("ZZ").is_some());
        assert!(StationCode::new("au").is_none());
        assert!(StationCode::new("A").is_none());
        assert!(StationCode::new("AUS").is_none());
        assert!(StationCode::new("A1").is_none());
    }

    #[test]
    fn test_station_kind_dispatch() {
        assert_eq!(StationKind::of("AU"), StationKind::Australia);
        assert_eq!(StationKind::of("FR"), StationKind::France);
        assert_eq!(StationKind::of("US"), StationKind::UnitedStates);
        assert_eq!(StationKind::of("GB"), StationKind::Generic);
    }
}
