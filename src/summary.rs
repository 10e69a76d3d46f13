//! Aggregate statistics over a stream of observations.
//!
//! [`Summary`] is itself a monoid built from the catalog in [`monoids`].
//! Every field combines independently except `distance`, which also
//! bridges the gap between the last location of the left operand and the
//! first location of the right one. That makes summaries of consecutive
//! chunks combine to the summary of the whole, provided the observations
//! were in timestamp order before chunking.

pub mod monoids;

use crate::models::{Observation, Point};
use monoids::{Additive, ApproxEq, First, GroupBy, Last, Max, Mean, Min, Monoid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Composite aggregate of distance, temperature and station statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Path length in kilometres; never negative
    pub distance: Additive,
    pub first_location: First<Point>,
    pub last_location: Last<Point>,
    pub min_temp: Min,
    pub max_temp: Max,
    pub mean_temp: Mean,
    pub station_counts: GroupBy,
}

impl Summary {
    /// Summary of exactly one observation
    pub fn from_observation(observation: &Observation) -> Self {
        Self {
            distance: Additive(0.0),
            first_location: First(Some(observation.location)),
            last_location: Last(Some(observation.location)),
            min_temp: Min(observation.temperature),
            max_temp: Max(observation.temperature),
            mean_temp: Mean::of(observation.temperature),
            station_counts: GroupBy::single(observation.station.as_str()),
        }
    }

    /// Fold a chunk of observations, in order
    pub fn from_observations<'a, I>(observations: I) -> Self
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        observations
            .into_iter()
            .fold(Self::empty(), |acc, observation| acc.push(observation))
    }

    /// Combine one more observation onto the right
    pub fn push(&self, observation: &Observation) -> Self {
        self.combine(&Self::from_observation(observation))
    }

    /// Number of observations folded
    pub fn observation_count(&self) -> u64 {
        self.mean_temp.count
    }

    pub fn is_empty(&self) -> bool {
        self.observation_count() == 0
    }

    /// Serializable view with identity sentinels mapped to `null`
    pub fn report(&self) -> SummaryReport {
        SummaryReport {
            distance: self.distance.value(),
            min_temp: finite(self.min_temp.value()),
            max_temp: finite(self.max_temp.value()),
            mean_temp: self.mean_temp.value(),
            observatory_count: self.station_counts.counts().clone(),
            first_location: self.first_location.value().copied(),
            last_location: self.last_location.value().copied(),
        }
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl Default for Summary {
    fn default() -> Self {
        Self::empty()
    }
}

impl Monoid for Summary {
    fn empty() -> Self {
        Self {
            distance: Additive::empty(),
            first_location: First::empty(),
            last_location: Last::empty(),
            min_temp: Min::empty(),
            max_temp: Max::empty(),
            mean_temp: Mean::empty(),
            station_counts: GroupBy::empty(),
        }
    }

    fn combine(&self, other: &Self) -> Self {
        let distance = match (self.last_location.value(), other.first_location.value()) {
            (Some(left_end), Some(right_start)) => Additive(left_end.distance_to(right_start))
                .combine(&self.distance)
                .combine(&other.distance),
            (None, _) => other.distance,
            (Some(_), None) => self.distance,
        };

        Self {
            distance,
            first_location: self.first_location.combine(&other.first_location),
            last_location: self.last_location.combine(&other.last_location),
            min_temp: self.min_temp.combine(&other.min_temp),
            max_temp: self.max_temp.combine(&other.max_temp),
            mean_temp: self.mean_temp.combine(&other.mean_temp),
            station_counts: self.station_counts.combine(&other.station_counts),
        }
    }
}

impl ApproxEq for Summary {
    fn approx_eq(&self, other: &Self) -> bool {
        self.distance.approx_eq(&other.distance)
            && self.first_location.approx_eq(&other.first_location)
            && self.last_location.approx_eq(&other.last_location)
            && self.min_temp.approx_eq(&other.min_temp)
            && self.max_temp.approx_eq(&other.max_temp)
            && self.mean_temp.approx_eq(&other.mean_temp)
            && self.station_counts.approx_eq(&other.station_counts)
    }
}

/// Final aggregate as emitted to consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub distance: f64,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub mean_temp: Option<f64>,
    pub observatory_count: BTreeMap<String, u64>,
    pub first_location: Option<Point>,
    pub last_location: Option<Point>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StationCode;
    use chrono::{TimeZone, Utc};

    fn observation(minute: u32, x: f64, y: f64, temperature: f64, station: &str) -> Observation {
        Observation::new(
            Utc.with_ymd_and_hms(2020, 1, 1, 0, minute, 0).unwrap(),
            Point::new(x, y),
            temperature,
            StationCode::new(station).unwrap(),
        )
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::empty();
        assert!(summary.is_empty());
        assert_eq!(summary.distance.value(), 0.0);
        assert_eq!(summary.mean_temp.value(), None);
        assert_eq!(summary.first_location.value(), None);
        assert_eq!(summary.last_location.value(), None);
        assert_eq!(summary.station_counts.total(), 0);
    }

    #[test]
    fn test_single_observation() {
        let summary = Summary::from_observation(&observation(0, 1.0, 2.0, 280.0, "AU"));
        assert_eq!(summary.distance.value(), 0.0);
        assert_eq!(summary.first_location.value(), Some(&Point::new(1.0, 2.0)));
        assert_eq!(summary.last_location.value(), Some(&Point::new(1.0, 2.0)));
        assert_eq!(summary.min_temp.value(), 280.0);
        assert_eq!(summary.max_temp.value(), 280.0);
        assert_eq!(summary.mean_temp.value(), Some(280.0));
        assert_eq!(summary.station_counts.count("AU"), 1);
    }

    #[test]
    fn test_distance_bridges_chunks() {
        let chunk_a = [
            observation(0, 0.0, 0.0, 280.0, "AU"),
            observation(1, 3.0, 4.0, 282.0, "AU"),
        ];
        let chunk_b = [
            observation(2, 3.0, 4.0, 278.0, "FR"),
            observation(3, 3.0, 4.0, 279.0, "FR"),
        ];

        let a = Summary::from_observations(&chunk_a);
        let b = Summary::from_observations(&chunk_b);
        assert_eq!(a.distance.value(), 5.0);
        assert_eq!(b.distance.value(), 0.0);
        assert_eq!(a.combine(&b).distance.value(), 5.0);

        let bridged = Summary::from_observations(&chunk_a[..1])
            .combine(&Summary::from_observations(&chunk_b[..1]));
        assert_eq!(bridged.distance.value(), 5.0);
    }

    #[test]
    fn test_every_split_matches_whole_fold() {
        let observations: Vec<Observation> = (0..8)
            .map(|i| {
                let i = f64::from(i);
                observation(i as u32, i * 1.5, (i * 0.7).sin() * 10.0 + 10.0, 270.0 + i, "GB")
            })
            .collect();
        let whole = Summary::from_observations(&observations);

        for split in 0..=observations.len() {
            let (left, right) = observations.split_at(split);
            let combined =
                Summary::from_observations(left).combine(&Summary::from_observations(right));
            assert!(combined.approx_eq(&whole), "split at {} diverged", split);
        }
    }

    #[test]
    fn test_combine_with_empty_keeps_distance() {
        let chunk = [
            observation(0, 0.0, 0.0, 280.0, "AU"),
            observation(1, 6.0, 8.0, 280.0, "AU"),
        ];
        let summary = Summary::from_observations(&chunk);
        assert_eq!(summary.combine(&Summary::empty()), summary);
        assert_eq!(Summary::empty().combine(&summary), summary);
    }

    #[test]
    fn test_report_of_empty_summary_has_no_sentinels() {
        let report = Summary::empty().report();
        assert_eq!(report.min_temp, None);
        assert_eq!(report.max_temp, None);
        assert_eq!(report.mean_temp, None);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "distance": 0.0,
                "minTemp": null,
                "maxTemp": null,
                "meanTemp": null,
                "observatoryCount": {},
                "firstLocation": null,
                "lastLocation": null,
            })
        );
    }

    #[test]
    fn test_report_field_names() {
        let summary = Summary::from_observations(&[
            observation(0, 0.0, 0.0, 280.0, "AU"),
            observation(1, 3.0, 4.0, 282.0, "AU"),
            observation(2, 3.0, 4.0, 278.0, "FR"),
        ]);
        let json = serde_json::to_value(summary.report()).unwrap();

        assert_eq!(json["distance"], 5.0);
        assert_eq!(json["minTemp"], 278.0);
        assert_eq!(json["maxTemp"], 282.0);
        assert_eq!(json["meanTemp"], 280.0);
        assert_eq!(json["observatoryCount"]["AU"], 2);
        assert_eq!(json["observatoryCount"]["FR"], 1);
        assert_eq!(json["firstLocation"], serde_json::json!({ "x": 0.0, "y": 0.0 }));
        assert_eq!(json["lastLocation"], serde_json::json!({ "x": 3.0, "y": 4.0 }));
    }
}
