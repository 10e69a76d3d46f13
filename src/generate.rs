//! Synthetic observation generator.
//!
//! Emits unordered wire lines for exercising the pipeline, with a tunable
//! share of junk lines that the grammar will reject. Every generated
//! observation is printable: days stop at 28 and values are whole numbers
//! in normalised units.

use crate::config::GenerateConfig;
use crate::constants::station_codes;
use crate::error::Result;
use crate::grammar::ObservationCodec;
use crate::models::{Observation, Point, StationCode};
use chrono::{DateTime, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

const FIXED_STATIONS: [&str; 3] = [
    station_codes::AUSTRALIA,
    station_codes::FRANCE,
    station_codes::UNITED_STATES,
];
const MAX_JUNK_LENGTH: usize = 40;

/// Counts of emitted lines by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerateStats {
    pub observations: u64,
    pub junk: u64,
}

pub struct ObservationGenerator {
    rng: StdRng,
    codec: ObservationCodec,
    junk_factor: f64,
}

impl ObservationGenerator {
    pub fn new(config: &GenerateConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            rng,
            codec: ObservationCodec::standard(),
            junk_factor: config.junk_factor,
        })
    }

    /// A random observation that the wire grammar can print
    pub fn observation(&mut self) -> Observation {
        Observation::new(
            self.timestamp(),
            Point::new(
                f64::from(self.rng.gen_range(0..=10_000u32)),
                f64::from(self.rng.gen_range(0..=10_000u32)),
            ),
            f64::from(self.rng.gen_range(250..=300u32)),
            self.station(),
        )
    }

    /// Random printable ASCII, never containing a line terminator
    pub fn junk(&mut self) -> String {
        let length = self.rng.gen_range(0..=MAX_JUNK_LENGTH);
        (0..length)
            .map(|_| char::from(self.rng.gen_range(b' '..=b'~')))
            .collect()
    }

    /// Next line without its terminator, and whether it is junk
    pub fn next_line(&mut self) -> (String, bool) {
        if self.rng.gen_bool(self.junk_factor) {
            return (self.junk(), true);
        }
        loop {
            let observation = self.observation();
            if let Some(line) = self.codec.print_line(&observation) {
                return (line, false);
            }
        }
    }

    /// Write `count` newline-terminated lines
    pub async fn write_lines<W>(&mut self, count: usize, writer: &mut W) -> Result<GenerateStats>
    where
        W: AsyncWrite + Unpin,
    {
        let mut stats = GenerateStats::default();
        for _ in 0..count {
            let (line, junk) = self.next_line();
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            if junk {
                stats.junk += 1;
            } else {
                stats.observations += 1;
            }
        }
        writer.flush().await?;

        info!(
            "Generated {} lines ({} observations, {} junk)",
            count, stats.observations, stats.junk
        );
        Ok(stats)
    }

    fn timestamp(&mut self) -> DateTime<Utc> {
        let year = self.rng.gen_range(1970..=2099);
        let month = self.rng.gen_range(1..=12);
        let day = self.rng.gen_range(1..=28);
        let hour = self.rng.gen_range(0..24);
        let minute = self.rng.gen_range(0..60);

        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .map(|naive| naive.and_utc())
            .unwrap_or_else(|| {
                debug!("Unrepresentable timestamp drawn, using epoch");
                DateTime::UNIX_EPOCH
            })
    }

    fn station(&mut self) -> StationCode {
        loop {
            let code: String = if self.rng.gen_bool(0.5) {
                FIXED_STATIONS[self.rng.gen_range(0..FIXED_STATIONS.len())].to_string()
            } else {
                (0..2)
                    .map(|_| char::from(self.rng.gen_range(b'A'..=b'Z')))
                    .collect()
            };
            if let Some(station) = StationCode::new(code) {
                return station;
            }
        }
    }
}
