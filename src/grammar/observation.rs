//! Observation line grammar.
//!
//! `yyyy-mm-ddThh:mm|X,Y|T|CC`, where coordinates and temperature are in
//! the native units of station `CC`. Parsing normalises to kilometres and
//! Kelvin; printing converts back and rounds to whole native units.

use super::combinators::{
    Either, adapt, bind, choose, digit, integer, literal, natural, pair, preceded, replicate,
    terminated, token, upper,
};
use super::iso::{
    Iso, Partial, bounded, celsius_to_kelvin, chars_to_string, compose, decimal,
    fahrenheit_to_kelvin, identity, integral, metres_to_kilometres, miles_to_kilometres, pad_left,
};
use super::{BoxedSyntax, Syntax, parse_complete, print};
use crate::config::{DistanceUnit, TemperatureUnit};
use crate::constants::{DAYS_IN_MONTH, FIELD_SEPARATOR, station_codes};
use crate::models::{Observation, Point, StationCode, StationKind, StationRecord};
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

type DateFields = (i64, (i64, i64));
type TimeFields = (i64, i64);

/// Parser and printer for observation lines
pub struct ObservationCodec {
    syntax: BoxedSyntax<Observation>,
}

impl ObservationCodec {
    /// Wire format with per-station unit dispatch
    pub fn standard() -> Self {
        Self {
            syntax: Box::new(observation_line(any_station())),
        }
    }

    /// Every station printed in the given display units.
    ///
    /// Used to re-print normalised observations; station codes carry no
    /// special meaning in this layout.
    pub fn display(distance: DistanceUnit, temperature: TemperatureUnit) -> Self {
        Self {
            syntax: Box::new(observation_line(station_record(
                distance.to_kilometres(),
                temperature.to_kelvin(),
                generic_code(),
            ))),
        }
    }

    /// Parse one line; anything short of an exact match is `None`
    pub fn parse_line(&self, line: &str) -> Option<Observation> {
        parse_complete(&self.syntax, line)
    }

    /// Print one observation, or `None` if the layout cannot express it
    pub fn print_line(&self, observation: &Observation) -> Option<String> {
        print(&self.syntax, observation)
    }
}

impl Default for ObservationCodec {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Timestamp
// =============================================================================

/// Fixed-width zero-padded number within `[lower, upper]`
fn padded_number(width: usize, lower: i64, upper: i64) -> impl Syntax<Value = i64> + Send + Sync {
    adapt(
        compose(
            pad_left(width, '0'),
            compose(chars_to_string(), compose(decimal(), bounded(lower, upper))),
        ),
        replicate(width, digit()),
    )
}

fn two_digits(lower: i64, upper: i64) -> impl Syntax<Value = i64> + Send + Sync {
    padded_number(2, lower, upper)
}

fn days_in_month(month: i64) -> i64 {
    usize::try_from(month - 1)
        .ok()
        .and_then(|index| DAYS_IN_MONTH.get(index))
        .copied()
        .unwrap_or(0)
}

/// Day of `month`, paired with the month it was bounded by
fn day_of_month(month: i64) -> impl Syntax<Value = (i64, i64)> + Send + Sync {
    adapt(
        Iso::new(move |day: i64| (month, day), |(_, day): &(i64, i64)| *day),
        two_digits(1, days_in_month(month)),
    )
}

/// `yyyy-mm-dd`
fn date() -> impl Syntax<Value = DateFields> + Send + Sync {
    pair(
        padded_number(4, 0, 9999),
        preceded(
            literal("-"),
            bind(
                terminated(two_digits(1, 12), literal("-")),
                day_of_month,
                |(month, _): &(i64, i64)| *month,
            ),
        ),
    )
}

/// `hh:mm`
fn time() -> impl Syntax<Value = TimeFields> + Send + Sync {
    pair(two_digits(0, 23), preceded(literal(":"), two_digits(0, 59)))
}

fn date_time_iso() -> Partial<(DateFields, TimeFields), DateTime<Utc>> {
    Partial::new(
        |((year, (month, day)), (hour, minute)): (DateFields, TimeFields)| {
            NaiveDate::from_ymd_opt(
                i32::try_from(year).ok()?,
                u32::try_from(month).ok()?,
                u32::try_from(day).ok()?,
            )?
            .and_hms_opt(u32::try_from(hour).ok()?, u32::try_from(minute).ok()?, 0)
            .map(|naive| naive.and_utc())
        },
        |timestamp: &DateTime<Utc>| {
            if timestamp.second() != 0 || timestamp.nanosecond() != 0 {
                return None;
            }
            Some((
                (
                    i64::from(timestamp.year()),
                    (i64::from(timestamp.month()), i64::from(timestamp.day())),
                ),
                (i64::from(timestamp.hour()), i64::from(timestamp.minute())),
            ))
        },
    )
}

/// `yyyy-mm-ddThh:mm`
fn timestamp() -> impl Syntax<Value = DateTime<Utc>> + Send + Sync {
    adapt(date_time_iso(), pair(date(), preceded(literal("T"), time())))
}

// =============================================================================
// Station records
// =============================================================================

fn point_iso() -> Iso<(f64, f64), Point> {
    Iso::new(
        |(x, y): (f64, f64)| Point::new(x, y),
        |point: &Point| (point.x, point.y),
    )
}

/// `X,Y` in native distance units
fn coordinates(to_kilometres: Iso<f64, f64>) -> impl Syntax<Value = Point> + Send + Sync {
    let component = || adapt(compose(integral(), to_kilometres.clone()), natural());
    adapt(
        point_iso(),
        pair(component(), preceded(literal(","), component())),
    )
}

/// `T` in native temperature units
fn temperature(to_kelvin: Iso<f64, f64>) -> impl Syntax<Value = f64> + Send + Sync {
    adapt(compose(integral(), to_kelvin), integer())
}

/// Any two uppercase letters
fn generic_code() -> impl Syntax<Value = StationCode> + Send + Sync {
    adapt(
        Partial::new(
            |chars: Vec<char>| StationCode::new(chars.into_iter().collect::<String>()),
            |code: &StationCode| Some(code.as_str().chars().collect()),
        ),
        replicate(2, upper()),
    )
}

/// Exactly `code`
fn fixed_code(code: &'static str) -> impl Syntax<Value = StationCode> + Send + Sync {
    adapt(
        Partial::new(
            |text: String| StationCode::new(text),
            |code: &StationCode| Some(code.as_str().to_string()),
        ),
        token(code),
    )
}

fn record_iso() -> Iso<((Point, f64), StationCode), StationRecord> {
    Iso::new(
        |((location, temperature), station): ((Point, f64), StationCode)| StationRecord {
            location,
            temperature,
            station,
        },
        |record: &StationRecord| {
            (
                (record.location, record.temperature),
                record.station.clone(),
            )
        },
    )
}

/// `X,Y|T|CC` with the given native units
fn station_record<C>(
    to_kilometres: Iso<f64, f64>,
    to_kelvin: Iso<f64, f64>,
    code: C,
) -> impl Syntax<Value = StationRecord> + Send + Sync
where
    C: Syntax<Value = StationCode> + Send + Sync,
{
    adapt(
        record_iso(),
        pair(
            pair(
                coordinates(to_kilometres),
                preceded(literal(FIELD_SEPARATOR), temperature(to_kelvin)),
            ),
            preceded(literal(FIELD_SEPARATOR), code),
        ),
    )
}

type Dispatch = Either<StationRecord, Either<StationRecord, Either<StationRecord, StationRecord>>>;

/// Collapse the alternation, and route printing by station code
fn dispatch_iso() -> Iso<Dispatch, StationRecord> {
    Iso::new(
        |dispatch: Dispatch| match dispatch {
            Either::Left(record) => record,
            Either::Right(Either::Left(record)) => record,
            Either::Right(Either::Right(either)) => either.into_inner(),
        },
        |record: &StationRecord| {
            let record = record.clone();
            match record.station.kind() {
                StationKind::Australia => Either::Left(record),
                StationKind::UnitedStates => Either::Right(Either::Left(record)),
                StationKind::France => Either::Right(Either::Right(Either::Left(record))),
                StationKind::Generic => Either::Right(Either::Right(Either::Right(record))),
            }
        },
    )
}

/// Fixed-unit stations first, then any other code in normalised units
fn any_station() -> impl Syntax<Value = StationRecord> + Send + Sync {
    let australia = station_record(
        identity(),
        celsius_to_kelvin(),
        fixed_code(station_codes::AUSTRALIA),
    );
    let united_states = station_record(
        miles_to_kilometres(),
        fahrenheit_to_kelvin(),
        fixed_code(station_codes::UNITED_STATES),
    );
    let france = station_record(
        metres_to_kilometres(),
        identity(),
        fixed_code(station_codes::FRANCE),
    );
    let generic = station_record(identity(), identity(), generic_code());

    adapt(
        dispatch_iso(),
        choose(australia, choose(united_states, choose(france, generic))),
    )
}

fn observation_iso() -> Iso<(DateTime<Utc>, StationRecord), Observation> {
    Iso::new(
        |(timestamp, record): (DateTime<Utc>, StationRecord)| {
            Observation::new(timestamp, record.location, record.temperature, record.station)
        },
        |observation: &Observation| {
            (
                observation.timestamp,
                StationRecord {
                    location: observation.location,
                    temperature: observation.temperature,
                    station: observation.station.clone(),
                },
            )
        },
    )
}

fn observation_line<R>(records: R) -> impl Syntax<Value = Observation> + Send + Sync
where
    R: Syntax<Value = StationRecord> + Send + Sync,
{
    adapt(
        observation_iso(),
        pair(timestamp(), preceded(literal(FIELD_SEPARATOR), records)),
    )
}
