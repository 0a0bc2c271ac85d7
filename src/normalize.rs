//! Timeline normalization and derived fields.
//!
//! Sensors report a naive `date` + `time` pair in a single fixed regional
//! offset. Normalization reads the pair as UTC and shifts it by
//! [`SENSOR_UTC_OFFSET`]; no timezone database or DST rules are involved, so
//! the result depends on nothing but the two input strings.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};

use crate::error::ReadingError;
use crate::models::{NormalizedReading, RawReading};

// ---

/// Fixed shift applied to every reading (UTC+5:30).
pub const SENSOR_UTC_OFFSET: Duration = Duration::minutes(5 * 60 + 30);

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 3] = ["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];

// `9` stands for any ASCII digit.
const DATE_SHAPE: &str = "9999-99-99";
const TIME_SHAPES: [&str; 2] = ["99:99", "99:99:99"];

/// Normalize one raw reading.
///
/// `display_date` is the input date verbatim, even when the offset shift moves
/// `instant` onto the following day; only `display_time` follows the shift.
pub fn normalize(raw: &RawReading) -> Result<NormalizedReading, ReadingError> {
    // ---
    let instant = parse_instant(&raw.date, &raw.time)?;
    let display_time = fold_midnight(instant.format("%H:%M").to_string());

    Ok(NormalizedReading {
        date: raw.date.clone(),
        time: raw.time.clone(),
        temperature: raw.temperature,
        humidity: raw.humidity,
        moisture: raw.moisture,
        ph: raw.ph,
        n: raw.n,
        p: raw.p,
        k: raw.k,
        instant,
        display_date: raw.date.clone(),
        display_time,
        npk: derive_npk(raw.n, raw.p, raw.k),
    })
}

/// Legacy combined NPK value. Absent components count as zero, so a reading
/// without any nutrient data yields `0.0` rather than `None`.
pub fn derive_npk(n: Option<f64>, p: Option<f64>, k: Option<f64>) -> f64 {
    n.unwrap_or(0.0) + p.unwrap_or(0.0) + k.unwrap_or(0.0)
}

/// Parse `date` + `time` as UTC and apply the sensor offset.
///
/// Only zero-padded `YYYY-MM-DD` and `HH:MM[:SS[.fff]]` are accepted; leap
/// seconds are rejected.
fn parse_instant(date: &str, time: &str) -> Result<DateTime<Utc>, ReadingError> {
    // ---
    let malformed = || ReadingError::MalformedTimestamp {
        date: date.to_string(),
        time: time.to_string(),
    };

    let (date, time) = (date.trim(), time.trim());
    if !has_shape(date, DATE_SHAPE) || !is_clock_shaped(time) {
        return Err(malformed());
    }

    let day = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| malformed())?;
    let clock = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time, fmt).ok())
        .filter(|t| t.nanosecond() < 1_000_000_000)
        .ok_or_else(malformed)?;

    day.and_time(clock)
        .and_utc()
        .checked_add_signed(SENSOR_UTC_OFFSET)
        .ok_or_else(malformed)
}

fn has_shape(s: &str, shape: &str) -> bool {
    // ---
    s.len() == shape.len()
        && s.bytes().zip(shape.bytes()).all(|(c, p)| match p {
            b'9' => c.is_ascii_digit(),
            _ => c == p,
        })
}

fn is_clock_shaped(time: &str) -> bool {
    // ---
    match time.split_once('.') {
        Some((whole, fraction)) => {
            has_shape(whole, TIME_SHAPES[1])
                && !fraction.is_empty()
                && fraction.bytes().all(|c| c.is_ascii_digit())
        }
        None => TIME_SHAPES.iter().any(|shape| has_shape(time, shape)),
    }
}

/// Rewrite a `24:MM` wall clock to `00:MM`.
fn fold_midnight(hhmm: String) -> String {
    match hhmm.strip_prefix("24:") {
        Some(minutes) => format!("00:{minutes}"),
        None => hhmm,
    }
}
