//! Event correlation identifiers.
//!
//! A confirmed alert is labelled with the two detections that confirmed it:
//!
//! ```text
//! <sensor1_id><HHMMSS.mmm><sensor2_id><HHMMSS.mmm>
//! ```
//!
//! where `sensor1` is the earlier detection and `sensor2` the confirming
//! one. Downstream tools slice this string by position, so the layout is
//! fixed: two-digit hours, two-digit minutes, seconds zero-padded to six
//! characters with three decimals.

use plum_env::{SensorId, SimTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of one formatted timestamp (`HHMMSS.mmm`).
const TIME_WIDTH: usize = 10;

/// Sensor id length of the stock sensor tables (`S01`, `S02`, ...).
pub const DEFAULT_SENSOR_ID_LEN: usize = 3;

/// Errors from [`CorrelationId::parse`].
#[derive(Debug, Error, PartialEq)]
pub enum CorrelationParseError {
    #[error("Expected {expected} characters, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("Bad timestamp field '{0}'")]
    Timestamp(String),
}

/// Formats a virtual time as `HHMMSS.mmm`.
pub fn format_time(time: SimTime) -> String {
    let t = time.as_secs();
    let rem = t.rem_euclid(3600.0);
    let hours = ((t - rem) / 3600.0).round();
    let seconds = rem.rem_euclid(60.0);
    let minutes = ((rem - seconds) / 60.0).round();
    format!("{:02.0}{:02.0}{:06.3}", hours, minutes, seconds)
}

/// Correlation identifier of a confirmed event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(String);

/// The two detections recovered from a correlation id.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationParts {
    pub first: (SensorId, f64),
    pub second: (SensorId, f64),
}

impl CorrelationId {
    /// Builds the id from the first and the confirming detection.
    pub fn from_detections(first: (&SensorId, SimTime), second: (&SensorId, SimTime)) -> Self {
        Self(format!(
            "{}{}{}{}",
            first.0,
            format_time(first.1),
            second.0,
            format_time(second.1)
        ))
    }

    /// Returns the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits a correlation id back into its two detections.
    ///
    /// `id_len` is the fixed length of the sensor ids in the network.
    pub fn parse(s: &str, id_len: usize) -> Result<CorrelationParts, CorrelationParseError> {
        let chars: Vec<char> = s.chars().collect();
        let expected = 2 * (id_len + TIME_WIDTH);
        if chars.len() != expected {
            return Err(CorrelationParseError::Length {
                expected,
                actual: chars.len(),
            });
        }

        let field = |from: usize, len: usize| -> String { chars[from..from + len].iter().collect() };
        let half = id_len + TIME_WIDTH;

        let first_id = field(0, id_len);
        let first_time = parse_time(&field(id_len, TIME_WIDTH))?;
        let second_id = field(half, id_len);
        let second_time = parse_time(&field(half + id_len, TIME_WIDTH))?;

        Ok(CorrelationParts {
            first: (SensorId::new(first_id), first_time),
            second: (SensorId::new(second_id), second_time),
        })
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_time(field: &str) -> Result<f64, CorrelationParseError> {
    let bad = || CorrelationParseError::Timestamp(field.to_string());

    // HH MM SS.mmm
    let hours = field.get(0..2).ok_or_else(bad)?;
    let minutes = field.get(2..4).ok_or_else(bad)?;
    let seconds = field.get(4..).ok_or_else(bad)?;

    if !hours.chars().chain(minutes.chars()).all(|c| c.is_ascii_digit()) {
        return Err(bad());
    }
    if seconds.len() != 6 || seconds.as_bytes()[2] != b'.' {
        return Err(bad());
    }

    let hours: f64 = hours.parse().map_err(|_| bad())?;
    let minutes: f64 = minutes.parse().map_err(|_| bad())?;
    let seconds: f64 = seconds.parse().map_err(|_| bad())?;

    Ok(hours * 3600.0 + minutes * 60.0 + seconds)
}
