//! Data models for soil sensor readings.
//!
//! `RawReading` is what the reading source hands us, `NormalizedReading` is
//! what every other part of the crate works with. Classification types live
//! here too so that views and routes share one vocabulary.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReadingError;

// ---

/// Raw sensor reading as received from the reading source.
///
/// Only `date` and `time` are required; every measurement may be absent.
/// A missing `date` or `time` decodes as empty and fails normalization with
/// `MalformedTimestamp` instead of failing to decode.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawReading {
    // ---
    /// Calendar date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// Naive time of day, `HH:MM[:SS]`.
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub moisture: Option<f64>,
    #[serde(default)]
    pub ph: Option<f64>,
    #[serde(default)]
    pub n: Option<f64>,
    #[serde(default)]
    pub p: Option<f64>,
    #[serde(default)]
    pub k: Option<f64>,
}

/// A reading with its timeline position and derived fields resolved.
///
/// Built once by [`crate::normalize::normalize`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedReading {
    // ---
    pub date: String,
    pub time: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub moisture: Option<f64>,
    pub ph: Option<f64>,
    pub n: Option<f64>,
    pub p: Option<f64>,
    pub k: Option<f64>,

    /// `date` + `time` read as UTC, shifted by the fixed sensor offset.
    pub instant: DateTime<Utc>,
    /// The input `date`, carried through unchanged.
    pub display_date: String,
    /// `HH:MM` wall clock of `instant`.
    pub display_time: String,
    /// Legacy N+P+K sum; missing components count as zero.
    pub npk: f64,
}

impl NormalizedReading {
    // ---
    /// Raw value of one measured parameter.
    pub fn value(&self, parameter: Parameter) -> Option<f64> {
        // ---
        match parameter {
            Parameter::Temperature => self.temperature,
            Parameter::Humidity => self.humidity,
            Parameter::Moisture => self.moisture,
            Parameter::Ph => self.ph,
            Parameter::N => self.n,
            Parameter::P => self.p,
            Parameter::K => self.k,
        }
    }

    /// `"{display_date} {display_time}"`, used as the chart tooltip label.
    pub fn label(&self) -> String {
        format!("{} {}", self.display_date, self.display_time)
    }
}

/// Measured parameters that carry an agronomic threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Temperature,
    Humidity,
    Moisture,
    Ph,
    N,
    P,
    K,
}

impl Parameter {
    // ---
    /// Display order used by the table and chart views.
    pub const ALL: [Parameter; 7] = [
        Parameter::Temperature,
        Parameter::Humidity,
        Parameter::Moisture,
        Parameter::N,
        Parameter::P,
        Parameter::K,
        Parameter::Ph,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::Humidity => "humidity",
            Parameter::Moisture => "moisture",
            Parameter::Ph => "ph",
            Parameter::N => "n",
            Parameter::P => "p",
            Parameter::K => "k",
        }
    }

    /// Unit shown on chart axes and table headers.
    pub fn unit(self) -> &'static str {
        match self {
            Parameter::Temperature => "°C",
            Parameter::Humidity | Parameter::Moisture => "%",
            Parameter::Ph => "",
            Parameter::N | Parameter::P | Parameter::K => "ppm",
        }
    }

    /// Chart title.
    pub fn title(self) -> &'static str {
        match self {
            Parameter::Temperature => "Temperature (°C)",
            Parameter::Humidity => "Humidity (%)",
            Parameter::Moisture => "Soil Moisture",
            Parameter::N => "Nitrogen (N) Levels",
            Parameter::P => "Phosphorus (P) Levels",
            Parameter::K => "Potassium (K) Levels",
            Parameter::Ph => "pH Level",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Parameter {
    type Err = ReadingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ---
        Parameter::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ReadingError::UnknownParameter(s.to_string()))
    }
}

/// Three-tier agronomic status, plus the outcome for a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Optimal,
    Suboptimal,
    Dangerous,
    Unclassified,
}

/// Status of one value together with the band description shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub status: Status,
    pub rationale: &'static str,
}

impl ClassificationResult {
    // ---
    pub const UNCLASSIFIED: ClassificationResult = ClassificationResult {
        status: Status::Unclassified,
        rationale: "",
    };
}
