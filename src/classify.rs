//! Agronomic threshold classification.
//!
//! Every parameter has an ordered list of bands. The first band whose spans
//! contain the value decides the status; a value matched by no band is
//! `Dangerous`. Because every comparison against NaN is false, NaN always
//! falls through to `Dangerous` as well.
//!
//! Boundaries are part of the user-facing guidance, so the table below is the
//! single source of truth for them. Adding a parameter means adding a row.

use crate::models::{ClassificationResult, NormalizedReading, Parameter, Status};

// ---

/// One end of a span.
#[derive(Debug, Clone, Copy)]
enum Edge {
    Unbounded,
    Closed(f64),
    Open(f64),
}

/// A contiguous range of values.
#[derive(Debug, Clone, Copy)]
struct Span {
    lo: Edge,
    hi: Edge,
}

impl Span {
    // ---
    /// `[lo, hi]`
    const fn closed(lo: f64, hi: f64) -> Self {
        Span { lo: Edge::Closed(lo), hi: Edge::Closed(hi) }
    }

    /// `[lo, hi)`
    const fn closed_open(lo: f64, hi: f64) -> Self {
        Span { lo: Edge::Closed(lo), hi: Edge::Open(hi) }
    }

    /// `(lo, hi]`
    const fn open_closed(lo: f64, hi: f64) -> Self {
        Span { lo: Edge::Open(lo), hi: Edge::Closed(hi) }
    }

    /// `(-inf, hi]`
    const fn at_most(hi: f64) -> Self {
        Span { lo: Edge::Unbounded, hi: Edge::Closed(hi) }
    }

    fn contains(&self, value: f64) -> bool {
        // ---
        let above_lo = match self.lo {
            Edge::Unbounded => true,
            Edge::Closed(lo) => value >= lo,
            Edge::Open(lo) => value > lo,
        };
        let below_hi = match self.hi {
            Edge::Unbounded => true,
            Edge::Closed(hi) => value <= hi,
            Edge::Open(hi) => value < hi,
        };
        above_lo && below_hi
    }
}

/// A status and the spans that earn it.
struct Band {
    status: Status,
    spans: &'static [Span],
    rationale: &'static str,
}

/// Ordered bands for one parameter plus the fallthrough rationale.
struct ThresholdRule {
    bands: &'static [Band],
    dangerous: &'static str,
}

static TEMPERATURE: ThresholdRule = ThresholdRule {
    bands: &[
        Band {
            status: Status::Optimal,
            spans: &[Span::at_most(30.0)],
            rationale: "Optimal (15°C - 30°C)",
        },
        Band {
            status: Status::Suboptimal,
            spans: &[Span::open_closed(30.0, 35.0)],
            rationale: "Suboptimal (30°C - 35°C)",
        },
    ],
    dangerous: "Dangerous (>35°C)",
};

static HUMIDITY: ThresholdRule = ThresholdRule {
    bands: &[
        Band {
            status: Status::Optimal,
            spans: &[Span::closed(50.0, 80.0)],
            rationale: "Optimal (50% - 80%)",
        },
        Band {
            status: Status::Suboptimal,
            spans: &[Span::closed_open(40.0, 50.0), Span::open_closed(80.0, 85.0)],
            rationale: "Suboptimal (40%-50% or 80%-85%)",
        },
    ],
    dangerous: "Dangerous (<40% or >85%)",
};

static MOISTURE: ThresholdRule = ThresholdRule {
    bands: &[
        Band {
            status: Status::Optimal,
            spans: &[Span::closed(20.0, 60.0)],
            rationale: "Optimal (20% - 60%)",
        },
        Band {
            status: Status::Suboptimal,
            spans: &[Span::closed_open(10.0, 20.0), Span::open_closed(60.0, 70.0)],
            rationale: "Suboptimal (10%-20% or 60%-70%)",
        },
    ],
    dangerous: "Dangerous (<10% or >70%)",
};

static PH: ThresholdRule = ThresholdRule {
    bands: &[
        Band {
            status: Status::Optimal,
            spans: &[Span::closed(6.0, 7.0)],
            rationale: "Optimal (6.0 - 7.0)",
        },
        Band {
            status: Status::Suboptimal,
            spans: &[Span::closed_open(5.5, 6.0), Span::open_closed(7.0, 7.5)],
            rationale: "Suboptimal (5.5-6.0 or 7.0-7.5)",
        },
    ],
    dangerous: "Dangerous (<5.5 or >7.5)",
};

static NITROGEN: ThresholdRule = ThresholdRule {
    bands: &[
        Band {
            status: Status::Optimal,
            spans: &[Span::closed(30.0, 100.0)],
            rationale: "Optimal N (30-100 ppm)",
        },
        Band {
            status: Status::Suboptimal,
            spans: &[Span::closed_open(20.0, 30.0), Span::open_closed(100.0, 150.0)],
            rationale: "Suboptimal N (20-30 or 100-150 ppm)",
        },
    ],
    dangerous: "Dangerous N (<20 or >150 ppm)",
};

static PHOSPHORUS: ThresholdRule = ThresholdRule {
    bands: &[
        Band {
            status: Status::Optimal,
            spans: &[Span::closed(15.0, 60.0)],
            rationale: "Optimal P (15-60 ppm)",
        },
        Band {
            status: Status::Suboptimal,
            spans: &[Span::closed_open(10.0, 15.0), Span::open_closed(60.0, 80.0)],
            rationale: "Suboptimal P (10-15 or 60-80 ppm)",
        },
    ],
    dangerous: "Dangerous P (<10 or >80 ppm)",
};

static POTASSIUM: ThresholdRule = ThresholdRule {
    bands: &[
        Band {
            status: Status::Optimal,
            spans: &[Span::closed(50.0, 200.0)],
            rationale: "Optimal K (50-200 ppm)",
        },
        Band {
            status: Status::Suboptimal,
            spans: &[Span::closed_open(30.0, 50.0), Span::open_closed(200.0, 250.0)],
            rationale: "Suboptimal K (30-50 or 200-250 ppm)",
        },
    ],
    dangerous: "Dangerous K (<30 or >250 ppm)",
};

fn rule_for(parameter: Parameter) -> &'static ThresholdRule {
    // ---
    match parameter {
        Parameter::Temperature => &TEMPERATURE,
        Parameter::Humidity => &HUMIDITY,
        Parameter::Moisture => &MOISTURE,
        Parameter::Ph => &PH,
        Parameter::N => &NITROGEN,
        Parameter::P => &PHOSPHORUS,
        Parameter::K => &POTASSIUM,
    }
}

/// Classify one value of `parameter`.
///
/// A missing value is `Unclassified` with an empty rationale; anything else
/// gets one of the three agronomic tiers.
pub fn classify(parameter: Parameter, value: Option<f64>) -> ClassificationResult {
    // ---
    let Some(value) = value else {
        return ClassificationResult::UNCLASSIFIED;
    };

    let rule = rule_for(parameter);
    rule.bands
        .iter()
        .find(|band| band.spans.iter().any(|span| span.contains(value)))
        .map(|band| ClassificationResult {
            status: band.status,
            rationale: band.rationale,
        })
        .unwrap_or(ClassificationResult {
            status: Status::Dangerous,
            rationale: rule.dangerous,
        })
}

/// Classify every parameter of a reading, in display order.
pub fn classify_reading(reading: &NormalizedReading) -> Vec<(Parameter, ClassificationResult)> {
    // ---
    Parameter::ALL
        .into_iter()
        .map(|p| (p, classify(p, reading.value(p))))
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn status(parameter: Parameter, value: f64) -> Status {
        classify(parameter, Some(value)).status
    }

    #[test]
    fn test_missing_value_is_unclassified() {
        // ---
        for parameter in Parameter::ALL {
            assert_eq!(classify(parameter, None), ClassificationResult::UNCLASSIFIED);
        }
    }

    #[test]
    fn test_temperature_boundaries() {
        // ---
        assert_eq!(status(Parameter::Temperature, 30.0), Status::Optimal);
        assert_eq!(status(Parameter::Temperature, 30.0001), Status::Suboptimal);
        assert_eq!(status(Parameter::Temperature, 35.0), Status::Suboptimal);
        assert_eq!(status(Parameter::Temperature, 35.0001), Status::Dangerous);
    }

    #[test]
    fn test_temperature_has_no_lower_bound() {
        // ---
        assert_eq!(status(Parameter::Temperature, 0.0), Status::Optimal);
        assert_eq!(status(Parameter::Temperature, -12.0), Status::Optimal);
    }

    #[test]
    fn test_humidity_bands() {
        // ---
        assert_eq!(status(Parameter::Humidity, 39.9), Status::Dangerous);
        assert_eq!(status(Parameter::Humidity, 40.0), Status::Suboptimal);
        assert_eq!(status(Parameter::Humidity, 49.99), Status::Suboptimal);
        assert_eq!(status(Parameter::Humidity, 50.0), Status::Optimal);
        assert_eq!(status(Parameter::Humidity, 80.0), Status::Optimal);
        assert_eq!(status(Parameter::Humidity, 80.01), Status::Suboptimal);
        assert_eq!(status(Parameter::Humidity, 85.0), Status::Suboptimal);
        assert_eq!(status(Parameter::Humidity, 85.01), Status::Dangerous);
    }

    #[test]
    fn test_moisture_bands() {
        // ---
        assert_eq!(status(Parameter::Moisture, 9.99), Status::Dangerous);
        assert_eq!(status(Parameter::Moisture, 10.0), Status::Suboptimal);
        assert_eq!(status(Parameter::Moisture, 20.0), Status::Optimal);
        assert_eq!(status(Parameter::Moisture, 60.0), Status::Optimal);
        assert_eq!(status(Parameter::Moisture, 70.0), Status::Suboptimal);
        assert_eq!(status(Parameter::Moisture, 70.5), Status::Dangerous);
    }

    #[test]
    fn test_ph_bands() {
        // ---
        assert_eq!(status(Parameter::Ph, 5.4), Status::Dangerous);
        assert_eq!(status(Parameter::Ph, 5.5), Status::Suboptimal);
        assert_eq!(status(Parameter::Ph, 6.0), Status::Optimal);
        assert_eq!(status(Parameter::Ph, 7.0), Status::Optimal);
        assert_eq!(status(Parameter::Ph, 7.5), Status::Suboptimal);
        assert_eq!(status(Parameter::Ph, 7.6), Status::Dangerous);
    }

    #[test]
    fn test_nutrient_bands() {
        // ---
        assert_eq!(status(Parameter::N, 19.0), Status::Dangerous);
        assert_eq!(status(Parameter::N, 20.0), Status::Suboptimal);
        assert_eq!(status(Parameter::N, 30.0), Status::Optimal);
        assert_eq!(status(Parameter::N, 100.0), Status::Optimal);
        assert_eq!(status(Parameter::N, 150.0), Status::Suboptimal);
        assert_eq!(status(Parameter::N, 151.0), Status::Dangerous);

        assert_eq!(status(Parameter::P, 9.0), Status::Dangerous);
        assert_eq!(status(Parameter::P, 10.0), Status::Suboptimal);
        assert_eq!(status(Parameter::P, 15.0), Status::Optimal);
        assert_eq!(status(Parameter::P, 60.0), Status::Optimal);
        assert_eq!(status(Parameter::P, 80.0), Status::Suboptimal);
        assert_eq!(status(Parameter::P, 81.0), Status::Dangerous);

        assert_eq!(status(Parameter::K, 29.0), Status::Dangerous);
        assert_eq!(status(Parameter::K, 30.0), Status::Suboptimal);
        assert_eq!(status(Parameter::K, 50.0), Status::Optimal);
        assert_eq!(status(Parameter::K, 200.0), Status::Optimal);
        assert_eq!(status(Parameter::K, 250.0), Status::Suboptimal);
        assert_eq!(status(Parameter::K, 251.0), Status::Dangerous);
    }

    #[test]
    fn test_negative_and_nan_fall_through() {
        // ---
        for parameter in [
            Parameter::Humidity,
            Parameter::Moisture,
            Parameter::Ph,
            Parameter::N,
            Parameter::P,
            Parameter::K,
        ] {
            assert_eq!(status(parameter, -1.0), Status::Dangerous);
        }
        for parameter in Parameter::ALL {
            assert_eq!(status(parameter, f64::NAN), Status::Dangerous);
        }
    }

    #[test]
    fn test_rationale_names_the_band() {
        // ---
        let result = classify(Parameter::K, Some(220.0));
        assert_eq!(result.rationale, "Suboptimal K (30-50 or 200-250 ppm)");

        let result = classify(Parameter::Temperature, Some(40.0));
        assert_eq!(result.rationale, "Dangerous (>35°C)");

        let result = classify(Parameter::Ph, Some(6.5));
        assert_eq!(result.rationale, "Optimal (6.0 - 7.0)");
    }
}
