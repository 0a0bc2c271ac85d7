//! CSV export of an ordered reading set.
//!
//! Fields are written without quoting. Every column is either a number or an
//! already-validated date/time string, so none can contain the delimiter; a
//! free-text column would need `QuoteStyle::Necessary` instead.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::models::NormalizedReading;

// ---

/// Fixed header row, in column order.
pub const CSV_HEADER: [&str; 9] = [
    "Date",
    "Time",
    "Temperature",
    "Humidity",
    "Moisture",
    "N",
    "P",
    "K",
    "pH",
];

/// Serialize readings to CSV, one row per reading after the header.
///
/// Rows are `\n`-separated with no trailing newline. Missing values become
/// empty fields.
pub fn to_csv(readings: &[NormalizedReading]) -> Result<String> {
    // ---
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for r in readings {
        writer.write_record([
            r.display_date.clone(),
            r.display_time.clone(),
            cell(r.temperature),
            cell(r.humidity),
            cell(r.moisture),
            cell(r.n),
            cell(r.p),
            cell(r.k),
            cell(r.ph),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    let mut out = String::from_utf8(bytes).context("CSV output is not UTF-8")?;
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// Download filename for an export made on `day`.
pub fn export_filename(day: NaiveDate) -> String {
    format!("sensor-data-{}.csv", day.format("%Y-%m-%d"))
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
