//! Batch pipeline: normalize, derive, then order by instant.

use serde::Serialize;

use crate::error::ReadingError;
use crate::models::{NormalizedReading, RawReading};
use crate::normalize::normalize;

// ---

/// What to do with a reading whose timestamp cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Drop the reading and keep going.
    #[default]
    SkipMalformed,
    /// Fail the whole batch on the first malformed reading.
    Abort,
}

/// A reading that was left out of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejected {
    /// Position in the raw batch.
    pub index: usize,
    pub error: String,
}

/// Output of [`process_batch`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessedBatch {
    pub readings: Vec<NormalizedReading>,
    pub rejected: Vec<Rejected>,
}

/// Return the readings ordered by ascending `instant`.
///
/// The sort is stable, so readings sharing an instant keep their input order.
pub fn sort_timeline(readings: &[NormalizedReading]) -> Vec<NormalizedReading> {
    // ---
    let mut ordered = readings.to_vec();
    ordered.sort_by_key(|r| r.instant);
    ordered
}

/// Run a raw batch through normalization and ordering.
pub fn process_batch(
    raw: &[RawReading],
    policy: BatchPolicy,
) -> Result<ProcessedBatch, ReadingError> {
    process_positioned(raw.iter().enumerate(), policy)
}

/// Like [`process_batch`], for readings that carry their own position.
///
/// Used when some items of the original batch were already set aside, so
/// that `Rejected::index` still points into the original batch.
pub fn process_positioned<'a>(
    raw: impl IntoIterator<Item = (usize, &'a RawReading)>,
    policy: BatchPolicy,
) -> Result<ProcessedBatch, ReadingError> {
    // ---
    let mut normalized = Vec::new();
    let mut rejected = Vec::new();

    for (index, item) in raw {
        match normalize(item) {
            Ok(reading) => normalized.push(reading),
            Err(e) if policy == BatchPolicy::SkipMalformed => rejected.push(Rejected {
                index,
                error: e.to_string(),
            }),
            Err(e) => return Err(e),
        }
    }

    Ok(ProcessedBatch {
        readings: sort_timeline(&normalized),
        rejected,
    })
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn raw(date: &str, time: &str, temperature: f64) -> RawReading {
        // ---
        RawReading {
            date: date.to_string(),
            time: time.to_string(),
            temperature: Some(temperature),
            ..Default::default()
        }
    }

    fn temperatures(readings: &[NormalizedReading]) -> Vec<f64> {
        readings.iter().filter_map(|r| r.temperature).collect()
    }

    #[test]
    fn test_sort_ascending() {
        // ---
        let later = normalize(&raw("2025-01-02", "10:00", 2.0)).unwrap();
        let earlier = normalize(&raw("2025-01-01", "10:00", 1.0)).unwrap();

        let input = vec![later, earlier];
        let sorted = sort_timeline(&input);

        assert_eq!(temperatures(&sorted), [1.0, 2.0]);
        // input left as it was
        assert_eq!(temperatures(&input), [2.0, 1.0]);
    }

    #[test]
    fn test_sort_is_stable() {
        // ---
        let input: Vec<_> = [1.0, 2.0, 3.0]
            .into_iter()
            .map(|t| normalize(&raw("2025-01-01", "10:00", t)).unwrap())
            .collect();

        assert_eq!(temperatures(&sort_timeline(&input)), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_sort_empty_and_sorted() {
        // ---
        assert!(sort_timeline(&[]).is_empty());

        let input: Vec<_> = ["08:00", "09:00", "10:00"]
            .into_iter()
            .enumerate()
            .map(|(i, t)| normalize(&raw("2025-01-01", t, i as f64)).unwrap())
            .collect();
        assert_eq!(sort_timeline(&input), input);
    }

    #[test]
    fn test_sort_uses_instant_not_display_time() {
        // ---
        // 23:45 on the 1st shifts past midnight, 05:00 on the 2nd does not
        let input = vec![
            normalize(&raw("2025-01-02", "05:00", 2.0)).unwrap(),
            normalize(&raw("2025-01-01", "23:45", 1.0)).unwrap(),
        ];
        let sorted = sort_timeline(&input);

        assert_eq!(temperatures(&sorted), [1.0, 2.0]);
        assert_eq!(sorted[0].display_time, "05:15");
        assert_eq!(sorted[1].display_time, "10:30");
    }

    #[test]
    fn test_process_batch_skips_malformed() {
        // ---
        let batch = vec![
            raw("2025-01-01", "12:00", 2.0),
            raw("2025-01-01", "bogus", 9.0),
            raw("2025-01-01", "06:00", 1.0),
        ];

        let processed = process_batch(&batch, BatchPolicy::SkipMalformed).unwrap();

        assert_eq!(temperatures(&processed.readings), [1.0, 2.0]);
        assert_eq!(processed.rejected.len(), 1);
        assert_eq!(processed.rejected[0].index, 1);
        assert!(processed.rejected[0].error.contains("bogus"));
    }

    #[test]
    fn test_process_positioned_keeps_original_index() {
        // ---
        let bad = raw("2025-01-01", "", 9.0);
        let good = raw("2025-01-01", "06:00", 1.0);

        let processed =
            process_positioned([(3, &good), (5, &bad)], BatchPolicy::SkipMalformed).unwrap();

        assert_eq!(temperatures(&processed.readings), [1.0]);
        assert_eq!(processed.rejected.len(), 1);
        assert_eq!(processed.rejected[0].index, 5);
    }

    #[test]
    fn test_process_batch_abort() {
        // ---
        let batch = vec![raw("2025-01-01", "12:00", 2.0), raw("not-a-date", "06:00", 1.0)];

        let err = process_batch(&batch, BatchPolicy::Abort).unwrap_err();
        assert!(matches!(err, ReadingError::MalformedTimestamp { .. }));
    }

    #[test]
    fn test_process_batch_empty() {
        // ---
        let processed = process_batch(&[], BatchPolicy::Abort).unwrap();
        assert_eq!(processed, ProcessedBatch::default());
    }
}
