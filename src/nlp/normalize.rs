//! Record normalisation: one text blob and one validated rating per usable row.

use tracing::{debug, info};

use crate::data::{LocationRecord, RawRating};

/// Text used when a record carries no name, description or surroundings.
pub const EMPTY_TEXT_SENTINEL: &str = "No description available";

const FIELD_SEPARATOR: &str = " . ";

/// A record whose rating parsed, paired with its derived text.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSample {
    /// Position of the record in the fetched dataset.
    pub source_index: usize,
    pub record: LocationRecord,
    pub text: String,
    pub rating: f64,
}

/// Join the non-blank text fields in fixed order.
pub fn compose_text(record: &LocationRecord) -> String {
    let parts: Vec<&str> = [
        record.location_name.as_deref(),
        record.description.as_deref(),
        record.surrounding.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect();

    if parts.is_empty() {
        EMPTY_TEXT_SENTINEL.to_string()
    } else {
        parts.join(FIELD_SEPARATOR)
    }
}

/// Validated rating for `record`, or `None` when the row must be dropped.
pub fn validated_rating(record: &LocationRecord, range: (f64, f64)) -> Option<f64> {
    let rating = record.rating.as_ref().and_then(RawRating::parse)?;
    (range.0..=range.1).contains(&rating).then_some(rating)
}

/// Keep every record with a usable rating, preserving input order.
pub fn normalize_records(records: Vec<LocationRecord>, range: (f64, f64)) -> Vec<NormalizedSample> {
    let total = records.len();
    let samples: Vec<NormalizedSample> = records
        .into_iter()
        .enumerate()
        .filter_map(|(source_index, record)| {
            let Some(rating) = validated_rating(&record, range) else {
                debug!(source_index, id = ?record.id, rating = ?record.rating, "dropping record with unusable rating");
                return None;
            };
            let text = compose_text(&record);
            Some(NormalizedSample {
                source_index,
                record,
                text,
                rating,
            })
        })
        .collect();
    info!(
        fetched = total,
        retained = samples.len(),
        dropped = total - samples.len(),
        "normalised location records"
    );
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: Option<&str>, description: Option<&str>, surrounding: Option<&str>) -> LocationRecord {
        LocationRecord {
            location_name: name.map(str::to_string),
            description: description.map(str::to_string),
            surrounding: surrounding.map(str::to_string),
            ..LocationRecord::default()
        }
    }

    #[test]
    fn fields_are_trimmed_and_joined_in_order() {
        let r = record(Some(" Park "), None, Some("dark alley nearby"));
        assert_eq!(compose_text(&r), "Park . dark alley nearby");
    }

    #[test]
    fn blank_fields_fall_back_to_sentinel() {
        let r = record(Some("   "), Some(""), None);
        assert_eq!(compose_text(&r), EMPTY_TEXT_SENTINEL);
    }

    #[test]
    fn out_of_range_ratings_are_dropped() {
        let mut r = record(Some("Square"), None, None);
        r.rating = Some(RawRating::Number(7.0));
        assert_eq!(validated_rating(&r, (0.0, 5.0)), None);
        r.rating = Some(RawRating::Number(5.0));
        assert_eq!(validated_rating(&r, (0.0, 5.0)), Some(5.0));
    }
}
