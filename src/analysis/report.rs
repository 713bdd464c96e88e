//! Per-location predictions, the aggregate report, and the ranking rules that build it.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::nlp::NormalizedSample;

/// Binary safety verdict attached to each prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLabel {
    Safe,
    Unsafe,
}

impl SafetyLabel {
    /// `Safe` iff `value >= threshold`; used for both scores and raw ratings.
    pub fn at_or_above(value: f64, threshold: f64) -> Self {
        if value >= threshold {
            Self::Safe
        } else {
            Self::Unsafe
        }
    }

    pub fn is_safe(self) -> bool {
        matches!(self, Self::Safe)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Unsafe => "unsafe",
        }
    }
}

impl fmt::Display for SafetyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scored view of one retained location; display fields are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: Option<i64>,
    pub location_name: Option<String>,
    pub description: Option<String>,
    pub surrounding: Option<String>,
    pub actual_rating: f64,
    pub safety_score: f64,
    pub predicted_label: SafetyLabel,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub reporter_name: Option<String>,
    pub created_at: Option<String>,
}

impl Prediction {
    pub fn from_sample(sample: &NormalizedSample, safety_score: f64, label: SafetyLabel) -> Self {
        let record = &sample.record;
        Self {
            id: record.id,
            location_name: record.location_name.clone(),
            description: record.description.clone(),
            surrounding: record.surrounding.clone(),
            actual_rating: sample.rating,
            safety_score,
            predicted_label: label,
            latitude: record.latitude,
            longitude: record.longitude,
            reporter_name: record.reporter_name.clone(),
            created_at: record.created_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Error,
}

/// Outcome of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub overall_rating: Option<f64>,
    pub total_locations: usize,
    pub safe_locations: usize,
    pub unsafe_locations: usize,
    pub risk_factors: Vec<String>,
    /// Most concerning first.
    pub predictions: Vec<Prediction>,
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AnalysisReport {
    /// Report for a store that returned no rows at all.
    pub fn no_data() -> Self {
        Self {
            overall_rating: None,
            total_locations: 0,
            safe_locations: 0,
            unsafe_locations: 0,
            risk_factors: Vec::new(),
            predictions: Vec::new(),
            status: ReportStatus::Error,
            message: Some("No location data available".to_string()),
            note: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ReportStatus::Success
    }
}

/// Sort ascending by safety score; the sort is stable, so ties keep input order.
pub fn rank_predictions(predictions: &mut [Prediction]) {
    predictions.sort_by(|a, b| a.safety_score.total_cmp(&b.safety_score));
}

/// Indices of the `limit` largest importances, descending, ties by lower index.
pub fn top_feature_indices(importances: &[f64], limit: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..importances.len()).collect();
    order.sort_by(|&a, &b| importances[b].total_cmp(&importances[a]));
    order.truncate(limit);
    order
}

/// Arithmetic mean of the retained ratings, `None` when nothing was retained.
pub fn mean_rating(ratings: &[f64]) -> Option<f64> {
    if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    }
}

/// Rank `predictions` and attach the aggregate statistics.
pub fn assemble(
    mut predictions: Vec<Prediction>,
    ratings: &[f64],
    risk_factors: Vec<String>,
    note: Option<String>,
) -> AnalysisReport {
    rank_predictions(&mut predictions);
    let safe_locations = predictions
        .iter()
        .filter(|p| p.predicted_label.is_safe())
        .count();
    let total_locations = predictions.len();
    let report = AnalysisReport {
        overall_rating: mean_rating(ratings),
        total_locations,
        safe_locations,
        unsafe_locations: total_locations - safe_locations,
        risk_factors,
        predictions,
        status: ReportStatus::Success,
        message: None,
        note,
    };
    info!(
        total = report.total_locations,
        safe_count = report.safe_locations,
        unsafe_count = report.unsafe_locations,
        overall = ?report.overall_rating,
        "assembled safety report"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(id: i64, score: f64) -> Prediction {
        Prediction {
            id: Some(id),
            location_name: None,
            description: None,
            surrounding: None,
            actual_rating: 3.0,
            safety_score: score,
            predicted_label: SafetyLabel::at_or_above(score, 0.5),
            latitude: None,
            longitude: None,
            reporter_name: None,
            created_at: None,
        }
    }

    #[test]
    fn ranking_is_stable_for_equal_scores() {
        let mut preds = vec![
            prediction(1, 0.8),
            prediction(2, 0.2),
            prediction(3, 0.8),
            prediction(4, 0.2),
        ];
        rank_predictions(&mut preds);
        let ids: Vec<i64> = preds.iter().filter_map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn importance_ties_resolve_by_index() {
        let order = top_feature_indices(&[0.1, 0.3, 0.3, 0.0, 0.3, 0.2], 5);
        assert_eq!(order, vec![1, 2, 4, 5, 0]);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(SafetyLabel::at_or_above(0.5, 0.5), SafetyLabel::Safe);
        assert_eq!(SafetyLabel::at_or_above(0.4999, 0.5), SafetyLabel::Unsafe);
    }

    #[test]
    fn error_report_omits_note_and_keeps_message() {
        let json = serde_json::to_value(AnalysisReport::no_data()).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "No location data available");
        assert!(json.get("note").is_none());
        assert_eq!(json["predictions"].as_array().map(Vec::len), Some(0));
    }
}
