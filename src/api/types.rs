//! Shared DTOs for JSON responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisReport, ReportStatus};

/// Aggregate view of a report without the per-location rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryDto {
    pub status: ReportStatus,
    pub overall_rating: Option<f64>,
    pub total_locations: usize,
    pub safe_locations: usize,
    pub unsafe_locations: usize,
    pub risk_factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl From<AnalysisReport> for SummaryDto {
    fn from(report: AnalysisReport) -> Self {
        Self {
            status: report.status,
            overall_rating: report.overall_rating,
            total_locations: report.total_locations,
            safe_locations: report.safe_locations,
            unsafe_locations: report.unsafe_locations,
            risk_factors: report.risk_factors,
            message: report.message,
            note: report.note,
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub status: ReportStatus,
    pub message: String,
}

impl ErrorDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Error,
            message: message.into(),
        }
    }
}
