//! Rule-based scoring for datasets too small to train on.

use crate::{
    analysis::report::{Prediction, SafetyLabel},
    config::AnalysisConfig,
    nlp::NormalizedSample,
};

pub const FALLBACK_NOTE: &str = "Using simple rating-based prediction due to small dataset";

/// Score each sample as `rating / scale`, labelled by the rating threshold.
pub fn score(samples: &[NormalizedSample], config: &AnalysisConfig) -> Vec<Prediction> {
    samples
        .iter()
        .map(|sample| {
            let safety_score = (sample.rating / config.rating_scale).clamp(0.0, 1.0);
            let label = SafetyLabel::at_or_above(sample.rating, config.rating_threshold);
            Prediction::from_sample(sample, safety_score, label)
        })
        .collect()
}
