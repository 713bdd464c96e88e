//! End-to-end safety analysis: normalise, pick a strategy, score, rank.

pub mod fallback;
pub mod report;

use tracing::{info, instrument};

use crate::{
    config::AnalysisConfig,
    data::{self, LocationRecord, LocationSource},
    error::AnalysisError,
    model,
    nlp::{self, NormalizedSample, TfidfVectorizer},
};

pub use report::{AnalysisReport, Prediction, ReportStatus, SafetyLabel};

/// How a run turns retained samples into scores, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStrategy {
    /// Too few samples to train: score directly from the rating.
    RuleBased,
    /// TF-IDF features and a random forest.
    ModelBased,
}

impl AnalysisStrategy {
    pub fn select(retained: usize, config: &AnalysisConfig) -> Self {
        if retained < config.min_training_samples {
            Self::RuleBased
        } else {
            Self::ModelBased
        }
    }
}

/// Fetch from `source` and analyse whatever it returns.
pub fn run(source: &dyn LocationSource, config: &AnalysisConfig) -> Result<AnalysisReport, AnalysisError> {
    analyze(data::fetch_locations(source), config)
}

/// Analyse one batch of raw records.
///
/// An empty batch yields an error-status report rather than `Err`; only a
/// failed feature fit or model fit is returned as an error.
#[instrument(skip_all, fields(records = records.len()))]
pub fn analyze(records: Vec<LocationRecord>, config: &AnalysisConfig) -> Result<AnalysisReport, AnalysisError> {
    if records.is_empty() {
        info!("no location rows to analyse");
        return Ok(AnalysisReport::no_data());
    }

    let samples = nlp::normalize_records(records, config.rating_range);
    let ratings: Vec<f64> = samples.iter().map(|s| s.rating).collect();
    let strategy = AnalysisStrategy::select(samples.len(), config);
    info!(?strategy, retained = samples.len(), "selected analysis strategy");

    let report = match strategy {
        AnalysisStrategy::RuleBased => report::assemble(
            fallback::score(&samples, config),
            &ratings,
            Vec::new(),
            Some(fallback::FALLBACK_NOTE.to_string()),
        ),
        AnalysisStrategy::ModelBased => {
            let (predictions, risk_factors) = score_with_model(&samples, &ratings, config)?;
            report::assemble(predictions, &ratings, risk_factors, None)
        }
    };
    Ok(report)
}

fn score_with_model(
    samples: &[NormalizedSample],
    ratings: &[f64],
    config: &AnalysisConfig,
) -> Result<(Vec<Prediction>, Vec<String>), AnalysisError> {
    let texts: Vec<&str> = samples.iter().map(|s| s.text.as_str()).collect();
    let mut vectorizer = TfidfVectorizer::new(config.vectorizer());
    let features = vectorizer.fit_transform(texts.as_slice())?;
    info!(vocabulary = vectorizer.vocabulary_size(), "extracted tfidf features");

    let labels = model::derive_labels(ratings, config.rating_threshold);
    let scores = model::train_and_score(features, labels, config.forest())?;

    let predictions = samples
        .iter()
        .zip(scores.safety_scores.iter())
        .map(|(sample, &score)| {
            let label = SafetyLabel::at_or_above(score, config.probability_threshold);
            Prediction::from_sample(sample, score, label)
        })
        .collect();

    let importances = scores.importances.to_vec();
    let risk_factors = report::top_feature_indices(&importances, config.top_risk_factors)
        .into_iter()
        .filter_map(|idx| vectorizer.term(idx).map(str::to_string))
        .collect();
    Ok((predictions, risk_factors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_switches_at_minimum_sample_count() {
        let config = AnalysisConfig::default();
        assert_eq!(AnalysisStrategy::select(0, &config), AnalysisStrategy::RuleBased);
        assert_eq!(AnalysisStrategy::select(2, &config), AnalysisStrategy::RuleBased);
        assert_eq!(AnalysisStrategy::select(3, &config), AnalysisStrategy::ModelBased);
    }
}
