//! Error types surfaced by the analysis core.

use thiserror::Error;

/// Failures while fitting the TF-IDF vocabulary.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("cannot fit a vocabulary on an empty corpus")]
    EmptyCorpus,
    #[error("empty vocabulary; documents only contain stop words or single characters")]
    EmptyVocabulary,
}

/// Failures while training or querying the random forest.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("cannot train on an empty dataset")]
    EmptyDataset,
    #[error("feature rows ({rows}) and labels ({labels}) differ in length")]
    ShapeMismatch { rows: usize, labels: usize },
    #[error("training labels contain a single class ({class}); at least two are required")]
    SingleClass { class: usize },
    #[error("the ensemble needs at least one tree")]
    NoEstimators,
    #[error(transparent)]
    Linfa(#[from] linfa::Error),
}

/// Fatal conditions for a single analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("feature extraction failed: {0}")]
    Features(#[from] FeatureError),
    #[error("model training failed: {0}")]
    Classifier(#[from] ClassifierError),
}
