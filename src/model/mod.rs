//! Safety labels and the ensemble classifier.

pub mod forest;
pub mod labels;
pub mod tree;

use linfa::{dataset::DatasetBase, traits::Fit};
use ndarray::{Array1, Array2};
use tracing::info;

use crate::{config::ForestConfig, error::ClassifierError};

pub use forest::{RandomForest, RandomForestParams};
pub use labels::{derive_label, derive_labels, SAFE, UNSAFE};

/// What the trained path needs from a fitted forest.
#[derive(Debug, Clone)]
pub struct ModelScores {
    /// Probability of the safe class, per training row.
    pub safety_scores: Array1<f64>,
    /// Global importance per feature column.
    pub importances: Array1<f64>,
}

/// Fit a forest on `(features, labels)` and score the same rows.
pub fn train_and_score(
    features: Array2<f64>,
    labels: Array1<usize>,
    config: ForestConfig,
) -> Result<ModelScores, ClassifierError> {
    let dataset = DatasetBase::new(features, labels);
    let forest = RandomForestParams::new(config).fit(&dataset)?;
    let safety_scores = forest.class_probability(dataset.records.view(), SAFE);
    let importances = forest.feature_importances();
    info!(
        trees = forest.n_trees(),
        features = forest.n_features(),
        seed = config.random_seed,
        "trained safety classifier"
    );
    Ok(ModelScores {
        safety_scores,
        importances,
    })
}
