//! Runtime configuration utilities for safety-scope.

use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Location dataset; the extension selects the reader.
    pub locations_source: PathBuf,
    /// Default destination for the JSON report.
    pub output_path: PathBuf,
    /// Static directory served next to the API.
    pub public_dir: PathBuf,
    /// Pipeline knobs, with seed and forest size overridable from the environment.
    pub analysis: AnalysisConfig,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let locations_source = env::var("LOCATIONS_SOURCE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/locations.json"));
        let output_path = env::var("SAFETY_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public/safety_predictions.json"));
        let public_dir = env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./public"));

        let mut analysis = AnalysisConfig::default();
        if let Some(seed) = env::var("ANALYSIS_SEED").ok().and_then(|v| v.parse().ok()) {
            analysis.random_seed = seed;
        }
        if let Some(trees) = env::var("ANALYSIS_TREES").ok().and_then(|v| v.parse().ok()) {
            analysis.n_estimators = trees;
        }

        Ok(Self {
            locations_source,
            output_path,
            public_dir,
            analysis,
        })
    }
}

/// Every constant the analysis pipeline depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub max_features: usize,
    pub ngram_range: (usize, usize),
    pub english_stop_words: bool,
    pub n_estimators: usize,
    pub random_seed: u64,
    /// Ratings at or above this value are labelled safe.
    pub rating_threshold: f64,
    /// Class-1 probabilities at or above this value are predicted safe.
    pub probability_threshold: f64,
    /// Below this many retained samples the rule-based path is used.
    pub min_training_samples: usize,
    pub top_risk_factors: usize,
    /// Inclusive bounds a parsed rating must fall in to be retained.
    pub rating_range: (f64, f64),
    /// Upper end of the rating scale, used to rescale ratings onto [0, 1].
    pub rating_scale: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_features: 100,
            ngram_range: (1, 2),
            english_stop_words: true,
            n_estimators: 50,
            random_seed: 42,
            rating_threshold: 3.0,
            probability_threshold: 0.5,
            min_training_samples: 3,
            top_risk_factors: 5,
            rating_range: (0.0, 5.0),
            rating_scale: 5.0,
        }
    }
}

impl AnalysisConfig {
    /// Sub-configuration handed to the TF-IDF vectorizer.
    pub fn vectorizer(&self) -> VectorizerConfig {
        VectorizerConfig {
            max_features: self.max_features,
            ngram_range: self.ngram_range,
            english_stop_words: self.english_stop_words,
        }
    }

    /// Sub-configuration handed to the random forest.
    pub fn forest(&self) -> ForestConfig {
        ForestConfig {
            n_estimators: self.n_estimators,
            random_seed: self.random_seed,
            ..ForestConfig::default()
        }
    }
}

/// Vocabulary and n-gram settings for the feature extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub max_features: usize,
    pub ngram_range: (usize, usize),
    pub english_stop_words: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        AnalysisConfig::default().vectorizer()
    }
}

/// Ensemble settings for the classifier engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub random_seed: u64,
    /// Resample the training rows with replacement for every tree.
    pub bootstrap: bool,
    pub min_samples_split: usize,
    /// `None` grows every tree until its leaves are pure.
    pub max_depth: Option<usize>,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 50,
            random_seed: 42,
            bootstrap: true,
            min_samples_split: 2,
            max_depth: None,
        }
    }
}
