//! Crowd-reported location safety analysis.
//!
//! Raw location rows are normalised into text and validated ratings, then
//! scored either by a direct rating rule (tiny datasets) or by a seeded
//! random forest over TF-IDF features, and finally ranked into a report.

pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod model;
pub mod nlp;
pub mod output;

pub use analysis::{analyze, AnalysisReport, AnalysisStrategy, Prediction, SafetyLabel};
pub use config::{AnalysisConfig, Settings};
