//! Text handling: record normalisation and TF-IDF features.

pub mod normalize;
pub mod stopwords;
pub mod tfidf;

pub use normalize::{normalize_records, NormalizedSample, EMPTY_TEXT_SENTINEL};
pub use tfidf::TfidfVectorizer;
