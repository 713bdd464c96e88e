//! TF-IDF feature extraction over word unigrams and bigrams.
//!
//! Tokens are lowercased runs of two or more word characters. Stop words are
//! removed before n-grams are formed, so a bigram may bridge a removed word.
//! When the vocabulary exceeds `max_features`, the terms with the highest
//! corpus-wide counts are kept (ties resolved alphabetically) and columns are
//! ordered alphabetically. Weights use smoothed inverse document frequency,
//! `ln((1 + n) / (1 + df)) + 1`, and every row is L2-normalised.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use ndarray::Array2;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{config::VectorizerConfig, error::FeatureError, nlp::stopwords};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

/// Vocabulary-fitting vectorizer; a fresh instance is fitted for every run.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    /// Term to inverse document frequency, in column order.
    vocabulary: IndexMap<String, f64>,
}

#[derive(Debug, Default, Clone, Copy)]
struct TermStats {
    count: usize,
    doc_freq: usize,
}

impl TfidfVectorizer {
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            vocabulary: IndexMap::new(),
        }
    }

    /// Split `text` into the unigram/bigram terms counted by the vectorizer.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|token| !self.config.english_stop_words || !stopwords::is_english_stop_word(token))
            .collect();

        let (min_n, max_n) = self.config.ngram_range;
        let mut terms = Vec::new();
        for n in min_n.max(1)..=max_n.max(min_n.max(1)) {
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }

    /// Learn the vocabulary and document frequencies from `documents`.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<(), FeatureError> {
        if documents.is_empty() {
            return Err(FeatureError::EmptyCorpus);
        }

        let mut stats: BTreeMap<String, TermStats> = BTreeMap::new();
        for doc in documents {
            let mut seen: HashMap<String, usize> = HashMap::new();
            for term in self.analyze(doc.as_ref()) {
                *seen.entry(term).or_insert(0) += 1;
            }
            for (term, count) in seen {
                let entry = stats.entry(term).or_default();
                entry.count += count;
                entry.doc_freq += 1;
            }
        }
        if stats.is_empty() {
            return Err(FeatureError::EmptyVocabulary);
        }

        // BTreeMap iteration is alphabetical, so the stable sort breaks count ties by term.
        let mut ranked: Vec<(String, TermStats)> = stats.into_iter().collect();
        ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count));
        ranked.truncate(self.config.max_features);
        ranked.sort_by(|a, b| a.0.cmp(&b.0));

        let n_docs = documents.len() as f64;
        self.vocabulary = ranked
            .into_iter()
            .map(|(term, stat)| {
                let idf = ((1.0 + n_docs) / (1.0 + stat.doc_freq as f64)).ln() + 1.0;
                (term, idf)
            })
            .collect();
        debug!(terms = self.vocabulary.len(), "fitted tfidf vocabulary");
        Ok(())
    }

    /// Weight `documents` against the fitted vocabulary.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((documents.len(), self.vocabulary.len()));
        for (row_idx, doc) in documents.iter().enumerate() {
            let mut row = matrix.row_mut(row_idx);
            for term in self.analyze(doc.as_ref()) {
                if let Some(col) = self.vocabulary.get_index_of(&term) {
                    row[col] += 1.0;
                }
            }
            for (col, (_, idf)) in self.vocabulary.iter().enumerate() {
                row[col] *= idf;
            }
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }
        matrix
    }

    pub fn fit_transform<S: AsRef<str>>(
        &mut self,
        documents: &[S],
    ) -> Result<Array2<f64>, FeatureError> {
        self.fit(documents)?;
        Ok(self.transform(documents))
    }

    /// Term behind feature column `index`.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.vocabulary.get_index(index).map(|(term, _)| term.as_str())
    }

    /// Every term, in feature column order.
    pub fn feature_names(&self) -> Vec<&str> {
        self.vocabulary.keys().map(String::as_str).collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).copied()
    }
}
