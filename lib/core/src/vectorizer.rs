// TF-IDF vectorizer for catalog items
use crate::catalog::Catalog;
use crate::sparse::SparseVector;
use crate::tokenizer::tokenize_filtered;
use crate::{Error, Result};
use ahash::AHashMap;
use rayon::prelude::*;
use tracing::{debug, info};

/// Distinct tokens of a fitted catalog with their IDF weights.
///
/// Term ids follow lexicographic order of the tokens.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    idf: Vec<f32>,
    lookup: AHashMap<String, u32>,
}

impl Vocabulary {
    fn new(terms: Vec<String>, idf: Vec<f32>) -> Self {
        let lookup = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();
        Self { terms, idf, lookup }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn term_id(&self, term: &str) -> Option<u32> {
        self.lookup.get(term).copied()
    }

    #[inline]
    pub fn term(&self, id: u32) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    #[inline]
    pub fn idf(&self, id: u32) -> Option<f32> {
        self.idf.get(id as usize).copied()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Smoothed inverse document frequency: `ln((1 + n) / (1 + df)) + 1`
#[inline]
pub fn smoothed_idf(n_docs: usize, df: usize) -> f32 {
    (((1 + n_docs) as f64 / (1 + df) as f64).ln() + 1.0) as f32
}

fn term_counts(text: &str) -> AHashMap<String, u32> {
    let mut counts = AHashMap::new();
    for token in tokenize_filtered(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// A fitted TF-IDF model: vocabulary plus one normalized row per catalog item.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    vocabulary: Vocabulary,
}

impl TfIdfVectorizer {
    /// Fit the vocabulary on the whole catalog and weight every item.
    ///
    /// Rows are returned in catalog order.
    pub fn fit(catalog: &Catalog) -> Result<(Self, Vec<SparseVector>)> {
        if catalog.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        let n_docs = catalog.len();

        let docs: Vec<AHashMap<String, u32>> = catalog
            .items()
            .par_iter()
            .map(|item| term_counts(&item.combined_text()))
            .collect();

        let mut df: AHashMap<&str, usize> = AHashMap::new();
        for doc in &docs {
            for term in doc.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        if df.is_empty() {
            return Err(Error::EmptyVocabulary);
        }

        let mut terms: Vec<String> = df.keys().map(|t| t.to_string()).collect();
        terms.sort_unstable();
        let idf: Vec<f32> = terms.iter().map(|t| smoothed_idf(n_docs, df[t.as_str()])).collect();
        let vectorizer = Self {
            vocabulary: Vocabulary::new(terms, idf),
        };

        let rows: Vec<SparseVector> = docs
            .par_iter()
            .map(|counts| vectorizer.weigh(counts))
            .collect();

        let empty_rows = rows.iter().filter(|r| r.is_zero()).count();
        if empty_rows > 0 {
            debug!("{} catalog items have no indexable tokens", empty_rows);
        }
        info!(
            "Vectorized {} items over a vocabulary of {} terms",
            n_docs,
            vectorizer.vocabulary.len()
        );
        Ok((vectorizer, rows))
    }

    fn weigh(&self, counts: &AHashMap<String, u32>) -> SparseVector {
        let pairs = counts
            .iter()
            .filter_map(|(term, &tf)| {
                let id = self.vocabulary.term_id(term)?;
                let idf = self.vocabulary.idf(id)?;
                Some((id, tf as f32 * idf))
            })
            .collect();
        SparseVector::from_pairs(pairs).normalized()
    }

    /// Project arbitrary text onto the fitted vocabulary.
    ///
    /// Tokens unseen at fit time are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&term_counts(text))
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }
}
