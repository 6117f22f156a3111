//! Character n-gram TF-IDF index.
//!
//! Reimplements the fitted model the corpus was originally indexed with:
//! character 2..4-grams over normalized text, smoothed idf
//! (`ln((1+n)/(1+df)) + 1`), L2-normalized sparse vectors. Built once at
//! startup and read-only afterwards — safe for unsynchronized concurrent
//! reads. Query vectors are produced by the same fitted vocabulary;
//! out-of-vocabulary n-grams contribute zero weight.

use std::collections::HashMap;

use ansimbot_core::error::{AnsimError, Result};
use ansimbot_core::types::Document;

use crate::normalize::normalize;

const NGRAM_MIN: usize = 2;
const NGRAM_MAX: usize = 4;

/// Sparse weight vector: `(term_id, weight)` pairs sorted by term id.
pub type SparseVector = Vec<(usize, f32)>;

/// Immutable lexical index over the document set.
#[derive(Debug)]
pub struct LexicalIndex {
    documents: Vec<Document>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    doc_vectors: Vec<SparseVector>,
}

impl LexicalIndex {
    /// Fit the index over the document set.
    ///
    /// Per-document corpus text is `normalize(title + "\n" + content)` — the
    /// same normalizer the query path runs through, so vocabulary alignment
    /// is exact. Fails with [`AnsimError::IndexBuild`] on an empty set.
    pub fn build(documents: Vec<Document>) -> Result<Self> {
        if documents.is_empty() {
            return Err(AnsimError::IndexBuild("document set is empty".into()));
        }

        let corpus: Vec<String> = documents
            .iter()
            .map(|doc| normalize(&format!("{}\n{}", doc.title, doc.content)))
            .collect();

        // Pass 1: vocabulary + document frequencies.
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut df: Vec<u32> = Vec::new();
        for text in &corpus {
            let mut seen: Vec<usize> = Vec::new();
            for gram in ngrams(text) {
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(gram).or_insert(next_id);
                if id == df.len() {
                    df.push(0);
                }
                if !seen.contains(&id) {
                    seen.push(id);
                    df[id] += 1;
                }
            }
        }

        let n_docs = corpus.len() as f32;
        let idf: Vec<f32> = df
            .iter()
            .map(|&d| ((1.0 + n_docs) / (1.0 + d as f32)).ln() + 1.0)
            .collect();

        // Pass 2: weighted, L2-normalized document vectors.
        let doc_vectors = corpus
            .iter()
            .map(|text| weigh(text, &vocabulary, &idf))
            .collect();

        tracing::debug!(
            documents = documents.len(),
            vocabulary = vocabulary.len(),
            "lexical index built"
        );

        Ok(Self { documents, vocabulary, idf, doc_vectors })
    }

    /// Vectorize a query through the fitted model.
    pub fn vectorize(&self, query: &str) -> SparseVector {
        weigh(&normalize(query), &self.vocabulary, &self.idf)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn doc_vectors(&self) -> &[SparseVector] {
        &self.doc_vectors
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// All character n-grams of sizes 2..=4.
fn ngrams(text: &str) -> impl Iterator<Item = String> + '_ {
    let chars: Vec<char> = text.chars().collect();
    (NGRAM_MIN..=NGRAM_MAX).flat_map(move |n| {
        let chars = chars.clone();
        (0..chars.len().saturating_sub(n - 1))
            .map(move |i| chars[i..i + n].iter().collect::<String>())
            .collect::<Vec<_>>()
    })
}

/// Term counts × idf, L2-normalized, sorted by term id.
fn weigh(text: &str, vocabulary: &HashMap<String, usize>, idf: &[f32]) -> SparseVector {
    let mut counts: HashMap<usize, f32> = HashMap::new();
    for gram in ngrams(text) {
        if let Some(&id) = vocabulary.get(&gram) {
            *counts.entry(id).or_insert(0.0) += 1.0;
        }
    }

    let mut vector: SparseVector = counts
        .into_iter()
        .map(|(id, count)| (id, count * idf[id]))
        .collect();
    vector.sort_unstable_by_key(|&(id, _)| id);

    let norm: f32 = vector.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in &mut vector {
            *w /= norm;
        }
    }
    vector
}

/// Dot product of two sorted sparse vectors. Both sides are L2-normalized,
/// so this is the cosine similarity, in [0, 1] for non-negative weights.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f32 {
    let (mut i, mut j, mut dot) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}
