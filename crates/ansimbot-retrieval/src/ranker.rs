//! Cosine ranking with the keyword gate in front.

use ansimbot_core::traits::FocusExtractor;

use crate::index::{cosine, LexicalIndex};
use crate::keyword::has_keyword_coverage;

/// One retrieval hit. `score` is the cosine similarity between the query
/// vector and the document vector, in [0, 1].
#[derive(Debug, Clone)]
pub struct RankedHit<'a> {
    pub document: &'a ansimbot_core::types::Document,
    pub score: f32,
}

/// Retrieve the top-k documents for a query.
///
/// Gate failure short-circuits to an empty result: no ranking is performed
/// and no spurious similarity score is produced for a query with no lexical
/// relationship to the corpus. An empty index also yields an empty result
/// rather than an error (fails closed).
///
/// Ordering: descending by score, ties broken by original document order
/// (stable sort).
pub fn retrieve_top_k<'a>(
    query: &str,
    index: &'a LexicalIndex,
    k: usize,
    focus: &dyn FocusExtractor,
) -> Vec<RankedHit<'a>> {
    if index.is_empty() {
        return Vec::new();
    }
    if !has_keyword_coverage(query, index.documents(), focus) {
        tracing::debug!(query, "keyword gate rejected query, skipping ranking");
        return Vec::new();
    }
    rank(query, index, k)
}

/// Rank without the keyword gate. Used for topic-prefixed follow-up
/// queries, which are corpus-anchored by construction — the similarity
/// threshold downstream is the effective gate there.
pub fn rank<'a>(query: &str, index: &'a LexicalIndex, k: usize) -> Vec<RankedHit<'a>> {
    if index.is_empty() {
        return Vec::new();
    }
    let query_vec = index.vectorize(query);
    let mut hits: Vec<RankedHit<'a>> = index
        .documents()
        .iter()
        .zip(index.doc_vectors())
        .map(|(document, doc_vec)| RankedHit {
            document,
            score: cosine(&query_vec, doc_vec),
        })
        .collect();

    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits.truncate(k);
    hits
}
