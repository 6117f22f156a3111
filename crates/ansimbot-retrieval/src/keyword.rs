//! Keyword gate: core-keyword extraction and corpus coverage check.
//!
//! The extraction heuristic is deliberately small — keep only Hangul
//! syllables and cut at the first postposition particle. It lives behind
//! the [`FocusExtractor`] trait so a different morphology can be substituted
//! without touching the ranker.

use ansimbot_core::traits::FocusExtractor;
use ansimbot_core::types::Document;

use crate::normalize::normalize;

/// Topic/object/subject/location/direction particles. Two-syllable
/// particles come first so the scan matches the longest token at each
/// position.
const POSTPOSITIONS: [&str; 14] = [
    "에서", "으로", "은", "는", "이", "가", "을", "를", "에", "로", "와", "과", "도", "만",
];

/// Default focus extraction: Hangul-only prefix cut at the first particle.
pub struct KoreanParticleFocus;

impl FocusExtractor for KoreanParticleFocus {
    fn extract(&self, text: &str) -> String {
        let norm = normalize(text);
        let hangul_only: Vec<char> = norm
            .chars()
            .filter(|c| ('가'..='힣').contains(c))
            .collect();
        if hangul_only.is_empty() {
            return String::new();
        }

        // A particle at position 0 is part of the word itself (이상거래,
        // 은행, ...), never a suffix — the scan starts at 1.
        let mut cut_idx = None;
        'scan: for i in 1..hangul_only.len() {
            for particle in POSTPOSITIONS {
                if starts_with_at(&hangul_only, i, particle) {
                    cut_idx = Some(i);
                    break 'scan;
                }
            }
        }

        match cut_idx {
            Some(i) => hangul_only[..i].iter().collect(),
            None => hangul_only.iter().collect(),
        }
    }
}

fn starts_with_at(chars: &[char], pos: usize, token: &str) -> bool {
    let mut i = pos;
    for tc in token.chars() {
        if chars.get(i) != Some(&tc) {
            return false;
        }
        i += 1;
    }
    true
}

/// Coverage pre-filter: does the extracted keyword appear in at least one
/// document's normalized title+content?
///
/// An empty keyword passes the gate open — queries with no extractable
/// Hangul focus are left to the similarity threshold instead.
pub fn has_keyword_coverage(
    query: &str,
    documents: &[Document],
    focus: &dyn FocusExtractor,
) -> bool {
    let keyword = focus.extract(query);
    if keyword.is_empty() {
        return true;
    }
    documents.iter().any(|doc| doc.normalized_concat.contains(&keyword))
}
