//! Context block formatting for the assembled prompt.

use ansimbot_retrieval::RankedHit;

/// Fixed text used when retrieval produced nothing usable.
pub const NO_CONTEXT: &str = "관련된 안심 거래/이상거래 탐지 문서를 찾지 못했다.";

/// Render ranked hits as a numbered document block.
///
/// Numbering follows rank position, so a skipped low-score hit leaves a gap
/// rather than renumbering the survivors. Returns the block and whether at
/// least one hit cleared `min_score`.
pub fn format_context(hits: &[RankedHit<'_>], min_score: f32) -> (String, bool) {
    if hits.is_empty() {
        return (NO_CONTEXT.to_string(), false);
    }

    let mut lines = Vec::new();
    let mut has_valid = false;
    for (i, hit) in hits.iter().enumerate() {
        if hit.score < min_score {
            continue;
        }
        has_valid = true;
        let rank = i + 1;
        let title = if hit.document.title.is_empty() {
            format!("문서 {rank}")
        } else {
            hit.document.title.clone()
        };
        lines.push(format!("[문서 {rank}] 질문: {title}"));
        lines.push(format!("내용: {}", hit.document.content));
        lines.push(String::new());
    }

    if lines.is_empty() {
        return (NO_CONTEXT.to_string(), false);
    }
    (lines.join("\n"), has_valid)
}
