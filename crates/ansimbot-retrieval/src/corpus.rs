//! Corpus loading from the `text,intent` CSV.
//!
//! `text` is a question a user would actually ask, `intent` the canonical
//! answer. Rows missing either field are skipped; ordering is preserved
//! because the ranker breaks score ties by original document order.

use std::path::Path;

use ansimbot_core::error::{AnsimError, Result};
use ansimbot_core::types::Document;

use crate::normalize::normalize;

/// Build a [`Document`] from one usable row.
pub fn document_from_row(text: &str, intent: &str) -> Document {
    Document {
        title: text.to_string(),
        content: intent.to_string(),
        normalized_concat: normalize(&format!("{text}{intent}")),
    }
}

/// Load the ordered document list from a CSV file.
///
/// Fails with [`AnsimError::Corpus`] when the file is unreadable, the
/// header lacks `text`/`intent` columns, or no usable row remains.
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AnsimError::Corpus(format!("failed to read {}: {e}", path.display())))?;
    // Tolerate a UTF-8 BOM (files exported from spreadsheet tools).
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let mut reader = csv::Reader::from_reader(raw.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| AnsimError::Corpus(format!("invalid CSV header: {e}")))?;

    let text_col = headers.iter().position(|h| h.trim() == "text");
    let intent_col = headers.iter().position(|h| h.trim() == "intent");
    let (text_col, intent_col) = match (text_col, intent_col) {
        (Some(t), Some(i)) => (t, i),
        _ => {
            return Err(AnsimError::Corpus(
                "corpus CSV must have 'text' and 'intent' columns".into(),
            ))
        }
    };

    let mut documents = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AnsimError::Corpus(format!("invalid CSV row: {e}")))?;
        let text = record.get(text_col).unwrap_or("").trim();
        let intent = record.get(intent_col).unwrap_or("").trim();
        if text.is_empty() || intent.is_empty() {
            continue;
        }
        documents.push(document_from_row(text, intent));
    }

    if documents.is_empty() {
        return Err(AnsimError::Corpus(format!(
            "no usable rows in {}",
            path.display()
        )));
    }

    tracing::info!(count = documents.len(), path = %path.display(), "corpus loaded");
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_ordered_documents() {
        let file = write_csv(
            "text,intent\n\
             이상거래 신고 방법,앱 내 신고 메뉴를 이용하세요.\n\
             거래 보류 해제,고객센터에서 해제됩니다.\n",
        );
        let docs = load_documents(file.path()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].title, "이상거래 신고 방법");
        assert_eq!(docs[0].normalized_concat, "이상거래신고방법앱내신고메뉴를이용하세요.");
        assert_eq!(docs[1].title, "거래 보류 해제");
    }

    #[test]
    fn test_skips_rows_with_missing_fields() {
        let file = write_csv(
            "text,intent\n\
             질문만 있음,\n\
             ,답변만 있음\n\
             정상 질문,정상 답변\n",
        );
        let docs = load_documents(file.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "정상 질문");
    }

    #[test]
    fn test_quoted_fields_with_commas() {
        let file = write_csv("text,intent\n\"신고, 차단 절차\",\"먼저 앱을 열고, 신고를 누르세요\"\n");
        let docs = load_documents(file.path()).unwrap();
        assert_eq!(docs[0].title, "신고, 차단 절차");
    }

    #[test]
    fn test_utf8_bom_is_tolerated() {
        let file = write_csv("\u{feff}text,intent\n질문,답변\n");
        let docs = load_documents(file.path()).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let file = write_csv("text,intent\n");
        let err = load_documents(file.path()).unwrap_err();
        assert!(matches!(err, AnsimError::Corpus(_)));
    }

    #[test]
    fn test_missing_columns_is_an_error() {
        let file = write_csv("question,answer\nq,a\n");
        let err = load_documents(file.path()).unwrap_err();
        assert!(matches!(err, AnsimError::Corpus(_)));
    }
}
