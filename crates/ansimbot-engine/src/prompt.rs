//! Prompt assembly: fixed Korean instruction text plus the retrieved
//! context block, the optional topic line, and the user question.

/// The only answer the model (or the engine itself) may give for questions
/// outside the corpus.
pub const REFUSAL: &str =
    "안심 거래 및 실시간 이상거래 탐지 관련 내용이 아니라 답변을 드릴 수 없습니다.";

/// Emitted when the backend produced nothing or failed mid-stream.
pub const GENERATION_FAILED: &str = "서버 오류로 답변 생성에 실패했다.";

/// System message sent ahead of the history window on every relay call.
pub const SYSTEM_MESSAGE: &str = "너는 fds_docs.csv를 기반으로 안심 거래 및 실시간 이상거래 탐지에 대해 \
일반 사용자가 이해하기 쉽게 안내하는 챗봇이다. 개인정보를 요구하지 말고, \
주제와 무관한 일반 대화에는 '안심 거래 및 실시간 이상거래 탐지 관련 내용이 아니라 답변을 드릴 수 없습니다.'라고만 답해야 한다.";

/// Build the full grounded prompt for one exchange.
///
/// `topic_title` is the current topic after this turn's retrieval has been
/// applied, so a freshly established topic already shows up in its own
/// prompt.
pub fn build_prompt(user_message: &str, context_text: &str, topic_title: Option<&str>) -> String {
    let topic_line = match topic_title {
        Some(title) => format!(
            "현재 대화의 주요 주제는 '{title}'에 관한 안심 거래·이상거래 탐지 안내다.\n\
             짧은 질문이라도 이 주제를 기준으로 해석해야 한다.\n\n"
        ),
        None => String::new(),
    };

    format!(
        "당신은 안심 거래 및 실시간 이상거래 탐지 관련 일반 사용자 문의에 답하는 챗봇이다.\n\
         fds_docs.csv에 담긴 안내 문서 내용만 참고해 답변해야 한다.\n\
         이 문서에는 거래 보류/승인 안내, 이상거래 탐지 기준, 신고·차단 절차, 사용자 유의사항이 정리되어 있다.\n\n\
         CSV 파일 구조는 다음과 같다.\n\
         - text   : 일반 사용자가 실제로 할 법한 질문이나 문장이다.\n\
         - intent : 해당 질문에 대한 안내 답변 문장이다.\n\n\
         {topic_line}\
         다음 규칙을 반드시 지킨다.\n\
         1) 아래 문서에 있는 text,intent 내용만 바탕으로 한국어로 답한다.\n\
         2) intent 컬럼이 라벨처럼 보이면 그 라벨 이름을 활용해 분류 결과를 설명한다.\n\
         3) intent 컬럼이 전체 문장인 경우 그 내용을 기반으로 FAQ 답변처럼 친절하게 설명한다.\n\
         4) 문서에 관련 정보가 없거나 주제와 무관한 질문이면 \
         '안심 거래 및 실시간 이상거래 탐지 관련 내용이 아니라 답변을 드릴 수 없습니다.'라고만 말한다.\n\
         5) 개인 계좌번호, 비밀번호, 인증번호 등 민감 정보 요청이나 실제 거래 실행/차단 해제 같은 조치 요청은 \
         문서 기반 안내 범위를 벗어나므로 위 문장을 말한다.\n\
         6) 문서에 있는 내용은 바꾸지 말고 의미를 유지하면서 필요하면 자연스럽게 정리해서 말한다.\n\n\
         # 안심 거래 안내 문서에서 검색된 내용\n\
         {context_text}\n\n\
         # 사용자 질문\n\
         {user_message}\n\n\
         # 답변\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_context_question_and_cue() {
        let prompt = build_prompt("신고는 어떻게 하나요?", "[문서 1] 질문: 신고 방법\n내용: 앱에서 접수", None);
        assert!(prompt.contains("# 안심 거래 안내 문서에서 검색된 내용"));
        assert!(prompt.contains("[문서 1] 질문: 신고 방법"));
        assert!(prompt.contains("# 사용자 질문\n신고는 어떻게 하나요?"));
        assert!(prompt.ends_with("# 답변\n"));
    }

    #[test]
    fn test_topic_line_present_only_with_topic() {
        let without = build_prompt("질문", "문맥", None);
        assert!(!without.contains("현재 대화의 주요 주제는"));

        let with = build_prompt("질문", "문맥", Some("이상거래 신고 방법"));
        assert!(with.contains("현재 대화의 주요 주제는 '이상거래 신고 방법'에 관한"));
        assert!(with.contains("짧은 질문이라도 이 주제를 기준으로 해석해야 한다."));
    }

    #[test]
    fn test_refusal_sentence_embedded_in_rules() {
        let prompt = build_prompt("질문", "문맥", None);
        assert!(prompt.contains(REFUSAL));
    }
}
