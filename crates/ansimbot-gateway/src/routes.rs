//! Route handlers.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use ansimbot_core::error::AnsimError;

use crate::server::AppState;

/// Returned when the corpus failed to load at startup and the engine is
/// running degraded.
pub const KB_NOT_READY: &str = "안심 거래/이상거래 탐지 문서 지식 베이스가 초기화되지 않았다.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Serve the built-in chat test page.
pub async fn index() -> Html<&'static str> {
    Html(crate::page::chat_html())
}

/// Health check with knowledge-base status.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    match &state.engine {
        Some(engine) => Json(json!({
            "status": "ok",
            "documents": engine.document_count(),
            "model": state.model,
        })),
        None => Json(json!({
            "status": "degraded",
            "documents": 0,
            "model": state.model,
        })),
    }
}

/// One chat exchange. The answer streams back as `text/plain` chunks with
/// proxy buffering disabled so tokens reach the browser as they arrive.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let Some(engine) = &state.engine else {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, KB_NOT_READY);
    };

    match engine.respond(&request.message).await {
        Ok(stream) => {
            let response = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
                .header(header::CACHE_CONTROL, "no-cache")
                .header("X-Accel-Buffering", "no")
                .body(Body::from_stream(stream));
            match response {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::error!("failed to build stream response: {e}");
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
                }
            }
        }
        Err(AnsimError::EmptyMessage) => {
            error_response(StatusCode::BAD_REQUEST, &AnsimError::EmptyMessage.to_string())
        }
        Err(e) => {
            tracing::error!("chat exchange failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use futures::StreamExt;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use ansimbot_core::config::RetrievalConfig;
    use ansimbot_core::error::Result;
    use ansimbot_core::traits::{CompletionProvider, TokenStream, UnansweredSink};
    use ansimbot_core::types::ChatTurn;
    use ansimbot_engine::Engine;
    use ansimbot_retrieval::corpus::document_from_row;
    use ansimbot_retrieval::{KoreanParticleFocus, LexicalIndex};

    struct StubProvider {
        tokens: Vec<&'static str>,
    }

    #[async_trait]
    impl CompletionProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn stream_chat(&self, _messages: Vec<ChatTurn>) -> Result<TokenStream> {
            let tokens: Vec<Result<String>> =
                self.tokens.iter().map(|t| Ok(t.to_string())).collect();
            Ok(futures::stream::iter(tokens).boxed())
        }
    }

    struct NullSink;

    #[async_trait]
    impl UnansweredSink for NullSink {
        async fn record(&self, _question: &str) -> Result<()> {
            Ok(())
        }
    }

    fn test_router(engine: Option<Arc<Engine>>) -> axum::Router {
        let state = AppState {
            engine,
            model: "gpt-oss-20b".to_string(),
            allowed_origins: vec!["http://localhost:8088".to_string()],
        };
        crate::server::build_router(state)
    }

    fn test_engine(tokens: Vec<&'static str>) -> Arc<Engine> {
        let index = Arc::new(
            LexicalIndex::build(vec![document_from_row(
                "이상거래 신고 방법",
                "앱 내 신고 메뉴에서 접수할 수 있습니다.",
            )])
            .unwrap(),
        );
        Arc::new(Engine::new(
            index,
            Box::new(StubProvider { tokens }),
            Arc::new(NullSink),
            Box::new(KoreanParticleFocus),
            &RetrievalConfig::default(),
        ))
    }

    fn chat_request(message: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri("/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "message": message }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_message_is_400() {
        let app = test_router(Some(test_engine(vec![])));
        let resp = app.oneshot(chat_request("   ")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "메시지가 비어 있다.");
    }

    #[tokio::test]
    async fn test_degraded_engine_is_500() {
        let app = test_router(None);
        let resp = app.oneshot(chat_request("이상거래 신고는?")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], KB_NOT_READY);
    }

    #[tokio::test]
    async fn test_chat_streams_plain_text_with_no_buffering() {
        let app = test_router(Some(test_engine(vec!["앱에서 ", "신고하세요."])));
        let resp = app
            .oneshot(chat_request("이상거래 신고는 어떻게 하나요?"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-cache");
        assert_eq!(resp.headers()["X-Accel-Buffering"], "no");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(std::str::from_utf8(&body).unwrap(), "앱에서 신고하세요.");
    }

    #[tokio::test]
    async fn test_health_reports_document_count() {
        let app = test_router(Some(test_engine(vec![])));
        let resp = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["documents"], 1);
    }

    #[tokio::test]
    async fn test_health_degraded_without_knowledge_base() {
        let app = test_router(None);
        let resp = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "degraded");
    }

    #[tokio::test]
    async fn test_index_serves_chat_page() {
        let app = test_router(None);
        let resp = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(std::str::from_utf8(&body).unwrap().contains("안심 거래"));
    }
}
