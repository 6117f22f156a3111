//! Streaming relay against OpenAI-compatible chat-completions endpoints.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use ansimbot_core::config::AnsimConfig;
use ansimbot_core::error::{AnsimError, Result};
use ansimbot_core::traits::{CompletionProvider, TokenStream};
use ansimbot_core::types::ChatTurn;

use crate::sse::{parse_stream_line, StreamLine};

/// Relay that tries each configured endpoint in order and streams the first
/// reachable one's tokens back through a channel. Dropping the returned
/// stream drops the channel receiver, which stops the upstream read on the
/// next send.
pub struct OpenAiCompatibleRelay {
    model: String,
    endpoints: Vec<String>,
    attempt_timeout: Duration,
    client: reqwest::Client,
    skipped_chunks: Arc<AtomicU64>,
}

impl OpenAiCompatibleRelay {
    pub fn new(config: &AnsimConfig) -> Self {
        Self::with_endpoints(
            &config.model,
            config.endpoints.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn with_endpoints(model: &str, endpoints: Vec<String>, attempt_timeout: Duration) -> Self {
        Self {
            model: model.to_string(),
            endpoints,
            attempt_timeout,
            client: reqwest::Client::new(),
            skipped_chunks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Total malformed stream chunks skipped since startup (best-effort line
    /// recovery counter).
    pub fn skipped_chunks(&self) -> u64 {
        self.skipped_chunks.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleRelay {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn stream_chat(&self, messages: Vec<ChatTurn>) -> Result<TokenStream> {
        let body = json!({
            "model": self.model,
            "messages": messages,
            "stream": true,
        });

        let mut last_error: Option<AnsimError> = None;

        for url in &self.endpoints {
            let attempt = self.client.post(url).json(&body).send();
            let response = match tokio::time::timeout(self.attempt_timeout, attempt).await {
                Ok(Ok(resp)) => resp,
                Ok(Err(e)) => {
                    tracing::warn!(%url, "endpoint connection failed: {e}");
                    last_error = Some(AnsimError::Http(format!("connection failed ({url}): {e}")));
                    continue;
                }
                Err(_) => {
                    tracing::warn!(%url, timeout = ?self.attempt_timeout, "endpoint timed out");
                    last_error = Some(AnsimError::Http(format!("timed out ({url})")));
                    continue;
                }
            };

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                tracing::warn!(%url, %status, "endpoint returned error status");
                last_error = Some(AnsimError::Http(format!("{url} returned {status}: {text}")));
                continue;
            }

            tracing::debug!(%url, model = %self.model, "streaming from endpoint");
            let (tx, rx) = mpsc::channel::<Result<String>>(32);
            let skipped = Arc::clone(&self.skipped_chunks);
            tokio::spawn(relay_body(response, tx, skipped));
            return Ok(ReceiverStream::new(rx).boxed());
        }

        Err(AnsimError::Upstream(
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no endpoints configured".into()),
        ))
    }
}

/// Read the response body incrementally, parse line by line, and forward
/// tokens until `[DONE]`, a full-content payload, end of body, or the
/// receiver goes away.
///
/// The buffer holds raw bytes and only complete lines are decoded: network
/// chunk boundaries can fall inside a multi-byte UTF-8 character, so
/// decoding per chunk would mangle Korean tokens.
async fn relay_body(
    response: reqwest::Response,
    tx: mpsc::Sender<Result<String>>,
    skipped: Arc<AtomicU64>,
) {
    let mut body = response.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = body.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tx.send(Err(AnsimError::Http(format!("stream read failed: {e}")))).await;
                return;
            }
        };
        buffer.extend_from_slice(&bytes);

        while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            match handle_line(&line, &tx, &skipped).await {
                LineOutcome::Continue => {}
                LineOutcome::Stop => return,
            }
        }
    }

    // Trailing line without a newline terminator.
    if !buffer.is_empty() {
        let line = String::from_utf8_lossy(&buffer);
        let _ = handle_line(&line, &tx, &skipped).await;
    }
}

enum LineOutcome {
    Continue,
    Stop,
}

async fn handle_line(
    line: &str,
    tx: &mpsc::Sender<Result<String>>,
    skipped: &AtomicU64,
) -> LineOutcome {
    match parse_stream_line(line) {
        StreamLine::Token(token) => {
            if tx.send(Ok(token)).await.is_err() {
                // Caller disconnected; stop reading upstream.
                return LineOutcome::Stop;
            }
            LineOutcome::Continue
        }
        StreamLine::Final(content) => {
            let _ = tx.send(Ok(content)).await;
            LineOutcome::Stop
        }
        StreamLine::Done => LineOutcome::Stop,
        StreamLine::Empty => LineOutcome::Continue,
        StreamLine::Malformed => {
            let count = skipped.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::debug!(total_skipped = count, "skipped malformed stream chunk");
            LineOutcome::Continue
        }
    }
}
