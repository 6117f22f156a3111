//! # Ansimbot Engine
//!
//! The per-exchange pipeline: keyword gate and retrieval, topic tracking,
//! prompt assembly, streaming relay, and bounded history upkeep.
//!
//! One `Engine` serves one shared conversation. A mutex around
//! [`DialogState`] serializes the read-retrieve-update critical section of
//! each exchange; token streaming happens outside the lock so a slow reader
//! never blocks the next request's retrieval.

pub mod context;
pub mod history;
pub mod prompt;
pub mod sink;

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{mpsc, Mutex};
use tokio_stream::wrappers::ReceiverStream;

use ansimbot_core::config::RetrievalConfig;
use ansimbot_core::error::{AnsimError, Result};
use ansimbot_core::traits::{CompletionProvider, FocusExtractor, TokenStream, UnansweredSink};
use ansimbot_core::types::ChatTurn;
use ansimbot_retrieval::{rank, retrieve_top_k, LexicalIndex};

use crate::context::format_context;
use crate::history::DialogState;
use crate::prompt::{build_prompt, GENERATION_FAILED, REFUSAL, SYSTEM_MESSAGE};

pub use crate::sink::FileSink;

/// The exchange pipeline. Construct once at startup, share behind an `Arc`.
pub struct Engine {
    index: Arc<LexicalIndex>,
    provider: Box<dyn CompletionProvider>,
    sink: Arc<dyn UnansweredSink>,
    focus: Box<dyn FocusExtractor>,
    state: Arc<Mutex<DialogState>>,
    top_k: usize,
    min_score: f32,
}

impl Engine {
    pub fn new(
        index: Arc<LexicalIndex>,
        provider: Box<dyn CompletionProvider>,
        sink: Arc<dyn UnansweredSink>,
        focus: Box<dyn FocusExtractor>,
        retrieval: &RetrievalConfig,
    ) -> Self {
        Self {
            index,
            provider,
            sink,
            focus,
            state: Arc::new(Mutex::new(DialogState::new())),
            top_k: retrieval.top_k,
            min_score: retrieval.min_score,
        }
    }

    pub fn document_count(&self) -> usize {
        self.index.documents().len()
    }

    /// Run one exchange. Returns a token stream the caller relays verbatim;
    /// the assistant turn is recorded into history when the stream finishes
    /// (or with whatever accumulated if the caller disconnects mid-stream).
    ///
    /// `AnsimError::EmptyMessage` is the only error surfaced directly; every
    /// downstream failure turns into a fixed-sentence stream instead so the
    /// client always gets readable text.
    pub async fn respond(&self, user_message: &str) -> Result<TokenStream> {
        let user_message = user_message.trim();
        if user_message.is_empty() {
            return Err(AnsimError::EmptyMessage);
        }

        // Critical section: retrieval query, ranking, topic update, and
        // prompt assembly all see one consistent state snapshot.
        let mut state = self.state.lock().await;

        let query = state.retrieval_query(user_message);
        let topic_was_set = state.last_doc_title().is_some();

        // With a topic set the query is corpus-anchored by construction, so
        // the keyword gate would only misfire on the follow-up suffix. The
        // score threshold still rejects drifted follow-ups.
        let hits = if topic_was_set {
            rank(&query, &self.index, self.top_k)
        } else {
            retrieve_top_k(&query, &self.index, self.top_k, self.focus.as_ref())
        };

        let (context_text, has_valid_context) = format_context(&hits, self.min_score);

        if has_valid_context {
            if let Some(top) = hits.first() {
                if !top.document.title.is_empty() {
                    state.set_topic(top.document.title.clone());
                }
            }
        }

        if !has_valid_context {
            tracing::info!(query = user_message, "no usable context, refusing");
            if let Err(e) = self.sink.record(user_message).await {
                tracing::warn!("failed to record unanswered question: {e}");
            }
            state.push_exchange(
                ChatTurn::user(user_message),
                ChatTurn::assistant(REFUSAL),
            );
            drop(state);
            return Ok(futures::stream::once(async { Ok(REFUSAL.to_string()) }).boxed());
        }

        let prompt = build_prompt(user_message, &context_text, state.last_doc_title());

        let mut messages = Vec::with_capacity(2 + state.relay_window().len());
        messages.push(ChatTurn::system(SYSTEM_MESSAGE));
        messages.extend(state.relay_window().iter().cloned());
        messages.push(ChatTurn::user(prompt));
        drop(state);

        let upstream = match self.provider.stream_chat(messages).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!(provider = self.provider.name(), "completion failed: {e}");
                let mut state = self.state.lock().await;
                state.push_exchange(
                    ChatTurn::user(user_message),
                    ChatTurn::assistant(GENERATION_FAILED),
                );
                return Ok(
                    futures::stream::once(async { Ok(GENERATION_FAILED.to_string()) }).boxed()
                );
            }
        };

        Ok(self.tee_and_record(user_message.to_string(), upstream))
    }

    /// Forward upstream tokens to the caller while accumulating the full
    /// answer, then record the exchange. An upstream failure or an empty
    /// stream is replaced by the fixed failure sentence; a caller disconnect
    /// stops forwarding but the partial answer is still recorded.
    fn tee_and_record(&self, user_message: String, mut upstream: TokenStream) -> TokenStream {
        let (tx, rx) = mpsc::channel::<Result<String>>(32);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let mut full_answer = String::new();
            let mut caller_gone = false;

            while let Some(item) = upstream.next().await {
                match item {
                    Ok(token) => {
                        full_answer.push_str(&token);
                        if !caller_gone && tx.send(Ok(token)).await.is_err() {
                            caller_gone = true;
                            // Dropping upstream cancels the backend read.
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("stream failed mid-answer: {e}");
                        full_answer = GENERATION_FAILED.to_string();
                        if !caller_gone {
                            let _ = tx.send(Ok(GENERATION_FAILED.to_string())).await;
                        }
                        break;
                    }
                }
            }

            if full_answer.is_empty() {
                full_answer = GENERATION_FAILED.to_string();
                if !caller_gone {
                    let _ = tx.send(Ok(GENERATION_FAILED.to_string())).await;
                }
            }

            let mut state = state.lock().await;
            state.push_exchange(
                ChatTurn::user(user_message),
                ChatTurn::assistant(full_answer),
            );
        });

        ReceiverStream::new(rx).boxed()
    }
}
