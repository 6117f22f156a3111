//! Trait seams the engine is assembled from.
//!
//! The engine never talks to a concrete backend, sink, or keyword heuristic
//! directly — everything is injected as `Box<dyn ...>` so tests can script
//! the collaborators.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;
use crate::types::ChatTurn;

/// A finite, non-restartable stream of produced tokens. Dropping the stream
/// cancels the upstream read.
pub type TokenStream = BoxStream<'static, Result<String>>;

/// A streaming chat-completion backend (OpenAI-compatible or a test double).
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Stream completion tokens for the given message list.
    ///
    /// Returns `AnsimError::Upstream` when no backend could be reached at
    /// all; transport errors after a successful connection are yielded
    /// through the stream.
    async fn stream_chat(&self, messages: Vec<ChatTurn>) -> Result<TokenStream>;
}

/// Destination for queries the corpus could not answer. Fire-and-forget:
/// the engine logs failures and never lets them abort a response.
#[async_trait]
pub trait UnansweredSink: Send + Sync {
    async fn record(&self, question: &str) -> Result<()>;
}

/// Query-focus extraction strategy: reduces a raw query to the core keyword
/// the coverage gate checks against the corpus.
///
/// The default implementation cuts at Korean postposition particles; other
/// morphologies can plug in here without touching the ranker.
pub trait FocusExtractor: Send + Sync {
    /// Extract the core keyword. Empty string means "no extractable focus",
    /// which makes the coverage gate pass open.
    fn extract(&self, text: &str) -> String;
}
