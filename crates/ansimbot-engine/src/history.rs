//! Shared dialog state: bounded conversation history and the current topic.
//!
//! One instance per process, no per-caller partitioning — every request
//! reads and writes the same history and topic, matching the observed
//! single-shared-conversation behavior. The engine serializes access behind
//! a mutex (see `Engine`).

use ansimbot_core::types::ChatTurn;

/// Stored history bound: 10 entries = 5 exchanges, oldest dropped first.
pub const HISTORY_MAX_TURNS: usize = 10;

/// How many stored turns are replayed to the completion backend per request.
pub const RELAY_WINDOW_TURNS: usize = 6;

/// Mutable cross-turn state for the single shared conversation.
#[derive(Debug, Default)]
pub struct DialogState {
    history: Vec<ChatTurn>,
    last_doc_title: Option<String>,
}

impl DialogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed exchange, then enforce the history bound.
    pub fn push_exchange(&mut self, user: ChatTurn, assistant: ChatTurn) {
        self.history.push(user);
        self.history.push(assistant);
        if self.history.len() > HISTORY_MAX_TURNS {
            let drop = self.history.len() - HISTORY_MAX_TURNS;
            self.history.drain(..drop);
        }
    }

    /// The most recent turns fed back into the relay, oldest-first.
    pub fn relay_window(&self) -> &[ChatTurn] {
        let start = self.history.len().saturating_sub(RELAY_WINDOW_TURNS);
        &self.history[start..]
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn last_doc_title(&self) -> Option<&str> {
        self.last_doc_title.as_deref()
    }

    /// Set the current topic to the title of the best-ranked document.
    pub fn set_topic(&mut self, title: impl Into<String>) {
        self.last_doc_title = Some(title.into());
    }

    /// Explicit reset hook. Never called automatically — the topic persists
    /// for the life of the process, exactly as observed upstream.
    pub fn clear_topic(&mut self) {
        self.last_doc_title = None;
    }

    /// The composite retrieval query: current topic title prepended to the
    /// message, so a short follow-up inherits the subject of the prior
    /// answer.
    pub fn retrieval_query(&self, user_message: &str) -> String {
        match &self.last_doc_title {
            Some(title) => format!("{title} {user_message}"),
            None => user_message.to_string(),
        }
    }
}
