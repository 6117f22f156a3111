//! Wire and corpus types shared across the workspace.

use serde::{Deserialize, Serialize};

/// Role of a chat turn, serialized exactly as the OpenAI-compatible wire
/// format expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of conversation, `{role, content}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// One corpus entry: a likely user question (`title`) and its canonical
/// answer (`content`). Built once at startup, immutable thereafter.
///
/// `normalized_concat` is `normalize(title + content)` and is used only for
/// the keyword-coverage gate, never for ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub content: String,
    pub normalized_concat: String,
}
