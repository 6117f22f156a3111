//! Error taxonomy.
//!
//! Relevance-gate failures and below-threshold retrieval are NOT errors —
//! they are a designed refusal path with a fixed payload and never surface
//! here. Malformed stream chunks are recovered inside the relay (skipped and
//! counted) and never surface here either.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnsimError {
    /// Configuration file could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// Corpus file was unreadable or contained no usable rows.
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Lexical index construction failed (empty document set).
    /// Fatal at startup: the engine runs in a disabled state afterwards.
    #[error("Index build failed: {0}")]
    IndexBuild(String),

    /// Transport-level HTTP failure against one endpoint.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Every configured completion endpoint failed; carries the last error.
    #[error("All completion endpoints unreachable: {0}")]
    Upstream(String),

    /// Caller submitted an empty message.
    #[error("메시지가 비어 있다.")]
    EmptyMessage,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnsimError>;
