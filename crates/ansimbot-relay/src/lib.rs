//! # Ansimbot Relay
//!
//! Streams chat-completion tokens from an OpenAI-compatible endpoint
//! (`{model, messages, stream: true}` in, `data: {json}` SSE chunks out,
//! terminated by a `[DONE]` sentinel).
//!
//! Resilience model: candidate endpoints are tried in order with a bounded
//! per-attempt timeout; the first reachable one wins the request. No retries
//! within a single endpoint — failover across the candidate list is the only
//! mechanism. Malformed stream chunks are skipped, not fatal ("best-effort
//! line recovery"); every skip is counted and visible via
//! [`OpenAiCompatibleRelay::skipped_chunks`].

pub mod openai;
pub mod sse;

pub use openai::OpenAiCompatibleRelay;
