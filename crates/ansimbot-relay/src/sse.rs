//! Line parser for the OpenAI-compatible event stream.
//!
//! Each non-empty line is either `data: {json}` or a bare `{json}` payload.
//! The literal `[DONE]` payload ends the stream. Garbled or partial lines
//! are recoverable — the caller counts them and moves on.

use serde_json::Value;

/// Outcome of parsing one stream line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamLine {
    /// One incremental token from the first choice's delta.
    Token(String),
    /// A full-content payload (non-streaming reply shape); emit once and
    /// end the stream.
    Final(String),
    /// The `[DONE]` sentinel.
    Done,
    /// Nothing to emit (blank line, empty choices, empty token).
    Empty,
    /// Unparseable JSON payload — skip, but count it.
    Malformed,
}

/// Parse one line of the event stream.
pub fn parse_stream_line(line: &str) -> StreamLine {
    let line = line.trim();
    if line.is_empty() {
        return StreamLine::Empty;
    }

    let payload = match line.strip_prefix("data:") {
        Some(rest) => rest.trim(),
        None => line,
    };

    if payload == "[DONE]" {
        return StreamLine::Done;
    }

    let value: Value = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(_) => return StreamLine::Malformed,
    };

    let Some(choice) = value["choices"].get(0) else {
        return StreamLine::Empty;
    };

    if let Some(token) = choice["delta"]["content"].as_str() {
        if !token.is_empty() {
            return StreamLine::Token(token.to_string());
        }
    }

    if let Some(full) = choice["message"]["content"].as_str() {
        if !full.is_empty() {
            return StreamLine::Final(full.to_string());
        }
    }

    StreamLine::Empty
}
