//! # Ansimbot Retrieval
//!
//! Lexical retrieval over a small closed FAQ corpus. No vector DB, no
//! embeddings — a character n-gram TF-IDF index with cosine ranking, which
//! is robust for Korean text where word boundaries are unreliable.
//!
//! ## How it works
//! ```text
//! "이상거래 신고는 어떻게 하나요?"
//!   ↓ keyword gate (postposition cut + corpus coverage check)
//! "이상거래신고"  — found in at least one document → proceed
//!   ↓ char 2..4-gram TF-IDF, cosine vs every document vector
//! Top-5 RankedHit, descending score, stable tie order
//! ```
//!
//! The gate is a cheap pre-filter: queries with no lexical relationship to
//! the corpus short-circuit to an empty result instead of producing a
//! spurious similarity score.

pub mod corpus;
pub mod index;
pub mod keyword;
pub mod normalize;
pub mod ranker;

pub use index::LexicalIndex;
pub use keyword::{has_keyword_coverage, KoreanParticleFocus};
pub use normalize::normalize;
pub use ranker::{rank, retrieve_top_k, RankedHit};
