//! # Ansimbot Core
//!
//! Shared foundation for the Ansimbot workspace: configuration, the error
//! taxonomy, wire types, and the trait seams the engine is assembled from
//! (completion provider, unanswered-query sink, query-focus extraction).

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::AnsimConfig;
pub use error::{AnsimError, Result};
