//! # Ansimbot Gateway
//!
//! Thin HTTP surface over the engine: one streaming chat endpoint, a
//! health check, and a built-in test page. CORS is allow-listed per
//! configured origin.

pub mod page;
pub mod routes;
pub mod server;

pub use server::{build_router, start, AppState};
