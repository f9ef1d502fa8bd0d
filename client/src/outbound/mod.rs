//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed API client and token refresher
//! - **tokens**: directory-backed token persistence
//! - **notify**: tracing and in-memory notification sinks
//!
//! Adapters translate between domain types and transport representations.
//! They contain no session logic.

pub mod http;
pub mod notify;
pub mod tokens;
