//! Core types for Modelmux — the shared vocabulary of the gateway.
//!
//! # Architecture
//!
//! - [`types`] — task kinds, per-endpoint request types, and the canonical result
//! - [`error`] — the closed gateway error taxonomy
//! - [`config`] — immutable process configuration, read once at startup

pub mod config;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use types::{
    CanonicalResult, ChatMessage, ChatRequest, CompareRequest, EmbeddingsRequest, ImageRequest,
    SpeechRequest, TaskKind,
};
