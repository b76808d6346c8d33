//! Request and result types for the gateway.
//!
//! Every type here is created at the start of one HTTP request and dropped at its
//! end — there is no cross-request state. Request bodies deserialize straight from
//! the caller's JSON and are forwarded to the provider without reinterpretation,
//! so the fields mirror the provider wire format.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Task kinds
// ─────────────────────────────────────────────

/// The category of AI capability a request asks for.
///
/// One gateway endpoint per kind. `Compare` is the only composite: it runs an
/// internal `Embed` round-trip and scores the resulting vector pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    Chat,
    Transcribe,
    Speak,
    Image,
    Embed,
    Compare,
}

impl TaskKind {
    /// Stable lowercase name for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Chat => "chat",
            TaskKind::Transcribe => "transcribe",
            TaskKind::Speak => "speak",
            TaskKind::Image => "image",
            TaskKind::Embed => "embed",
            TaskKind::Compare => "compare",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────
// Inbound request bodies (provider wire format)
// ─────────────────────────────────────────────

/// A single chat message in the `{role, content}` wire format.
///
/// Kept as plain strings on purpose: the gateway forwards messages verbatim and
/// lets the selected provider interpret roles and content.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Shorthand for a `user` message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// Body of `POST /generate-chat`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Body of `POST /generate-speech`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub model: String,
    pub input: String,
    pub voice: String,
}

/// Body of `POST /generate-image`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub quality: String,
    pub n: u32,
}

/// Body of `POST /get-embeddings`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbeddingsRequest {
    pub model: String,
    pub input: Vec<String>,
}

/// Body of `POST /calculate-similarity` — two texts to embed and compare.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompareRequest {
    pub prompt: String,
    pub guess: String,
}

// ─────────────────────────────────────────────
// Canonical result
// ─────────────────────────────────────────────

/// The uniform result shape handlers consume, whatever the provider returned.
///
/// Provider response schemas differ per vendor and may change; this enum is the
/// stable contract between the dispatch layer and the HTTP surface.
#[derive(Clone, Debug, PartialEq)]
pub enum CanonicalResult {
    /// Plain text (chat completion, transcription passthrough).
    Text(String),
    /// Binary audio with its mime type (speech synthesis).
    Audio { bytes: Vec<u8>, mime_type: String },
    /// URL of the first generated image.
    ImageUrl(String),
    /// Embedding vectors in provider response order — order encodes the
    /// input-to-output correspondence.
    Embeddings(Vec<Vec<f64>>),
    /// Bounded similarity score in `[0, 100]`.
    Score(u8),
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
