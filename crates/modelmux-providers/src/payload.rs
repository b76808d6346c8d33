//! Payload adapters — build the provider-specific outbound body per task kind.
//!
//! Every adapter is pure: no I/O, fresh output per call, total over its input
//! type. JSON kinds produce a `serde_json::Value`; transcription produces a
//! [`TranscribeForm`] the dispatch client turns into a multipart form at send
//! time, keeping the adapter itself testable without an HTTP client.

use modelmux_core::{
    ChatRequest, CompareRequest, EmbeddingsRequest, GatewayError, ImageRequest, SpeechRequest,
};
use serde_json::{json, Value};

/// Fixed transcription model — the one Whisper model the gateway is wired for.
pub const TRANSCRIBE_MODEL: &str = "whisper-1";

/// Fixed embedding model used by the Compare flow.
pub const COMPARE_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

// ─────────────────────────────────────────────
// JSON payloads (pass-through kinds)
// ─────────────────────────────────────────────

/// `{model, messages}` — forwarded unchanged; the resolved provider interprets it.
pub fn chat_payload(request: &ChatRequest) -> Value {
    json!({
        "model": request.model,
        "messages": request.messages,
    })
}

/// `{model, input, voice}` — forwarded unchanged; response is expected binary.
pub fn speech_payload(request: &SpeechRequest) -> Value {
    json!({
        "model": request.model,
        "input": request.input,
        "voice": request.voice,
    })
}

/// `{model, prompt, size, quality, n}` — forwarded unchanged.
pub fn image_payload(request: &ImageRequest) -> Value {
    json!({
        "model": request.model,
        "prompt": request.prompt,
        "size": request.size,
        "quality": request.quality,
        "n": request.n,
    })
}

/// `{model, input}` — forwarded unchanged.
pub fn embeddings_payload(request: &EmbeddingsRequest) -> Value {
    json!({
        "model": request.model,
        "input": request.input,
    })
}

/// Synthesize the embeddings body for a Compare request.
///
/// Exactly two inputs, order-significant: index 0 = prompt, index 1 = guess.
/// The model is pinned so both texts are embedded in the same space.
pub fn compare_payload(request: &CompareRequest) -> Value {
    json!({
        "model": COMPARE_EMBEDDING_MODEL,
        "input": [request.prompt, request.guess],
    })
}

// ─────────────────────────────────────────────
// Multipart payload (transcription)
// ─────────────────────────────────────────────

/// The multipart form a transcription request sends: fixed model field plus the
/// uploaded audio under a `file` part.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscribeForm {
    pub model: &'static str,
    pub file_name: String,
    pub file_bytes: Vec<u8>,
}

/// Build the transcription form. Fails with [`GatewayError::MissingFile`] when
/// the upload is empty — the one caller-fault error in the taxonomy.
pub fn transcribe_payload(
    file_name: impl Into<String>,
    file_bytes: Vec<u8>,
) -> Result<TranscribeForm, GatewayError> {
    if file_bytes.is_empty() {
        return Err(GatewayError::MissingFile);
    }
    Ok(TranscribeForm {
        model: TRANSCRIBE_MODEL,
        file_name: file_name.into(),
        file_bytes,
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
