//! Response normalizers — extract the canonical result from provider JSON.
//!
//! One extraction rule per task kind, keyed by the [`Provider`] enum where
//! providers disagree on shape. A `match` on the enum means a newly wired
//! provider cannot ship without an extraction rule.
//!
//! Kinds with no function here are passthrough by design: transcription returns
//! the provider body unmodified, speech synthesis returns the raw bytes.

use modelmux_core::GatewayError;
use serde_json::Value;

use crate::registry::Provider;

/// Mime type stamped on every speech-synthesis result, whatever the provider
/// declared.
pub const SPEECH_MIME_TYPE: &str = "audio/mpeg";

// ─────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────

/// Extract the canonical chat text.
///
/// Anthropic's completion schema puts it in `completion`; the OpenAI chat schema
/// in `choices[0].message.content`.
pub fn chat_text(provider: Provider, body: &Value) -> Result<String, GatewayError> {
    let (path, text) = match provider {
        Provider::Anthropic => ("completion", body.get("completion")),
        Provider::OpenAi => (
            "choices[0].message.content",
            body.pointer("/choices/0/message/content"),
        ),
    };
    text.and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| GatewayError::MalformedProviderResponse(format!("missing {path}")))
}

// ─────────────────────────────────────────────
// Image
// ─────────────────────────────────────────────

/// Extract the first generated image URL from `data[0].url`.
pub fn image_url(body: &Value) -> Result<String, GatewayError> {
    body.pointer("/data/0/url")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| GatewayError::MalformedProviderResponse("missing data[0].url".into()))
}

// ─────────────────────────────────────────────
// Embeddings
// ─────────────────────────────────────────────

/// Extract all embedding vectors in provider response order.
///
/// Order is load-bearing: entry *i* is the embedding of input *i*.
pub fn embedding_vectors(body: &Value) -> Result<Vec<Vec<f64>>, GatewayError> {
    let data = body
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| GatewayError::MalformedProviderResponse("missing data array".into()))?;

    data.iter()
        .enumerate()
        .map(|(i, entry)| {
            entry
                .get("embedding")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    GatewayError::MalformedProviderResponse(format!(
                        "missing data[{i}].embedding"
                    ))
                })?
                .iter()
                .map(|n| {
                    n.as_f64().ok_or_else(|| {
                        GatewayError::MalformedProviderResponse(format!(
                            "non-numeric value in data[{i}].embedding"
                        ))
                    })
                })
                .collect()
        })
        .collect()
}

/// Compare helper: exactly two vectors, `(prompt, guess)` in input order.
pub fn embedding_pair(body: &Value) -> Result<(Vec<f64>, Vec<f64>), GatewayError> {
    let mut vectors = embedding_vectors(body)?;
    if vectors.len() != 2 {
        return Err(GatewayError::MalformedProviderResponse(format!(
            "expected 2 embeddings, got {}",
            vectors.len()
        )));
    }
    let guess = vectors.pop().expect("len checked");
    let prompt = vectors.pop().expect("len checked");
    Ok((prompt, guess))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
