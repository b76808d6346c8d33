//! Gateway error taxonomy.
//!
//! A closed set: every failure the dispatch pipeline can produce maps to exactly
//! one variant, and the HTTP layer maps variants to status codes in one place.
//! Provider-side detail never reaches the caller — it is logged and flattened.

use thiserror::Error;

/// Every way a gateway request can fail.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Model name matches no routing rule.
    #[error("unsupported model: {0:?}")]
    UnsupportedModel(String),

    /// Transcription request carried no audio bytes.
    #[error("no audio file in request")]
    MissingFile,

    /// The provider answered 2xx but the expected field path was absent.
    #[error("malformed provider response: {0}")]
    MalformedProviderResponse(String),

    /// Embedding vectors of unequal (or zero) length cannot be compared.
    #[error("embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// A zero-norm vector has no direction, so cosine similarity is undefined.
    #[error("degenerate embedding vector (zero norm)")]
    DegenerateVector,

    /// Network failure or a non-2xx provider status.
    #[error("provider call failed: {0}")]
    ProviderCallFailed(String),
}

impl GatewayError {
    /// The pipeline stage this error belongs to, for log context.
    pub fn stage(&self) -> &'static str {
        match self {
            GatewayError::UnsupportedModel(_) => "resolve",
            GatewayError::MissingFile => "payload",
            GatewayError::ProviderCallFailed(_) => "provider_call",
            GatewayError::MalformedProviderResponse(_) => "normalize",
            GatewayError::DimensionMismatch { .. } | GatewayError::DegenerateVector => "score",
        }
    }

    /// Whether the failure is the caller's fault (maps to a 4xx).
    pub fn is_caller_error(&self) -> bool {
        matches!(self, GatewayError::MissingFile)
    }
}
