//! Provider registry — maps a task kind + model name to one provider target.
//!
//! Routing is deliberately narrow: chat goes to Anthropic for `claude*` models and
//! to OpenAI for everything else; every other task kind is wired to OpenAI only.
//! The prefix check happens exactly once, here — downstream code branches on the
//! resolved [`Provider`] enum, never on the model string again.
//!
//! Beyond the prefix there is no model-name validation: unknown names are
//! forwarded and the provider's own 4xx is the rejection mechanism.

use modelmux_core::{GatewayConfig, GatewayError, TaskKind};

// ─────────────────────────────────────────────
// Provider enum + target
// ─────────────────────────────────────────────

/// The closed set of wired providers.
///
/// Adding a provider means adding a variant, which forces a routing rule here
/// and an extraction rule in `normalize` — the compiler keeps them in sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    /// Display name for logging.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
        }
    }
}

/// Where one request goes: endpoint URL plus the credential to present.
///
/// Resolved fresh per request and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderTarget {
    pub provider: Provider,
    pub endpoint_url: String,
    pub api_key: String,
}

// ─────────────────────────────────────────────
// Resolution
// ─────────────────────────────────────────────

/// Resolve a task kind and declared model name to a provider target.
///
/// Fails with [`GatewayError::UnsupportedModel`] only when a chat model name is
/// blank — the one string that matches no routing rule. Non-chat kinds route on
/// the task kind alone; their model field travels inside the payload.
pub fn resolve(
    kind: TaskKind,
    model: &str,
    config: &GatewayConfig,
) -> Result<ProviderTarget, GatewayError> {
    let openai = |path: &str| ProviderTarget {
        provider: Provider::OpenAi,
        endpoint_url: format!("{}{}", config.openai_api_base, path),
        api_key: config.openai_api_key.clone(),
    };

    match kind {
        TaskKind::Chat => {
            if model.trim().is_empty() {
                return Err(GatewayError::UnsupportedModel(model.to_string()));
            }
            if model.starts_with("claude") {
                Ok(ProviderTarget {
                    provider: Provider::Anthropic,
                    endpoint_url: format!("{}/complete", config.anthropic_api_base),
                    api_key: config.anthropic_api_key.clone(),
                })
            } else {
                Ok(openai("/chat/completions"))
            }
        }
        TaskKind::Transcribe => Ok(openai("/audio/transcriptions")),
        TaskKind::Speak => Ok(openai("/audio/speech")),
        TaskKind::Image => Ok(openai("/images/generations")),
        TaskKind::Embed | TaskKind::Compare => Ok(openai("/embeddings")),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
