//! Gateway configuration — read from the environment once at startup.
//!
//! The resulting [`GatewayConfig`] is immutable and shared by reference for the
//! lifetime of the process; no call site reads the environment after startup.
//!
//! # Variables
//!
//! | Variable | Default |
//! |---|---|
//! | `OPENAI_API_KEY` | empty (provider rejects calls) |
//! | `ANTHROPIC_API_KEY` | empty |
//! | `PORT` | `3000` |
//! | `MODELMUX_TIMEOUT_SECS` | `60` |
//! | `MODELMUX_OPENAI_BASE` | `https://api.openai.com/v1` |
//! | `MODELMUX_ANTHROPIC_BASE` | `https://api.anthropic.com/v1` |

use tracing::warn;

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";
/// Default Anthropic API base URL.
pub const DEFAULT_ANTHROPIC_BASE: &str = "https://api.anthropic.com/v1";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Immutable process configuration.
///
/// Empty API keys are kept and forwarded as-is — the provider's 401 is the
/// signal, matching the gateway's "provider validates" policy.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub openai_api_key: String,
    pub anthropic_api_key: String,
    /// Base URL for all OpenAI endpoints, no trailing slash.
    pub openai_api_base: String,
    /// Base URL for the Anthropic completion endpoint, no trailing slash.
    pub anthropic_api_base: String,
    pub port: u16,
    /// Deadline for one outbound provider call. Single attempt, no retry.
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            anthropic_api_key: String::new(),
            openai_api_base: DEFAULT_OPENAI_BASE.to_string(),
            anthropic_api_base: DEFAULT_ANTHROPIC_BASE.to_string(),
            port: DEFAULT_PORT,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through a lookup function.
    ///
    /// The seam tests use instead of mutating process-global env vars.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "invalid PORT, using default");
                defaults.port
            }),
            None => defaults.port,
        };

        let request_timeout_secs = match lookup("MODELMUX_TIMEOUT_SECS") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "invalid MODELMUX_TIMEOUT_SECS, using default");
                defaults.request_timeout_secs
            }),
            None => defaults.request_timeout_secs,
        };

        Self {
            openai_api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
            anthropic_api_key: lookup("ANTHROPIC_API_KEY").unwrap_or_default(),
            openai_api_base: lookup("MODELMUX_OPENAI_BASE")
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or(defaults.openai_api_base),
            anthropic_api_base: lookup("MODELMUX_ANTHROPIC_BASE")
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or(defaults.anthropic_api_base),
            port,
            request_timeout_secs,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
