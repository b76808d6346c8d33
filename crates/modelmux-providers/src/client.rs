//! Dispatch client — one provider round-trip per gateway request.
//!
//! Every method walks the same pipeline: resolve the provider target, build the
//! outbound payload, make the HTTP call, normalize the response. A failure at
//! any stage terminates the request; nothing is retried. The single `reqwest`
//! client is connection-pooled and carries the configured deadline, so a hung
//! provider cannot hold a request past the timeout.

use modelmux_core::{
    CanonicalResult, ChatRequest, CompareRequest, EmbeddingsRequest, GatewayConfig, GatewayError,
    ImageRequest, SpeechRequest, TaskKind,
};
use serde_json::Value;
use tracing::{debug, error};

use crate::normalize;
use crate::payload;
use crate::registry::{resolve, Provider, ProviderTarget};

// ─────────────────────────────────────────────
// ProviderClient
// ─────────────────────────────────────────────

/// HTTP dispatch to the external AI providers.
///
/// Holds the immutable gateway config and a pooled client; safe to share behind
/// an `Arc` across concurrent requests — nothing here is mutated after startup.
pub struct ProviderClient {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("openai_api_base", &self.config.openai_api_base)
            .field("anthropic_api_base", &self.config.anthropic_api_base)
            .field("timeout_secs", &self.config.request_timeout_secs)
            .finish()
    }
}

impl ProviderClient {
    /// Build a client from the gateway config.
    ///
    /// The request timeout covers the whole provider round-trip; single
    /// attempt, no retry.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GatewayError::ProviderCallFailed(e.to_string()))?;
        Ok(Self { client, config })
    }

    // ── task-kind flows ──

    /// Chat completion. Routes on the model-name prefix; canonical text comes
    /// from the provider-specific field path.
    pub async fn chat(&self, request: &ChatRequest) -> Result<CanonicalResult, GatewayError> {
        let target = resolve(TaskKind::Chat, &request.model, &self.config)?;
        let body = self
            .post_json(TaskKind::Chat, &target, &payload::chat_payload(request))
            .await?;
        let text = normalize::chat_text(target.provider, &body)?;
        Ok(CanonicalResult::Text(text))
    }

    /// Speech-to-text. The provider's transcript body passes through unmodified.
    pub async fn transcribe(
        &self,
        file_name: &str,
        file_bytes: Vec<u8>,
    ) -> Result<CanonicalResult, GatewayError> {
        let target = resolve(TaskKind::Transcribe, "", &self.config)?;
        let form_spec = payload::transcribe_payload(file_name, file_bytes)?;

        debug!(
            task = %TaskKind::Transcribe,
            provider = target.provider.display_name(),
            file = %form_spec.file_name,
            bytes = form_spec.file_bytes.len(),
            "calling provider"
        );

        let file_part = reqwest::multipart::Part::bytes(form_spec.file_bytes)
            .file_name(form_spec.file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| GatewayError::ProviderCallFailed(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("model", form_spec.model)
            .part("file", file_part);

        let response = self
            .client
            .post(&target.endpoint_url)
            .bearer_auth(&target.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| call_failed(TaskKind::Transcribe, e))?;
        let response = check_status(TaskKind::Transcribe, response).await?;

        let transcript = response
            .text()
            .await
            .map_err(|e| call_failed(TaskKind::Transcribe, e))?;
        Ok(CanonicalResult::Text(transcript))
    }

    /// Text-to-speech. Raw binary out, mime pinned to `audio/mpeg`.
    pub async fn speak(&self, request: &SpeechRequest) -> Result<CanonicalResult, GatewayError> {
        let target = resolve(TaskKind::Speak, &request.model, &self.config)?;

        debug!(
            task = %TaskKind::Speak,
            provider = target.provider.display_name(),
            model = %request.model,
            "calling provider"
        );

        let response = self
            .request(&target)
            .json(&payload::speech_payload(request))
            .send()
            .await
            .map_err(|e| call_failed(TaskKind::Speak, e))?;
        let response = check_status(TaskKind::Speak, response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| call_failed(TaskKind::Speak, e))?;
        Ok(CanonicalResult::Audio {
            bytes: bytes.to_vec(),
            mime_type: normalize::SPEECH_MIME_TYPE.to_string(),
        })
    }

    /// Image generation. Canonical result is the first image's URL.
    pub async fn image(&self, request: &ImageRequest) -> Result<CanonicalResult, GatewayError> {
        let target = resolve(TaskKind::Image, &request.model, &self.config)?;
        let body = self
            .post_json(TaskKind::Image, &target, &payload::image_payload(request))
            .await?;
        Ok(CanonicalResult::ImageUrl(normalize::image_url(&body)?))
    }

    /// Embeddings, normalized to vectors in provider response order.
    pub async fn embed(
        &self,
        request: &EmbeddingsRequest,
    ) -> Result<CanonicalResult, GatewayError> {
        let body = self.embed_raw(request).await?;
        Ok(CanonicalResult::Embeddings(normalize::embedding_vectors(
            &body,
        )?))
    }

    /// Embeddings, raw provider body — the `/get-embeddings` passthrough.
    pub async fn embed_raw(&self, request: &EmbeddingsRequest) -> Result<Value, GatewayError> {
        let target = resolve(TaskKind::Embed, &request.model, &self.config)?;
        self.post_json(
            TaskKind::Embed,
            &target,
            &payload::embeddings_payload(request),
        )
        .await
    }

    /// Similarity comparison — embeds `[prompt, guess]` in one call, then
    /// scores the pair.
    pub async fn compare(&self, request: &CompareRequest) -> Result<CanonicalResult, GatewayError> {
        let target = resolve(TaskKind::Compare, "", &self.config)?;
        let body = self
            .post_json(
                TaskKind::Compare,
                &target,
                &payload::compare_payload(request),
            )
            .await?;
        let (prompt_vec, guess_vec) = normalize::embedding_pair(&body)?;
        let score = crate::similarity::score(&prompt_vec, &guess_vec)?;
        Ok(CanonicalResult::Score(score))
    }

    // ── plumbing ──

    /// Start a POST with the target's auth scheme applied.
    fn request(&self, target: &ProviderTarget) -> reqwest::RequestBuilder {
        let builder = self.client.post(&target.endpoint_url);
        match target.provider {
            Provider::OpenAi => builder.bearer_auth(&target.api_key),
            Provider::Anthropic => builder
                .header("x-api-key", &target.api_key)
                .header("anthropic-version", "2023-06-01"),
        }
    }

    /// POST a JSON payload and parse the JSON response body.
    async fn post_json(
        &self,
        task: TaskKind,
        target: &ProviderTarget,
        body: &Value,
    ) -> Result<Value, GatewayError> {
        debug!(
            task = %task,
            provider = target.provider.display_name(),
            url = %target.endpoint_url,
            "calling provider"
        );

        let response = self
            .request(target)
            .json(body)
            .send()
            .await
            .map_err(|e| call_failed(task, e))?;
        let response = check_status(task, response).await?;

        response.json().await.map_err(|e| {
            error!(task = %task, error = %e, "provider returned non-JSON body");
            GatewayError::MalformedProviderResponse(e.to_string())
        })
    }
}

/// Log and wrap a transport-level failure.
fn call_failed(task: TaskKind, e: reqwest::Error) -> GatewayError {
    error!(task = %task, error = %e, "provider request failed");
    GatewayError::ProviderCallFailed(e.to_string())
}

/// Turn a non-2xx provider status into `ProviderCallFailed`, keeping the error
/// body for the log only.
async fn check_status(
    task: TaskKind,
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "failed to read error body".to_string());
    error!(task = %task, status = %status, body = %body, "provider API error");
    Err(GatewayError::ProviderCallFailed(format!(
        "{status}: {body}"
    )))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use modelmux_core::ChatMessage;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ProviderClient {
        let config = GatewayConfig {
            openai_api_key: "sk-openai-test".into(),
            anthropic_api_key: "sk-ant-test".into(),
            openai_api_base: server.uri(),
            anthropic_api_base: server.uri(),
            request_timeout_secs: 5,
            ..GatewayConfig::default()
        };
        ProviderClient::new(config).unwrap()
    }

    fn chat_request(model: &str) -> ChatRequest {
        ChatRequest {
            model: model.into(),
            messages: vec![ChatMessage::user("hi")],
        }
    }

    // ── chat ──

    #[tokio::test]
    async fn test_chat_openai_extracts_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-openai-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "hello"}}]
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).chat(&chat_request("gpt-4")).await.unwrap();
        assert_eq!(result, CanonicalResult::Text("hello".into()));
    }

    #[tokio::test]
    async fn test_chat_claude_uses_anthropic_endpoint_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/complete"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "completion": " Hi, I am Claude."
            })))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .chat(&chat_request("claude-2"))
            .await
            .unwrap();
        assert_eq!(result, CanonicalResult::Text(" Hi, I am Claude.".into()));
    }

    #[tokio::test]
    async fn test_chat_forwards_model_and_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": "gpt-4",
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .mount(&server)
            .await;

        // If the body matcher fails, wiremock answers 404 and the call errors.
        let result = client_for(&server).chat(&chat_request("gpt-4")).await.unwrap();
        assert_eq!(result, CanonicalResult::Text("ok".into()));
    }

    #[tokio::test]
    async fn test_chat_provider_4xx_is_call_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"message": "model not found"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat(&chat_request("gpt-nonexistent"))
            .await
            .unwrap_err();
        match err {
            GatewayError::ProviderCallFailed(msg) => assert!(msg.contains("404")),
            other => panic!("expected ProviderCallFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_network_error() {
        let config = GatewayConfig {
            openai_api_base: "http://127.0.0.1:1".into(),
            request_timeout_secs: 2,
            ..GatewayConfig::default()
        };
        let client = ProviderClient::new(config).unwrap();
        let err = client.chat(&chat_request("gpt-4")).await.unwrap_err();
        assert!(matches!(err, GatewayError::ProviderCallFailed(_)));
    }

    #[tokio::test]
    async fn test_chat_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).chat(&chat_request("gpt-4")).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedProviderResponse(_)));
    }

    // ── transcribe ──

    #[tokio::test]
    async fn test_transcribe_passes_body_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"text": "hello world"})),
            )
            .mount(&server)
            .await;

        let result = client_for(&server)
            .transcribe("voice.ogg", b"fake-audio".to_vec())
            .await
            .unwrap();
        // Passthrough: the provider JSON comes back verbatim, not re-shaped.
        assert_eq!(
            result,
            CanonicalResult::Text("{\"text\":\"hello world\"}".into())
        );
    }

    #[tokio::test]
    async fn test_transcribe_empty_upload_fails_before_any_call() {
        let server = MockServer::start().await;
        // No mock mounted: a request would 404 into ProviderCallFailed instead.
        let err = client_for(&server)
            .transcribe("voice.ogg", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::MissingFile));
    }

    // ── speak ──

    #[tokio::test]
    async fn test_speak_returns_audio_bytes() {
        let server = MockServer::start().await;
        let mp3 = vec![0xFF, 0xFB, 0x90, 0x00];
        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(mp3.clone(), "application/octet-stream"),
            )
            .mount(&server)
            .await;

        let request = SpeechRequest {
            model: "tts-1".into(),
            input: "read me".into(),
            voice: "alloy".into(),
        };
        let result = client_for(&server).speak(&request).await.unwrap();
        // Mime is pinned regardless of the provider's declared content type.
        assert_eq!(
            result,
            CanonicalResult::Audio {
                bytes: mp3,
                mime_type: "audio/mpeg".into()
            }
        );
    }

    // ── image ──

    #[tokio::test]
    async fn test_image_returns_first_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"url": "https://img.example/1.png"}]
            })))
            .mount(&server)
            .await;

        let request = ImageRequest {
            model: "dall-e-3".into(),
            prompt: "a crab".into(),
            size: "1024x1024".into(),
            quality: "standard".into(),
            n: 1,
        };
        let result = client_for(&server).image(&request).await.unwrap();
        assert_eq!(
            result,
            CanonicalResult::ImageUrl("https://img.example/1.png".into())
        );
    }

    // ── embed ──

    #[tokio::test]
    async fn test_embed_normalizes_vectors_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"embedding": [1.0, 0.0]},
                    {"embedding": [0.0, 1.0]},
                ]
            })))
            .mount(&server)
            .await;

        let request = EmbeddingsRequest {
            model: "text-embedding-ada-002".into(),
            input: vec!["a".into(), "b".into()],
        };
        let result = client_for(&server).embed(&request).await.unwrap();
        assert_eq!(
            result,
            CanonicalResult::Embeddings(vec![vec![1.0, 0.0], vec![0.0, 1.0]])
        );
    }

    // ── compare ──

    #[tokio::test]
    async fn test_compare_identical_vectors_score_100() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(body_partial_json(json!({
                "model": "text-embedding-ada-002",
                "input": ["cat", "cat"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"embedding": [0.1, 0.2, 0.3]},
                    {"embedding": [0.1, 0.2, 0.3]},
                ]
            })))
            .mount(&server)
            .await;

        let request = CompareRequest {
            prompt: "cat".into(),
            guess: "cat".into(),
        };
        let result = client_for(&server).compare(&request).await.unwrap();
        assert_eq!(result, CanonicalResult::Score(100));
    }

    #[tokio::test]
    async fn test_compare_sends_prompt_then_guess() {
        let server = MockServer::start().await;
        // Exact-order matcher: ["", "dog"] — empty prompt still occupies slot 0.
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(body_partial_json(json!({"input": ["", "dog"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"embedding": [1.0, 0.0]},
                    {"embedding": [0.0, 1.0]},
                ]
            })))
            .mount(&server)
            .await;

        let request = CompareRequest {
            prompt: "".into(),
            guess: "dog".into(),
        };
        let result = client_for(&server).compare(&request).await.unwrap();
        assert_eq!(result, CanonicalResult::Score(50));
    }

    #[tokio::test]
    async fn test_compare_single_vector_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"embedding": [1.0, 0.0]}]
            })))
            .mount(&server)
            .await;

        let request = CompareRequest {
            prompt: "cat".into(),
            guess: "dog".into(),
        };
        let err = client_for(&server).compare(&request).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedProviderResponse(_)));
    }

    #[tokio::test]
    async fn test_compare_mismatched_dimensions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"embedding": [1.0, 0.0, 0.0]},
                    {"embedding": [0.0, 1.0]},
                ]
            })))
            .mount(&server)
            .await;

        let request = CompareRequest {
            prompt: "cat".into(),
            guess: "dog".into(),
        };
        let err = client_for(&server).compare(&request).await.unwrap_err();
        assert!(matches!(err, GatewayError::DimensionMismatch { .. }));
    }
}
