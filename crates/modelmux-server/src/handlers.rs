//! Endpoint handlers — thin adapters between HTTP and the dispatch client.
//!
//! Success is always 200 with the canonical result. Failure is flattened to a
//! fixed generic body: 400 for the one caller-fault case (no file uploaded),
//! 500 for everything else. Detail stays in the log (task kind + stage), never
//! in the response.
//!
//! Handlers hold no state of their own; a dropped connection drops the handler
//! future and aborts the in-flight provider call with it.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use modelmux_core::{
    CanonicalResult, ChatRequest, CompareRequest, EmbeddingsRequest, GatewayError, ImageRequest,
    SpeechRequest, TaskKind,
};
use modelmux_providers::ProviderClient;
use tracing::error;

/// Fixed body for server-fault failures.
const GENERIC_ERROR_BODY: &str = "Something went wrong";
/// Fixed body for the missing-upload caller fault.
const MISSING_FILE_BODY: &str = "No file uploaded";

// ─────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────

/// `POST /generate-chat` — canonical chat text, routed by model prefix.
pub async fn generate_chat(
    State(client): State<Arc<ProviderClient>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    respond(TaskKind::Chat, client.chat(&request).await)
}

/// `POST /transcribe-speech` — multipart upload in, transcript body out.
pub async fn transcribe_speech(
    State(client): State<Arc<ProviderClient>>,
    multipart: Multipart,
) -> Response {
    let result = match read_upload(multipart).await {
        Ok((file_name, bytes)) => client.transcribe(&file_name, bytes).await,
        Err(err) => Err(err),
    };
    respond(TaskKind::Transcribe, result)
}

/// `POST /generate-speech` — audio/mpeg bytes.
pub async fn generate_speech(
    State(client): State<Arc<ProviderClient>>,
    Json(request): Json<SpeechRequest>,
) -> Response {
    respond(TaskKind::Speak, client.speak(&request).await)
}

/// `POST /generate-image` — URL of the generated image.
pub async fn generate_image(
    State(client): State<Arc<ProviderClient>>,
    Json(request): Json<ImageRequest>,
) -> Response {
    respond(TaskKind::Image, client.image(&request).await)
}

/// `POST /get-embeddings` — provider embeddings JSON, passed through.
pub async fn get_embeddings(
    State(client): State<Arc<ProviderClient>>,
    Json(request): Json<EmbeddingsRequest>,
) -> Response {
    match client.embed_raw(&request).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(TaskKind::Embed, err),
    }
}

/// `POST /calculate-similarity` — integer score 0–100 as plain text.
pub async fn calculate_similarity(
    State(client): State<Arc<ProviderClient>>,
    Json(request): Json<CompareRequest>,
) -> Response {
    respond(TaskKind::Compare, client.compare(&request).await)
}

// ─────────────────────────────────────────────
// Upload extraction
// ─────────────────────────────────────────────

/// Pull the uploaded audio out of the multipart body.
///
/// Any absent or unreadable upload collapses to [`GatewayError::MissingFile`];
/// the caller sent us nothing we can forward.
async fn read_upload(mut multipart: Multipart) -> Result<(String, Vec<u8>), GatewayError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(GatewayError::MissingFile),
            Err(err) => {
                error!(error = %err, "failed to read multipart body");
                return Err(GatewayError::MissingFile);
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("audio").to_string();
        let bytes = field.bytes().await.map_err(|err| {
            error!(error = %err, "failed to read uploaded file");
            GatewayError::MissingFile
        })?;
        return Ok((file_name, bytes.to_vec()));
    }
}

// ─────────────────────────────────────────────
// Response mapping
// ─────────────────────────────────────────────

/// Render a canonical result, or flatten the error.
fn respond(task: TaskKind, result: Result<CanonicalResult, GatewayError>) -> Response {
    match result {
        Ok(CanonicalResult::Text(text)) => text.into_response(),
        Ok(CanonicalResult::ImageUrl(url)) => url.into_response(),
        Ok(CanonicalResult::Score(score)) => score.to_string().into_response(),
        Ok(CanonicalResult::Audio { bytes, mime_type }) => {
            ([(header::CONTENT_TYPE, mime_type)], bytes).into_response()
        }
        Ok(CanonicalResult::Embeddings(vectors)) => Json(vectors).into_response(),
        Err(err) => error_response(task, err),
    }
}

/// The uniform failure surface: log with context, answer without it.
fn error_response(task: TaskKind, err: GatewayError) -> Response {
    error!(task = %task, stage = err.stage(), error = %err, "request failed");
    if err.is_caller_error() {
        (StatusCode::BAD_REQUEST, MISSING_FILE_BODY).into_response()
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_BODY).into_response()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
