//! Generation endpoints.
//!
//! Each handler is a straight pipeline: read input, build content parts, call
//! the model, answer `{text}` or a fixed `{error}` with status 500. Staged
//! uploads are deleted before the handler returns.

use super::upload::UploadForm;
use crate::services::providers::{ContentPart, ProviderError};
use crate::services::{encode, MediaKind, StagedFile};
use crate::startup::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use thiserror::Error;
use validator::Validate;

pub const DEFAULT_IMAGE_PROMPT: &str = "Describe the image";
pub const DOCUMENT_PROMPT: &str = "Analyze this document:";
pub const AUDIO_PROMPT: &str = "Transcribe or analyze the following audio:";

const TEXT_FAILURE: &str = "Failed to generate text";
const IMAGE_FAILURE: &str = "Failed to generate text from image";
const DOCUMENT_FAILURE: &str = "Failed to generate document";
const AUDIO_FAILURE: &str = "Failed to generate audio content";

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateTextRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "prompt is required"))]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub text: String,
}

#[derive(Debug, Error)]
enum PipelineError {
    #[error("Failed to read staged upload: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub async fn generate_text(
    State(state): State<AppState>,
    payload: Result<Json<GenerateTextRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(req) = payload.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Invalid JSON body: {}", e.body_text()))
    })?;
    req.validate()?;

    match state
        .text_provider
        .generate(vec![ContentPart::Text(req.prompt)])
        .await
    {
        Ok(text) => Ok(Json(GenerateResponse { text })),
        Err(e) => {
            tracing::error!(endpoint = "generate-text", error = %e, "Generation failed");
            Err(AppError::GenerationFailed(TEXT_FAILURE))
        }
    }
}

pub async fn generate_from_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, AppError> {
    let form = UploadForm::read(multipart, "image", &state.uploads).await?;
    let file = required(form.file, "image")?;
    let prompt = form
        .prompt
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_IMAGE_PROMPT.to_string());

    generate_from_upload(&state, file, MediaKind::Image, prompt, IMAGE_FAILURE).await
}

pub async fn generate_from_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, AppError> {
    let form = UploadForm::read(multipart, "document", &state.uploads).await?;
    let file = required(form.file, "document")?;

    generate_from_upload(
        &state,
        file,
        MediaKind::Document,
        DOCUMENT_PROMPT.to_string(),
        DOCUMENT_FAILURE,
    )
    .await
}

pub async fn generate_from_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, AppError> {
    let form = UploadForm::read(multipart, "audio", &state.uploads).await?;
    let file = required(form.file, "audio")?;

    generate_from_upload(
        &state,
        file,
        MediaKind::Audio,
        AUDIO_PROMPT.to_string(),
        AUDIO_FAILURE,
    )
    .await
}

fn required(file: Option<StagedFile>, field: &str) -> Result<StagedFile, AppError> {
    file.ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No {} uploaded", field)))
}

/// Send `[Text(lead), InlineMedia(file)]` to the model, then delete `file`.
async fn generate_from_upload(
    state: &AppState,
    file: StagedFile,
    kind: MediaKind,
    lead: String,
    failure: &'static str,
) -> Result<Json<GenerateResponse>, AppError> {
    let outcome = run_pipeline(state, &file, kind, lead).await;
    file.delete().await;

    match outcome {
        Ok(text) => Ok(Json(GenerateResponse { text })),
        Err(e) => {
            tracing::error!(kind = ?kind, error = %e, "Generation failed");
            Err(AppError::GenerationFailed(failure))
        }
    }
}

async fn run_pipeline(
    state: &AppState,
    file: &StagedFile,
    kind: MediaKind,
    lead: String,
) -> Result<String, PipelineError> {
    let media = encode(file, kind).await?;
    let text = state
        .text_provider
        .generate(vec![ContentPart::Text(lead), media])
        .await?;
    Ok(text)
}
