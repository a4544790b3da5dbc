use crate::services::{StagedFile, UploadStore};
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use service_core::error::AppError;

/// Text field accepted alongside the file on upload endpoints.
const PROMPT_FIELD: &str = "prompt";

/// A multipart form with at most one staged file.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub prompt: Option<String>,
    pub file: Option<StagedFile>,
}

impl UploadForm {
    /// Read the whole form, staging the first field named `file_field`.
    ///
    /// Other fields are skipped. If reading fails after the file was staged,
    /// dropping the partial form removes it.
    pub async fn read(
        mut multipart: Multipart,
        file_field: &str,
        store: &UploadStore,
    ) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == PROMPT_FIELD {
                form.prompt = Some(field.text().await.map_err(multipart_error)?);
            } else if name == file_field && form.file.is_none() {
                let original_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;

                let staged = store
                    .stage(original_name.as_deref(), content_type.as_deref(), &data)
                    .await?;
                form.file = Some(staged);
            } else {
                tracing::debug!(field = %name, "Ignoring multipart field");
            }
        }

        Ok(form)
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(anyhow::anyhow!("Upload exceeds the size limit"))
    } else {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    }
}
