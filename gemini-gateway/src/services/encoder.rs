//! Turns staged uploads into inline media parts.

use crate::services::providers::ContentPart;
use crate::services::staging::StagedFile;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;

/// Used when a document or audio part declares no content type (RFC 7578 §4.4).
pub const FALLBACK_MIME_TYPE: &str = "text/plain";

/// Which upload pathway a file arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Document,
    Audio,
}

/// Image formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    /// Default for every extension other than `.png`, including none.
    Jpeg,
}

impl ImageFormat {
    pub fn from_file_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "png" => ImageFormat::Png,
            _ => ImageFormat::Jpeg,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// MIME type to send for an upload.
///
/// Images trust a declared `image/*` type and otherwise fall back to the file
/// extension. Documents and audio use the declared type as is, or
/// [`FALLBACK_MIME_TYPE`] when none was declared.
pub fn resolve_mime_type(kind: MediaKind, declared: Option<&str>, file_name: &str) -> String {
    let declared = declared.map(str::trim).filter(|d| !d.is_empty());

    match kind {
        MediaKind::Image => match declared {
            Some(mime) if is_specific_image_type(mime) => mime.to_string(),
            _ => ImageFormat::from_file_name(file_name).mime_type().to_string(),
        },
        MediaKind::Document | MediaKind::Audio => {
            declared.unwrap_or(FALLBACK_MIME_TYPE).to_string()
        }
    }
}

fn is_specific_image_type(mime: &str) -> bool {
    mime.strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty() && subtype != "*")
}

/// Read the staged file and wrap it as base64 inline media.
pub async fn encode(file: &StagedFile, kind: MediaKind) -> std::io::Result<ContentPart> {
    let bytes = file.read().await?;
    let mime_type = resolve_mime_type(kind, file.content_type(), file.original_name());

    tracing::debug!(
        kind = ?kind,
        mime_type = %mime_type,
        size = bytes.len(),
        "Encoded upload"
    );

    Ok(ContentPart::InlineMedia {
        mime_type,
        data: STANDARD.encode(bytes),
    })
}
