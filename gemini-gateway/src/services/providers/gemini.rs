//! Gemini AI provider implementation.
//!
//! Implements text generation using Google's Gemini `generateContent` API.

use super::{ContentPart, ProviderError, TextProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// API base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub api_base: String,
    pub timeout: Duration,
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn base(&self) -> &str {
        self.config.api_base.trim_end_matches('/')
    }

    /// Build the API URL for the given model method.
    fn api_url(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base(), self.config.model, method)
    }

    fn build_request(parts: Vec<ContentPart>) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: parts.into_iter().map(Part::from).collect(),
            }],
        }
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, parts: Vec<ContentPart>) -> Result<String, ProviderError> {
        let part_count = parts.len();
        let media_types: Vec<&str> = parts.iter().filter_map(ContentPart::mime_type).collect();

        tracing::debug!(
            model = %self.config.model,
            part_count,
            media_types = ?media_types,
            "Sending request to Gemini API"
        );

        let request = Self::build_request(parts);

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        let usage = api_response.usage_metadata.as_ref();
        tracing::debug!(
            model = %self.config.model,
            input_tokens = usage.and_then(|u| u.prompt_token_count).unwrap_or(0),
            output_tokens = usage.and_then(|u| u.candidates_token_count).unwrap_or(0),
            "Gemini API responded"
        );

        api_response.into_text()
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        let url = format!("{}/models/{}", self.base(), self.config.model);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError(format!(
                "Health check failed: {}",
                response.status()
            )))
        }
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    /// Function calls, executable code and other parts we never send.
    Other(serde_json::Value),
}

impl From<ContentPart> for Part {
    fn from(part: ContentPart) -> Self {
        match part {
            ContentPart::Text(text) => Part::Text { text },
            ContentPart::InlineMedia { mime_type, data } => Part::InlineData {
                inline_data: InlineData { mime_type, data },
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> Result<String, ProviderError> {
        if self
            .prompt_feedback
            .as_ref()
            .is_some_and(|f| f.block_reason.is_some())
        {
            return Err(ProviderError::ContentFiltered);
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text),
                _ => None,
            })
            .collect();

        if !text.is_empty() {
            return Ok(text);
        }

        match candidate.finish_reason.as_deref() {
            Some("SAFETY") | Some("PROHIBITED_CONTENT") | Some("BLOCKLIST") => {
                Err(ProviderError::ContentFiltered)
            }
            _ => Err(ProviderError::EmptyResponse),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<i32>,
    candidates_token_count: Option<i32>,
}
