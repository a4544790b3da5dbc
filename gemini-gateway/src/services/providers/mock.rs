//! Mock provider implementation for testing.

use super::{ContentPart, ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Mock text provider for testing.
///
/// Echoes the text parts back and records every request it receives.
pub struct MockTextProvider {
    enabled: bool,
    delay: Duration,
    requests: Mutex<Vec<Vec<ContentPart>>>,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Hold each `generate` call for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Snapshot of every request received so far, oldest first.
    pub fn requests(&self) -> Vec<Vec<ContentPart>> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn model(&self) -> &str {
        "mock"
    }

    async fn generate(&self, parts: Vec<ContentPart>) -> Result<String, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(parts.clone());
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        let prompt: Vec<&str> = parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text(text) => Some(text.as_str()),
                ContentPart::InlineMedia { .. } => None,
            })
            .collect();

        Ok(format!("Mock response for: {}", prompt.join(" ")))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ))
        }
    }
}
