#![allow(dead_code)]

use gemini_gateway::config::{GatewayConfig, GeminiSettings, ObservabilityConfig, UploadConfig};
use gemini_gateway::services::providers::mock::MockTextProvider;
use gemini_gateway::services::providers::{ContentPart, TextProvider};
use gemini_gateway::startup::Application;
use reqwest::multipart;
use service_core::config::Config as CoreConfig;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub upload_dir: TempDir,
    pub provider: Arc<MockTextProvider>,
    pub client: reqwest::Client,
}

pub fn test_config(upload_dir: &Path) -> GatewayConfig {
    GatewayConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        gemini: GeminiSettings {
            api_key: "test-api-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            timeout_secs: 5,
        },
        uploads: UploadConfig {
            dir: upload_dir.to_path_buf(),
            max_bytes: 1024 * 1024,
        },
        observability: ObservabilityConfig {
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
    }
}

impl TestApp {
    /// Spawn with a mock provider that answers every request.
    pub async fn spawn() -> Self {
        Self::spawn_with(MockTextProvider::new(true)).await
    }

    /// Spawn with a mock provider that fails every request.
    pub async fn spawn_failing() -> Self {
        Self::spawn_with(MockTextProvider::new(false)).await
    }

    pub async fn spawn_with(provider: MockTextProvider) -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
        let provider = Arc::new(provider);
        let text_provider: Arc<dyn TextProvider> = provider.clone();

        let app = Application::build_with_provider(test_config(upload_dir.path()), text_provider)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let address = format!("http://127.0.0.1:{}", port);
        let client = reqwest::Client::new();

        // Wait for HTTP server to be ready by polling health endpoint
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            upload_dir,
            provider,
            client,
        }
    }

    pub async fn post_form(&self, path: &str, form: multipart::Form) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Files currently left in the staging directory.
    pub fn staged_files(&self) -> Vec<std::path::PathBuf> {
        std::fs::read_dir(self.upload_dir.path())
            .expect("Failed to read upload dir")
            .map(|entry| entry.expect("Failed to read dir entry").path())
            .collect()
    }

    /// The single request the provider received.
    pub fn only_request(&self) -> Vec<ContentPart> {
        let mut requests = self.provider.requests();
        assert_eq!(requests.len(), 1, "expected exactly one provider call");
        requests.remove(0)
    }
}

/// A file part with an explicit content type.
pub fn file_part(bytes: &[u8], file_name: &str, mime: &str) -> multipart::Part {
    multipart::Part::bytes(bytes.to_vec())
        .file_name(file_name.to_string())
        .mime_str(mime)
        .unwrap()
}

/// A file part with no declared content type.
pub fn untyped_file_part(bytes: &[u8], file_name: &str) -> multipart::Part {
    multipart::Part::bytes(bytes.to_vec()).file_name(file_name.to_string())
}
