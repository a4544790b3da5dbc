//! Application startup and lifecycle management.

use crate::config::GatewayConfig;
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::TextProvider;
use crate::services::UploadStore;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use service_core::error::AppError;
use service_core::middleware::{http_trace_layer, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub uploads: UploadStore,
    pub text_provider: Arc<dyn TextProvider>,
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.uploads.max_bytes;

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/generate-text", post(handlers::generate_text))
        .route("/generate-from-image", post(handlers::generate_from_image))
        .route("/generate-from-document", post(handlers::generate_from_document))
        .route("/generate-from-audio", post(handlers::generate_from_audio))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(http_trace_layer())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the Gemini provider described by `config`.
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        let gemini_config = GeminiConfig {
            api_key: config.gemini.api_key.clone(),
            model: config.gemini.model.clone(),
            api_base: config.gemini.api_base.clone(),
            timeout: config.gemini.timeout(),
        };
        let text_provider = GeminiTextProvider::new(gemini_config)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

        tracing::info!(
            model = %config.gemini.model,
            timeout_secs = config.gemini.timeout_secs,
            "Initialized Gemini text provider"
        );

        Self::build_with_provider(config, Arc::new(text_provider)).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: GatewayConfig,
        text_provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        let uploads = UploadStore::new(&config.uploads.dir).await.map_err(|e| {
            tracing::error!(
                dir = %config.uploads.dir.display(),
                "Failed to create upload directory: {}",
                e
            );
            e
        })?;

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state: AppState {
                config,
                uploads,
                text_provider,
            },
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(
            "Gemini API Server is running at http://localhost:{}",
            self.port
        );

        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
