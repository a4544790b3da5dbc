use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Request body limit (20MB) for multipart uploads.
const DEFAULT_UPLOAD_MAX_BYTES: usize = 20 * 1024 * 1024;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub uploads: UploadConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: String,
    /// Model used for every request (e.g., gemini-1.5-flash)
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl GeminiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Directory where uploads are staged for the duration of one request.
    pub dir: PathBuf,
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let api_key = match env::var("API_KEY") {
            Ok(key) => key,
            Err(_) => get_env("GOOGLE_API_KEY", None, is_prod)?,
        };

        Ok(GatewayConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key,
                model: get_env("GEMINI_MODEL", Some("gemini-1.5-flash"), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?,
                timeout_secs: parse_env("GEMINI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS, is_prod)?,
            },
            uploads: UploadConfig {
                dir: get_env("UPLOAD_DIR", Some("uploads"), is_prod)?.into(),
                max_bytes: parse_env("UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES, is_prod)?,
            },
            observability: ObservabilityConfig {
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: T, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr + ToString,
    T::Err: std::fmt::Display,
{
    get_env(key, Some(&default.to_string()), is_prod)?
        .parse()
        .map_err(|e: T::Err| AppError::ConfigError(anyhow::anyhow!("{} is invalid: {}", key, e)))
}
