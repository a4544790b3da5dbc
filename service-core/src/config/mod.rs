use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load the common settings.
    ///
    /// Sources, lowest precedence first: `configuration.*` file, a bare `PORT`
    /// variable, then `APP__`-prefixed variables.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let bare_port: config::Map<String, String> =
            std::env::vars().filter(|(key, _)| key == "PORT").collect();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::default().source(Some(bare_port)).try_parsing(true))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Process environment is shared across test threads.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn port_defaults_to_3000() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn load_reads_bare_port_and_prefers_app_port() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        unsafe {
            env::remove_var("APP__PORT");
            env::set_var("PORT", "4321");
        }
        assert_eq!(Config::load().unwrap().port, 4321);

        unsafe { env::set_var("APP__PORT", "5555") };
        assert_eq!(Config::load().unwrap().port, 5555);

        unsafe {
            env::remove_var("APP__PORT");
            env::remove_var("PORT");
        }
        assert_eq!(Config::load().unwrap().port, 3000);
    }

    #[test]
    fn load_rejects_a_non_numeric_port() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        unsafe {
            env::remove_var("APP__PORT");
            env::set_var("PORT", "not-a-port");
        }
        let result = Config::load();
        unsafe { env::remove_var("PORT") };

        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
