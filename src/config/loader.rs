//! Configuration loading utilities
//!
//! Environment overrides are read through a lookup function so they can be
//! exercised without touching the process environment.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

use super::StudioConfig;
use crate::core::providers::gemini::GeminiConfig;
use crate::utils::error::{Result, StudioError};
use crate::utils::logging::{LogFormat, LogLevel};

/// Prefix of the studio's own environment variables
pub const ENV_PREFIX: &str = "STUDIO_";

/// Load `.env` from the working directory or its parents, if present
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env file: {}", e),
    }
}

impl StudioConfig {
    /// Apply environment overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|name| env::var(name).ok())
    }

    /// Apply environment overrides resolved through `lookup`
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(api_key) = GeminiConfig::api_key_from(&lookup) {
            self.gemini.api_key = Some(api_key);
        }
        if let Some(model) = var("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(base_url) = var("GEMINI_BASE_URL") {
            self.gemini.base_url = base_url;
        }
        if let Some(timeout) = var("GEMINI_TIMEOUT") {
            self.gemini.request_timeout = parse_var("GEMINI_TIMEOUT", &timeout)?;
        }

        if let Some(dir) = var(&format!("{}OUTPUT_DIR", ENV_PREFIX)) {
            self.output.directory = PathBuf::from(dir);
        }
        if let Some(level) = var(&format!("{}LOG_LEVEL", ENV_PREFIX)) {
            self.logging.level = LogLevel::from_str(&level)?;
        }
        if let Some(format) = var(&format!("{}LOG_FORMAT", ENV_PREFIX)) {
            self.logging.format = LogFormat::from_str(&format)?;
        }

        Ok(())
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| StudioError::configuration(format!("Invalid {}: {}", name, e)))
}

/// Load configuration with precedence: defaults, then file, then environment
pub async fn load_config(config_file: Option<&Path>) -> Result<StudioConfig> {
    let mut config = match config_file {
        Some(path) => StudioConfig::from_file(path).await?,
        None => StudioConfig::default(),
    };

    config.apply_env()?;
    config.validate()?;

    debug!(
        "Configuration ready (model {}, output {})",
        config.gemini.model,
        config.output.directory.display()
    );
    Ok(config)
}
