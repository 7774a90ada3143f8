//! Gemini configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use super::models::DEFAULT_MODEL;
use crate::utils::error::{Result, StudioError};
use crate::utils::mask_secret;

/// Environment variables holding the API key, in lookup order
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY", "API_KEY"];

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Connection settings for the Gemini API
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Google AI Studio key, sent as `x-goog-api-key`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub model: String,

    pub base_url: String,

    pub api_version: String,

    /// Whole-request timeout in seconds
    pub request_timeout: u64,

    /// Connect timeout in seconds
    pub connect_timeout: u64,

    pub proxy_url: Option<String>,

    pub custom_headers: HashMap<String, String>,

    /// Log the request URL and part count, and the response status and body
    /// size, at debug level
    pub debug: bool,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: 120,
            connect_timeout: 10,
            proxy_url: None,
            custom_headers: HashMap::new(),
            debug: false,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_deref().map(mask_secret))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("proxy_url", &self.proxy_url)
            .field("custom_headers", &self.custom_headers.keys().collect::<Vec<_>>())
            .field("debug", &self.debug)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn builder(api_key: impl Into<String>) -> GeminiConfigBuilder {
        GeminiConfigBuilder {
            config: Self::new(api_key),
        }
    }

    /// First non-empty key among [`API_KEY_ENV_VARS`] according to `lookup`
    pub fn api_key_from<F>(lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty())
    }

    /// Non-empty API key or a configuration error
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(StudioError::configuration(format!(
                "Gemini API key is missing; set one of {} or gemini.api_key",
                API_KEY_ENV_VARS.join(", ")
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.require_api_key()?;

        if self.model.trim().is_empty() {
            return Err(StudioError::configuration("Model name cannot be empty"));
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(StudioError::configuration(format!(
                "Invalid base URL: {}",
                self.base_url
            )));
        }

        if self.request_timeout == 0 {
            return Err(StudioError::configuration(
                "Request timeout must be greater than 0",
            ));
        }

        if self.connect_timeout == 0 {
            return Err(StudioError::configuration(
                "Connect timeout must be greater than 0",
            ));
        }

        if self.connect_timeout > self.request_timeout {
            return Err(StudioError::configuration(
                "Connect timeout cannot be greater than request timeout",
            ));
        }

        Ok(())
    }

    /// `{base_url}/{api_version}/models/{model}:{operation}`
    pub fn get_endpoint(&self, operation: &str) -> String {
        format!(
            "{}/{}/models/{}:{}",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            self.model,
            operation
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

pub struct GeminiConfigBuilder {
    config: GeminiConfig,
}

impl GeminiConfigBuilder {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.config.request_timeout = timeout_secs;
        self
    }

    pub fn with_connect_timeout(mut self, timeout_secs: u64) -> Self {
        self.config.connect_timeout = timeout_secs;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.custom_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn build(self) -> Result<GeminiConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
