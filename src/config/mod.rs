//! Configuration management for the studio
//!
//! Settings come from an optional YAML file, then environment variables
//! (after `.env` has been loaded), in that order of precedence.

pub mod loader;

pub use loader::{ENV_PREFIX, load_config, load_dotenv};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::options::OptionState;
use crate::core::providers::gemini::GeminiConfig;
use crate::utils::error::{Result, StudioError};
use crate::utils::logging::LoggingConfig;

/// Where generated images are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// Main configuration struct for the studio
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub gemini: GeminiConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    /// Initial option selection
    pub defaults: OptionState,
}

impl StudioConfig {
    /// Parse a YAML document; missing sections keep their defaults
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            StudioError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_yaml(&content)?;
        debug!("Configuration file parsed");
        Ok(config)
    }

    /// Check the parts that do not depend on the credential.
    ///
    /// The API key is only required once a client is built, so `prompt` and
    /// `normalize` work without one.
    pub fn validate(&self) -> Result<()> {
        self.defaults.validate()?;

        if self.gemini.request_timeout == 0 || self.gemini.connect_timeout == 0 {
            return Err(StudioError::configuration(
                "Gemini timeouts must be greater than 0",
            ));
        }

        if self.output.directory.as_os_str().is_empty() {
            return Err(StudioError::configuration(
                "Output directory cannot be empty",
            ));
        }

        Ok(())
    }
}
