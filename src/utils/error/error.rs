//! Error handling for the studio
//!
//! This module defines all error types used from asset intake to the generation API.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the studio
pub type Result<T> = std::result::Result<T, StudioError>;

/// Advisory shown when the API answers without an image part
pub const NO_IMAGE_MESSAGE: &str =
    "The AI did not return an image. Please try adjusting your prompt or images.";

/// Shown when a submission is attempted without the two required photos
pub const MISSING_IMAGES_MESSAGE: &str = "Please upload both a user photo and an object photo.";

/// Main error type for the studio
#[derive(Error, Debug)]
pub enum StudioError {
    /// Required inputs missing before submission
    #[error("{0}")]
    Validation(String),

    /// Missing or malformed configuration, including the API credential
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Aspect ratio string did not parse into two positive numbers
    #[error("Invalid aspect ratio provided: {0}")]
    InvalidAspectRatio(String),

    /// Source image could not be read at all
    #[error("Failed to read image {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source bytes are not a decodable image
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// No drawing surface of the requested size could be set up
    #[error("Could not acquire a {width}x{height} drawing surface")]
    Surface { width: u32, height: u32 },

    /// Re-encoding the normalized image failed
    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// The API call succeeded but carried no image part
    #[error("The AI did not return an image. Please try adjusting your prompt or images.")]
    NoImageReturned,

    /// Network failures and timeouts
    #[error("{0}")]
    Transport(String),

    /// Error status or error body returned by the API
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body could not be interpreted
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// Another submission is still in flight
    #[error("A generation request is already in progress")]
    Busy,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification used when reporting a failure to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Preprocessing,
    NoImageReturned,
    Transport,
}

impl StudioError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StudioError::Validation(_) => ErrorCategory::Validation,
            StudioError::Configuration(_) | StudioError::Yaml(_) => ErrorCategory::Configuration,
            StudioError::InvalidAspectRatio(_)
            | StudioError::Read { .. }
            | StudioError::Decode(_)
            | StudioError::Surface { .. }
            | StudioError::Encode(_) => ErrorCategory::Preprocessing,
            StudioError::NoImageReturned => ErrorCategory::NoImageReturned,
            StudioError::Transport(_)
            | StudioError::Api { .. }
            | StudioError::Parse(_)
            | StudioError::Busy
            | StudioError::Io(_)
            | StudioError::Internal(_) => ErrorCategory::Transport,
        }
    }

    /// Text placed in the single error slot of a result
    pub fn user_message(&self) -> String {
        match self {
            StudioError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_preprocessing(&self) -> bool {
        self.category() == ErrorCategory::Preprocessing
    }

    /// Whether resubmitting unchanged inputs may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            StudioError::Transport(_) | StudioError::Busy => true,
            StudioError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
