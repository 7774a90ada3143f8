//! Google Gemini backend
//!
//! Image composition through `generateContent` on Google AI Studio.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::GeminiClient;
pub use config::{GeminiConfig, GeminiConfigBuilder};
pub use error::GeminiErrorMapper;
pub use models::{
    DEFAULT_MODEL, GenerateContentRequest, GenerateContentResponse, InlineData, Modality, Part,
};
