//! Image generation backends
//!
//! The orchestrator talks to the generation service only through
//! [`ImageBackend`], which keeps it testable without a network.

pub mod gemini;

use async_trait::async_trait;

pub use gemini::models::{GenerateContentResponse, Part};

use crate::utils::error::Result;

/// A service that composes an image from inline images and a text prompt
///
/// # Example
///
/// ```rust,no_run
/// use photo_studio::core::providers::{ImageBackend, Part};
/// use photo_studio::core::providers::gemini::{GeminiClient, GeminiConfig};
///
/// # async fn run() -> photo_studio::Result<()> {
/// let client = GeminiClient::new(GeminiConfig::new("my-key"))?;
/// let response = client.generate_content(vec![Part::text("a red apple")]).await?;
/// println!("{:?}", response.advisory_text());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Send `parts` as a single user turn requesting IMAGE and TEXT output
    async fn generate_content(&self, parts: Vec<Part>) -> Result<GenerateContentResponse>;
}
