//! # photo-studio
//!
//! Compose a photo of a person and a photo of an object, optionally guided by
//! a style reference, into a new photorealistic image with Gemini image
//! generation.
//!
//! ## Features
//!
//! - **Image normalization**: center-crop, resize and re-encode every photo to
//!   the selected aspect ratio
//! - **Prompt synthesis**: derive the instruction from lighting, camera angle,
//!   pose, location, quality and HDR options
//! - **Gemini backend**: typed `generateContent` client with error mapping
//! - **Single-flight orchestration**: one request at a time, every failure
//!   reported in the result
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use photo_studio::core::assets::{AssetSlot, ImageAsset};
//! use photo_studio::core::providers::gemini::{GeminiClient, GeminiConfig};
//! use photo_studio::Studio;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::new(GeminiConfig::new("my-api-key"))?;
//!     let mut studio = Studio::new(client);
//!
//!     studio.select(AssetSlot::Person, ImageAsset::from_path("me.jpg")?);
//!     studio.select(AssetSlot::Object, ImageAsset::from_path("guitar.png")?);
//!
//!     let view = studio.generate().await;
//!     if let Some(error) = view.error_banner() {
//!         eprintln!("{}", error);
//!     } else {
//!         let path = view.save(".").await?;
//!         println!("Saved {}", path.display());
//!     }
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

pub use config::StudioConfig;
pub use utils::error::{ErrorCategory, Result, StudioError};

pub use core::assets::{AssetSlot, ImageAsset, StudioAssets};
pub use core::options::OptionState;
pub use core::orchestrator::{GeneratedImage, GenerationResult, Orchestrator, RequestPhase};
pub use core::presentation::{Lightbox, LightboxEvent, ResultView};
pub use core::prompt::{PromptField, synthesize_prompt};
pub use core::providers::ImageBackend;

use tracing::debug;

/// One studio session: the selected photos, the options, the editable prompt
/// and the result panel, wired to a backend.
pub struct Studio<B> {
    assets: StudioAssets,
    options: OptionState,
    prompt: PromptField,
    orchestrator: Orchestrator<B>,
    view: ResultView,
}

impl<B: ImageBackend> Studio<B> {
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, OptionState::default())
    }

    pub fn with_options(backend: B, options: OptionState) -> Self {
        let mut studio = Self {
            assets: StudioAssets::new(),
            options,
            prompt: PromptField::new(),
            orchestrator: Orchestrator::new(backend),
            view: ResultView::new(),
        };
        studio.sync_prompt();
        studio
    }

    fn sync_prompt(&mut self) {
        if self
            .prompt
            .sync(&self.options, self.assets.has_style_reference())
        {
            debug!("Prompt regenerated");
        }
    }

    /// Put `asset` into `slot`, replacing what was there
    pub fn select(&mut self, slot: AssetSlot, asset: ImageAsset) -> Option<ImageAsset> {
        let previous = self.assets.set(slot, Some(asset));
        self.sync_prompt();
        previous
    }

    pub fn clear(&mut self, slot: AssetSlot) -> Option<ImageAsset> {
        let previous = self.assets.clear(slot);
        self.sync_prompt();
        previous
    }

    pub fn assets(&self) -> &StudioAssets {
        &self.assets
    }

    pub fn options(&self) -> &OptionState {
        &self.options
    }

    /// Change options; the prompt is regenerated when anything changed
    pub fn update_options(&mut self, update: impl FnOnce(&mut OptionState)) {
        update(&mut self.options);
        self.sync_prompt();
    }

    pub fn prompt(&self) -> &str {
        self.prompt.text()
    }

    /// Replace the prompt text until the next option or asset change
    pub fn edit_prompt(&mut self, text: impl Into<String>) {
        self.prompt.edit(text);
    }

    pub fn phase(&self) -> RequestPhase {
        self.orchestrator.phase()
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ResultView {
        &mut self.view
    }

    /// Submit the current photos, options and prompt
    pub async fn generate(&mut self) -> &ResultView {
        self.view.begin();
        let result = self
            .orchestrator
            .submit(&self.assets, &self.options, self.prompt.text())
            .await;
        self.view.apply(result);
        &self.view
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
