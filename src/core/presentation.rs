//! Result presentation
//!
//! View-model for the result panel: loading state, the error banner, the
//! generated image with its advisory note, the fullscreen viewer and the
//! download.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::core::orchestrator::{GeneratedImage, GenerationResult};
use crate::utils::error::{Result, StudioError};

/// Stem of the downloaded file name
pub const DOWNLOAD_STEM: &str = "ai-photo-studio-generated";

static DATA_URL_MIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:(image/[a-z]+);").expect("data URL pattern is valid")
});

/// `ai-photo-studio-generated.<ext>` where `<ext>` is the subtype of the
/// data URL's image MIME type, `png` when none can be found.
pub fn download_filename(data_url: &str) -> String {
    let extension = DATA_URL_MIME
        .captures(data_url)
        .and_then(|caps| caps.get(1))
        .and_then(|mime| mime.as_str().split('/').nth(1))
        .unwrap_or("png");
    format!("{}.{}", DOWNLOAD_STEM, extension)
}

/// Download name of `image`, from the data URL prefix alone
pub fn image_filename(image: &GeneratedImage) -> String {
    download_filename(&format!("data:{};", image.mime_type))
}

/// Input events the fullscreen viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxEvent {
    /// A key press, by key name (`"Escape"`, `"Enter"`, ...)
    Key(&'static str),
    BackdropClick,
    CloseButton,
    ImageClick,
}

/// Fullscreen viewer state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lightbox {
    open: bool,
}

impl Lightbox {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Background scrolling is suppressed exactly while the viewer is open
    pub fn is_scroll_locked(&self) -> bool {
        self.open
    }

    /// Apply `event`; returns whether the viewer is open afterwards
    pub fn handle(&mut self, event: LightboxEvent) -> bool {
        match event {
            LightboxEvent::Key("Escape") | LightboxEvent::BackdropClick | LightboxEvent::CloseButton => {
                self.open = false;
            }
            LightboxEvent::Key(_) | LightboxEvent::ImageClick => {}
        }
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }
}

/// What the result panel shows
#[derive(Debug, Clone, Default)]
pub struct ResultView {
    loading: bool,
    result: GenerationResult,
    lightbox: Lightbox,
}

impl ResultView {
    pub fn new() -> Self {
        Self::default()
    }

    /// A submission started: clear the previous outcome and show the spinner
    pub fn begin(&mut self) {
        self.loading = true;
        self.result = GenerationResult::default();
        self.lightbox.close();
    }

    /// Show `result`. The last applied result wins.
    pub fn apply(&mut self, result: GenerationResult) {
        self.loading = false;
        if result.image.is_none() {
            self.lightbox.close();
        }
        self.result = result;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error_banner(&self) -> Option<&str> {
        self.result.error.as_ref().map(|error| error.message.as_str())
    }

    pub fn image(&self) -> Option<&GeneratedImage> {
        self.result.image.as_ref()
    }

    pub fn advisory(&self) -> Option<&str> {
        self.result.advisory.as_deref()
    }

    /// Shown when nothing has been produced or is being produced
    pub fn is_placeholder(&self) -> bool {
        !self.loading && self.result.image.is_none()
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    /// Open the fullscreen viewer; only possible while an image is shown
    pub fn open_lightbox(&mut self) -> bool {
        self.lightbox.open = self.result.image.is_some();
        self.lightbox.open
    }

    pub fn handle_lightbox(&mut self, event: LightboxEvent) -> bool {
        self.lightbox.handle(event)
    }

    pub fn download_filename(&self) -> Option<String> {
        self.image().map(image_filename)
    }

    /// Write the image into `dir` under its download name
    pub async fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let image = self
            .image()
            .ok_or_else(|| StudioError::validation("There is no generated image to save"))?;
        save_image(image, dir).await
    }
}

/// Write `image` into `dir` as `ai-photo-studio-generated.<ext>`
pub async fn save_image(image: &GeneratedImage, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(image_filename(image));
    tokio::fs::write(&path, &image.bytes).await?;
    info!("Saved generated image to {}", path.display());
    Ok(path)
}
