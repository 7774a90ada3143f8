//! Asset intake
//!
//! Holds the user-selected photos. An [`ImageAsset`] keeps a handle to the
//! raw bytes (a file that is read on demand, or bytes already in memory), the
//! declared MIME type and a preview reference a renderer can display.

use std::path::{Path, PathBuf};

use base64::Engine;
use bytes::Bytes;
use image::ImageFormat;
use tracing::{debug, warn};
use url::Url;

use crate::utils::error::{Result, StudioError};

/// MIME types offered by the file picker. The filter is advisory only.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// Whether `mime_type` is one of the picker's accepted types
pub fn is_accepted_mime_type(mime_type: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime_type)
}

/// Where the raw bytes of an asset live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    File(PathBuf),
    Memory(Bytes),
}

/// A user-selected image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    source: AssetSource,
    mime_type: String,
    preview: String,
}

impl ImageAsset {
    /// Select a file on disk. The content is not read until normalization.
    ///
    /// The MIME type is derived from the extension, like a browser file
    /// input does.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let absolute = std::fs::canonicalize(path).map_err(|source| StudioError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mime_type = ImageFormat::from_path(&absolute)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string());
        warn_if_unaccepted(&absolute.display().to_string(), &mime_type);

        let preview = Url::from_file_path(&absolute)
            .map(String::from)
            .map_err(|_| {
                StudioError::Internal(format!(
                    "Cannot build preview URL for {}",
                    absolute.display()
                ))
            })?;

        debug!("Selected {} as {}", absolute.display(), mime_type);

        Ok(Self {
            source: AssetSource::File(absolute),
            mime_type,
            preview,
        })
    }

    /// Wrap bytes already in memory; the MIME type is guessed from the content
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let mime_type = image::guess_format(&bytes)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string());
        Self::from_bytes_with_mime(bytes, mime_type)
    }

    /// Wrap bytes already in memory with an explicit MIME type
    pub fn from_bytes_with_mime(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        let bytes = bytes.into();
        let mime_type = mime_type.into();
        warn_if_unaccepted("in-memory image", &mime_type);

        let preview = format!(
            "data:{};base64,{}",
            mime_type,
            base64::engine::general_purpose::STANDARD.encode(&bytes)
        );

        Self {
            source: AssetSource::Memory(bytes),
            mime_type,
            preview,
        }
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Reference a renderer can display: `file://` or `data:` URL
    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// Human-readable origin for log lines
    pub fn describe(&self) -> String {
        match &self.source {
            AssetSource::File(path) => path.display().to_string(),
            AssetSource::Memory(bytes) => format!("<{} bytes in memory>", bytes.len()),
        }
    }
}

fn warn_if_unaccepted(origin: &str, mime_type: &str) {
    if !is_accepted_mime_type(mime_type) {
        warn!(
            "{} has type {}, expected one of {}",
            origin,
            mime_type,
            ACCEPTED_MIME_TYPES.join(", ")
        );
    }
}

/// The three upload slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetSlot {
    Person,
    Object,
    StyleReference,
}

impl AssetSlot {
    pub const ALL: [AssetSlot; 3] = [AssetSlot::Person, AssetSlot::Object, AssetSlot::StyleReference];

    pub fn label(&self) -> &'static str {
        match self {
            AssetSlot::Person => "Your Photo",
            AssetSlot::Object => "Object Photo",
            AssetSlot::StyleReference => "Style Reference (Optional)",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, AssetSlot::StyleReference)
    }
}

/// Photos currently selected in the three slots
#[derive(Debug, Clone, Default)]
pub struct StudioAssets {
    person: Option<ImageAsset>,
    object: Option<ImageAsset>,
    style_reference: Option<ImageAsset>,
}

impl StudioAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `asset` into `slot`, or clear it with `None`.
    ///
    /// Returns the asset previously held by the slot.
    pub fn set(&mut self, slot: AssetSlot, asset: Option<ImageAsset>) -> Option<ImageAsset> {
        let target = self.slot_mut(slot);
        std::mem::replace(target, asset)
    }

    pub fn clear(&mut self, slot: AssetSlot) -> Option<ImageAsset> {
        self.set(slot, None)
    }

    pub fn get(&self, slot: AssetSlot) -> Option<&ImageAsset> {
        match slot {
            AssetSlot::Person => self.person.as_ref(),
            AssetSlot::Object => self.object.as_ref(),
            AssetSlot::StyleReference => self.style_reference.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: AssetSlot) -> &mut Option<ImageAsset> {
        match slot {
            AssetSlot::Person => &mut self.person,
            AssetSlot::Object => &mut self.object,
            AssetSlot::StyleReference => &mut self.style_reference,
        }
    }

    pub fn has_style_reference(&self) -> bool {
        self.style_reference.is_some()
    }

    /// Both required photos are present
    pub fn is_complete(&self) -> bool {
        AssetSlot::ALL
            .iter()
            .filter(|slot| slot.is_required())
            .all(|slot| self.get(*slot).is_some())
    }

    /// Present assets in request order: person, object, style reference
    pub fn in_request_order(&self) -> Vec<(AssetSlot, &ImageAsset)> {
        AssetSlot::ALL
            .iter()
            .filter_map(|slot| self.get(*slot).map(|asset| (*slot, asset)))
            .collect()
    }
}
