//! Request orchestration
//!
//! One submission runs: validation, the in-flight guard, normalization of each
//! selected photo, the backend call and interpretation of the response. Every
//! failure ends up in the single error slot of the returned
//! [`GenerationResult`].

use std::time::Instant;

use base64::Engine;
use bytes::Bytes;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::assets::StudioAssets;
use crate::core::normalizer::normalize_image;
use crate::core::options::OptionState;
use crate::core::providers::{GenerateContentResponse, ImageBackend, Part};
use crate::utils::error::{ErrorCategory, MISSING_IMAGES_MESSAGE, Result, StudioError};

/// Lifecycle of the most recent submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequestPhase {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Image bytes returned by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Bytes,
    pub mime_type: String,
}

impl GeneratedImage {
    /// `data:<mime>;base64,<payload>`
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Category and user-visible text of a failed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultError {
    pub category: ErrorCategory,
    pub message: String,
}

impl From<&StudioError> for ResultError {
    fn from(error: &StudioError) -> Self {
        Self {
            category: error.category(),
            message: error.user_message(),
        }
    }
}

/// Outcome of one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    pub image: Option<GeneratedImage>,
    pub advisory: Option<String>,
    pub error: Option<ResultError>,
}

impl GenerationResult {
    pub fn failed(error: &StudioError) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.image.is_some() && self.error.is_none()
    }
}

/// Drives submissions against a backend, one at a time
pub struct Orchestrator<B> {
    backend: B,
    phase: Mutex<RequestPhase>,
}

impl<B: ImageBackend> Orchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            phase: Mutex::new(RequestPhase::Idle),
        }
    }

    pub fn phase(&self) -> RequestPhase {
        *self.phase.lock()
    }

    /// Run one submission with `prompt` as the instruction text.
    ///
    /// Missing required photos fail without touching the phase or the
    /// backend. A submission made while another is in flight fails with
    /// [`StudioError::Busy`] and leaves the running one alone.
    pub async fn submit(
        &self,
        assets: &StudioAssets,
        options: &OptionState,
        prompt: &str,
    ) -> GenerationResult {
        if !assets.is_complete() {
            let error = StudioError::validation(MISSING_IMAGES_MESSAGE);
            warn!("Submission rejected: {}", error);
            return GenerationResult::failed(&error);
        }

        let Some(guard) = PhaseGuard::acquire(&self.phase) else {
            warn!("Submission rejected: another request is in flight");
            return GenerationResult::failed(&StudioError::Busy);
        };

        let started = Instant::now();
        info!(
            "Submitting generation request (aspect ratio {}, style reference: {})",
            options.aspect_ratio,
            assets.has_style_reference()
        );

        let outcome = self.run(assets, options, prompt).await;
        let result = match outcome {
            Ok(interpreted) => interpreted.into_result(),
            Err(error) => {
                warn!("Generation failed: {}", error);
                GenerationResult::failed(&error)
            }
        };

        let phase = if result.is_success() {
            RequestPhase::Succeeded
        } else {
            RequestPhase::Failed
        };
        guard.finish(phase);
        info!(
            "Generation finished as {:?} in {:?}",
            phase,
            started.elapsed()
        );

        result
    }

    async fn run(
        &self,
        assets: &StudioAssets,
        options: &OptionState,
        prompt: &str,
    ) -> Result<Interpreted> {
        let mut parts = Vec::with_capacity(4);
        for (slot, asset) in assets.in_request_order() {
            let normalized = normalize_image(asset, &options.aspect_ratio).await?;
            debug!(
                "{} normalized to {}x{}",
                slot.label(),
                normalized.width,
                normalized.height
            );
            parts.push(Part::from(normalized));
        }
        parts.push(Part::text(prompt));

        let response = self.backend.generate_content(parts).await?;
        interpret(&response)
    }
}

struct Interpreted {
    image: Option<GeneratedImage>,
    advisory: Option<String>,
}

impl Interpreted {
    fn into_result(self) -> GenerationResult {
        match self.image {
            Some(image) => GenerationResult {
                image: Some(image),
                advisory: self.advisory,
                error: None,
            },
            None => {
                if let Some(advisory) = &self.advisory {
                    warn!("Response carried no image, only text: {}", advisory);
                }
                GenerationResult {
                    image: None,
                    advisory: self.advisory,
                    error: Some((&StudioError::NoImageReturned).into()),
                }
            }
        }
    }
}

/// First inline image and the joined advisory text of the first candidate
fn interpret(response: &GenerateContentResponse) -> Result<Interpreted> {
    if let Some(reason) = response.block_reason() {
        debug!("Prompt feedback block reason: {}", reason);
    }

    let image = match response.first_image() {
        Some(inline) => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(inline.data.as_bytes())
                .map_err(|e| StudioError::Parse(format!("Invalid image payload: {}", e)))?;
            Some(GeneratedImage {
                bytes: Bytes::from(bytes),
                mime_type: inline.mime_type.clone(),
            })
        }
        None => None,
    };

    Ok(Interpreted {
        image,
        advisory: response.advisory_text(),
    })
}

/// Holds the phase at InFlight; a guard dropped without `finish` resets it to
/// Idle.
struct PhaseGuard<'a> {
    phase: &'a Mutex<RequestPhase>,
    finished: bool,
}

impl<'a> PhaseGuard<'a> {
    fn acquire(phase: &'a Mutex<RequestPhase>) -> Option<Self> {
        let mut current = phase.lock();
        if *current == RequestPhase::InFlight {
            return None;
        }
        *current = RequestPhase::InFlight;
        Some(Self {
            phase,
            finished: false,
        })
    }

    fn finish(mut self, outcome: RequestPhase) {
        *self.phase.lock() = outcome;
        self.finished = true;
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *self.phase.lock() = RequestPhase::Idle;
        }
    }
}
