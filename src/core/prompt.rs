//! Prompt synthesis
//!
//! The instruction sent with the images is derived from the option state and
//! from whether a style reference was supplied. [`PromptField`] mirrors an
//! editable text box whose content is regenerated whenever an input changes.

use crate::core::options::{CUSTOM, NONE, OptionState};

const BASE_CLAUSE: &str = "Using the photo of the person and the photo of the object, create a new photorealistic image where the person is holding or using the object naturally.";

const STYLE_REFERENCE_CLAUSE: &str =
    " Emulate the style, composition, and pose from the reference photo.";

const HDR_SUFFIX: &str = " with HDR 10+ for a cinematic look";

/// Build the prompt for `options`.
///
/// Clause order is fixed: base, style reference, pose, location, final
/// rendering clause.
pub fn synthesize_prompt(options: &OptionState, has_style_reference: bool) -> String {
    let mut prompt = String::from(BASE_CLAUSE);

    if has_style_reference {
        prompt.push_str(STYLE_REFERENCE_CLAUSE);
    }

    if let Some(clause) = pose_clause(options) {
        prompt.push_str(&clause);
    }

    if let Some(clause) = location_clause(options) {
        prompt.push_str(&clause);
    }

    prompt.push_str(&format!(
        " The final image should have a {}, {}, and a {} aspect ratio. Render in {}{}.",
        options.camera_angle,
        options.lighting,
        options.aspect_ratio,
        options.quality_label(),
        if options.hdr { HDR_SUFFIX } else { "" }
    ));

    prompt
}

fn pose_clause(options: &OptionState) -> Option<String> {
    let custom = options.custom_pose_movement.trim();
    let pose = options.pose_movement.as_str();

    if pose == CUSTOM && !custom.is_empty() {
        Some(format!(" The person's pose/movement should be: {}.", custom))
    } else if pose != NONE && pose != CUSTOM {
        Some(format!(" The person should have a {}.", pose))
    } else {
        None
    }
}

fn location_clause(options: &OptionState) -> Option<String> {
    let custom = options.custom_location.trim();
    let location = options.location.as_str();

    if location == CUSTOM && !custom.is_empty() {
        Some(format!(" The setting should be: {}.", custom))
    } else if location == "indoor" || location == "outdoor" {
        Some(format!(" The setting should be {}.", location))
    } else {
        None
    }
}

/// Editable prompt text that follows its inputs.
///
/// A manual edit lasts until the next [`PromptField::sync`] with different
/// inputs, which overwrites it with a freshly synthesized prompt.
#[derive(Debug, Clone, Default)]
pub struct PromptField {
    text: String,
    inputs: Option<(OptionState, bool)>,
}

impl PromptField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute when the inputs differ from the previous sync.
    ///
    /// Returns `true` when the text was regenerated.
    pub fn sync(&mut self, options: &OptionState, has_style_reference: bool) -> bool {
        let unchanged = matches!(
            &self.inputs,
            Some((previous, style)) if previous == options && *style == has_style_reference
        );
        if unchanged {
            return false;
        }

        self.text = synthesize_prompt(options, has_style_reference);
        self.inputs = Some((options.clone(), has_style_reference));
        true
    }

    /// Replace the text with a user edit
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
