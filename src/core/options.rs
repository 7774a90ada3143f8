//! Creative option state
//!
//! The enumerated choices offered for every control, and the state holding the
//! user's current selection.

use serde::{Deserialize, Serialize};

use crate::core::normalizer::AspectRatio;
use crate::utils::error::{Result, StudioError};

/// One entry of an enumerated option list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl SelectOption {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Pose and location value that switches to the free-text override
pub const CUSTOM: &str = "custom";

/// Pose and location value that omits the clause
pub const NONE: &str = "none";

pub const ASPECT_RATIOS: &[SelectOption] = &[
    SelectOption::new("1:1", "1:1 (Square)"),
    SelectOption::new("16:9", "16:9 (Widescreen)"),
    SelectOption::new("9:16", "9:16 (Vertical)"),
    SelectOption::new("4:3", "4:3 (Standard)"),
    SelectOption::new("3:4", "3:4 (Portrait)"),
];

pub const LIGHTING_STYLES: &[SelectOption] = &[
    SelectOption::new("soft studio lighting", "Soft Studio"),
    SelectOption::new("dramatic cinematic lighting", "Cinematic"),
    SelectOption::new("golden hour sunlight", "Golden Hour"),
    SelectOption::new("neon noir", "Neon Noir"),
    SelectOption::new("natural daylight", "Natural Daylight"),
    SelectOption::new("backlit", "Backlit"),
];

pub const CAMERA_ANGLES: &[SelectOption] = &[
    SelectOption::new("eye-level shot", "Eye-Level"),
    SelectOption::new("low-angle shot", "Low-Angle"),
    SelectOption::new("high-angle shot", "High-Angle"),
    SelectOption::new("dutch angle", "Dutch Angle"),
    SelectOption::new("close-up shot", "Close-Up"),
    SelectOption::new("full-body shot", "Full-Body"),
];

pub const POSE_MOVEMENTS: &[SelectOption] = &[
    SelectOption::new(NONE, "None"),
    SelectOption::new("dynamic action pose", "Dynamic Action"),
    SelectOption::new("elegant still pose", "Elegant Still"),
    SelectOption::new("candid laughter", "Candid Laughter"),
    SelectOption::new("dramatic turn", "Dramatic Turn"),
    SelectOption::new("thoughtful gaze", "Thoughtful Gaze"),
    SelectOption::new(CUSTOM, "Custom..."),
];

pub const LOCATIONS: &[SelectOption] = &[
    SelectOption::new(NONE, "None"),
    SelectOption::new("outdoor", "Outdoor"),
    SelectOption::new("indoor", "Indoor"),
    SelectOption::new(CUSTOM, "Custom..."),
];

pub const IMAGE_QUALITIES: &[SelectOption] = &[
    SelectOption::new("HD", "HD (1280x720)"),
    SelectOption::new("Full HD", "Full HD (1920x1080)"),
    SelectOption::new("4K", "4K (3840x2160)"),
];

/// Find the display label of `value` in `options`
pub fn label_for(options: &[SelectOption], value: &str) -> Option<&'static str> {
    options
        .iter()
        .find(|option| option.value == value)
        .map(|option| option.label)
}

fn contains(options: &[SelectOption], value: &str) -> bool {
    options.iter().any(|option| option.value == value)
}

/// Currently selected value of every control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionState {
    pub aspect_ratio: String,
    pub lighting: String,
    pub camera_angle: String,
    pub pose_movement: String,
    pub custom_pose_movement: String,
    pub location: String,
    pub custom_location: String,
    pub quality: String,
    pub hdr: bool,
}

impl Default for OptionState {
    fn default() -> Self {
        Self {
            aspect_ratio: ASPECT_RATIOS[0].value.to_string(),
            lighting: LIGHTING_STYLES[0].value.to_string(),
            camera_angle: CAMERA_ANGLES[0].value.to_string(),
            pose_movement: POSE_MOVEMENTS[0].value.to_string(),
            custom_pose_movement: String::new(),
            location: LOCATIONS[0].value.to_string(),
            custom_location: String::new(),
            quality: IMAGE_QUALITIES[0].value.to_string(),
            hdr: false,
        }
    }
}

impl OptionState {
    /// Human-readable label of the selected quality, the raw value if unknown
    pub fn quality_label(&self) -> &str {
        label_for(IMAGE_QUALITIES, &self.quality).unwrap_or(self.quality.as_str())
    }

    /// Check every enumerated field against its list.
    ///
    /// The aspect ratio only needs to parse, so ratios outside the presets are
    /// accepted.
    pub fn validate(&self) -> Result<()> {
        AspectRatio::parse(&self.aspect_ratio)?;

        let checks: [(&str, &[SelectOption], &str); 5] = [
            ("lighting", LIGHTING_STYLES, self.lighting.as_str()),
            ("camera angle", CAMERA_ANGLES, self.camera_angle.as_str()),
            ("pose/movement", POSE_MOVEMENTS, self.pose_movement.as_str()),
            ("location", LOCATIONS, self.location.as_str()),
            ("quality", IMAGE_QUALITIES, self.quality.as_str()),
        ];

        for (name, options, value) in checks {
            if !contains(options, value) {
                let allowed: Vec<&str> = options.iter().map(|o| o.value).collect();
                return Err(StudioError::validation(format!(
                    "Unknown {} '{}'; expected one of: {}",
                    name,
                    value,
                    allowed.join(", ")
                )));
            }
        }

        Ok(())
    }
}
