//! Emotion vocabulary and valence/arousal bounds.
//!
//! The emotion set is closed: the database column carries a matching CHECK
//! constraint, and the frontend renders exactly these seven tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lower bound (inclusive) for valence and arousal.
pub const VAD_MIN: f64 = -1.0;

/// Upper bound (inclusive) for valence and arousal.
pub const VAD_MAX: f64 = 1.0;

/// All valid emotion tag strings, in the order the frontend lists them.
pub const EMOTIONS: &[&str] = &[
    "angry", "sad", "neutral", "happy", "disgust", "surprise", "fear",
];

// ---------------------------------------------------------------------------
// Emotion
// ---------------------------------------------------------------------------

/// A categorical emotion tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Angry,
    Sad,
    Neutral,
    Happy,
    Disgust,
    Surprise,
    Fear,
}

impl Emotion {
    /// Return the tag as a lowercase string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Angry => "angry",
            Self::Sad => "sad",
            Self::Neutral => "neutral",
            Self::Happy => "happy",
            Self::Disgust => "disgust",
            Self::Surprise => "surprise",
            Self::Fear => "fear",
        }
    }
}

impl FromStr for Emotion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "angry" => Ok(Self::Angry),
            "sad" => Ok(Self::Sad),
            "neutral" => Ok(Self::Neutral),
            "happy" => Ok(Self::Happy),
            "disgust" => Ok(Self::Disgust),
            "surprise" => Ok(Self::Surprise),
            "fear" => Ok(Self::Fear),
            _ => Err(CoreError::Validation(format!(
                "Invalid emotion tag '{s}'. Must be one of: {}",
                EMOTIONS.join(", ")
            ))),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Valence / arousal
// ---------------------------------------------------------------------------

/// Validate a valence or arousal value.
///
/// `label` is the capitalised field name used in the error message
/// (`"Valence"` or `"Arousal"`). Bounds are inclusive.
pub fn validate_vad(label: &str, value: f64) -> Result<f64, CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!("{label} must be a number")));
    }
    if !(VAD_MIN..=VAD_MAX).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{label} must be between {VAD_MIN:.1} and {VAD_MAX:.1}"
        )));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
