//! Annotation status and partial-update rules.
//!
//! An item's status is never stored. It is derived from the nullity of the
//! three annotation fields every time it is needed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::emotion::{validate_vad, Emotion};
use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Derived annotation status of a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationStatus {
    Pending,
    Completed,
}

impl AnnotationStatus {
    /// Return the status as a lowercase string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Derive the status from the three annotation fields.
    ///
    /// Completed iff all three are present. Any partial combination is pending.
    pub fn derive(emotion_set: bool, valence: Option<f64>, arousal: Option<f64>) -> Self {
        if emotion_set && valence.is_some() && arousal.is_some() {
            Self::Completed
        } else {
            Self::Pending
        }
    }
}

impl fmt::Display for AnnotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to the annotation state of a stored item.
///
/// Implemented by the persistence models so traversal and statistics can be
/// computed the same way regardless of the backing store.
pub trait Annotated {
    fn id(&self) -> DbId;
    fn media_type(&self) -> &str;
    fn emotion(&self) -> Option<&str>;
    fn valence(&self) -> Option<f64>;
    fn arousal(&self) -> Option<f64>;

    fn status(&self) -> AnnotationStatus {
        AnnotationStatus::derive(self.emotion().is_some(), self.valence(), self.arousal())
    }

    fn is_completed(&self) -> bool {
        self.status() == AnnotationStatus::Completed
    }
}

// ---------------------------------------------------------------------------
// Values and patches
// ---------------------------------------------------------------------------

/// Snapshot of the three annotation fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationValues {
    pub emotion: Option<Emotion>,
    pub valence: Option<f64>,
    pub arousal: Option<f64>,
}

impl AnnotationValues {
    pub fn is_empty(&self) -> bool {
        self.emotion.is_none() && self.valence.is_none() && self.arousal.is_none()
    }

    pub fn status(&self) -> AnnotationStatus {
        AnnotationStatus::derive(self.emotion.is_some(), self.valence, self.arousal)
    }
}

/// A validated partial annotation update.
///
/// Fields left as `None` keep whatever value is currently persisted; a patch
/// never clears a field. Clearing is only done by a reset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnnotationPatch {
    pub emotion: Option<Emotion>,
    pub valence: Option<f64>,
    pub arousal: Option<f64>,
}

impl AnnotationPatch {
    /// Build a patch from raw request values.
    ///
    /// At least one of `tag` or the full (`valence`, `arousal`) pair is
    /// required. An empty tag counts as absent. Every supplied value is
    /// validated before the patch is returned, so an invalid request never
    /// reaches the store.
    pub fn new(
        tag: Option<&str>,
        valence: Option<f64>,
        arousal: Option<f64>,
    ) -> Result<Self, CoreError> {
        let tag = tag.filter(|t| !t.is_empty());

        if tag.is_none() && (valence.is_none() || arousal.is_none()) {
            return Err(CoreError::Validation(
                "Provide either emotion tag or VAD values".to_string(),
            ));
        }

        let emotion = tag.map(str::parse::<Emotion>).transpose()?;
        let valence = valence.map(|v| validate_vad("Valence", v)).transpose()?;
        let arousal = arousal.map(|v| validate_vad("Arousal", v)).transpose()?;

        Ok(Self {
            emotion,
            valence,
            arousal,
        })
    }

    /// Merge the patch over the currently persisted values.
    pub fn apply(&self, current: AnnotationValues) -> AnnotationValues {
        AnnotationValues {
            emotion: self.emotion.or(current.emotion),
            valence: self.valence.or(current.valence),
            arousal: self.arousal.or(current.arousal),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
