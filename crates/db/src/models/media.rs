//! Media item model and DTOs.

use markup_core::annotation::{Annotated, AnnotationValues};
use markup_core::media::{default_title, MediaType};
use markup_core::types::{DbId, Timestamp};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `media_items` table.
///
/// Serializes with the database column names plus the derived `status`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MediaItem {
    pub id: DbId,
    pub filename: String,
    pub filepath: String,
    #[sqlx(rename = "type")]
    pub media_type: String,
    pub title: String,
    pub emotion: Option<String>,
    pub valence: Option<f64>,
    pub arousal: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MediaItem {
    /// Current annotation fields as a typed snapshot.
    pub fn annotation_values(&self) -> AnnotationValues {
        AnnotationValues {
            emotion: self.emotion.as_deref().and_then(|e| e.parse().ok()),
            valence: self.valence,
            arousal: self.arousal,
        }
    }
}

impl Annotated for MediaItem {
    fn id(&self) -> DbId {
        self.id
    }

    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn emotion(&self) -> Option<&str> {
        self.emotion.as_deref()
    }

    fn valence(&self) -> Option<f64> {
        self.valence
    }

    fn arousal(&self) -> Option<f64> {
        self.arousal
    }
}

impl Serialize for MediaItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("MediaItem", 11)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("filename", &self.filename)?;
        s.serialize_field("filepath", &self.filepath)?;
        s.serialize_field("type", &self.media_type)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("emotion", &self.emotion)?;
        s.serialize_field("valence", &self.valence)?;
        s.serialize_field("arousal", &self.arousal)?;
        s.serialize_field("status", &self.status())?;
        s.serialize_field("created_at", &self.created_at)?;
        s.serialize_field("updated_at", &self.updated_at)?;
        s.end()
    }
}

/// DTO for creating a new media item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMediaItem {
    #[validate(length(min = 1, max = 255, message = "filename must be 1-255 characters"))]
    pub filename: String,
    #[validate(length(min = 1, max = 500, message = "filepath must be 1-500 characters"))]
    pub filepath: String,
    pub media_type: MediaType,
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,
}

impl CreateMediaItem {
    /// Build a create DTO for a file, detecting its type from the extension.
    ///
    /// Returns `None` if the extension is not an accepted media type.
    pub fn for_file(filename: &str, filepath: &str) -> Option<Self> {
        let media_type = MediaType::from_filename(filename)?;
        Some(Self {
            filename: filename.to_string(),
            filepath: filepath.to_string(),
            media_type,
            title: Some(default_title(filename)),
        })
    }

    /// Title to persist: the explicit one, or the filename without extension.
    pub fn resolved_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| default_title(&self.filename))
    }
}
