//! Shared query parameter types for API handlers.

use markup_core::annotation::AnnotationStatus;
use markup_core::types::DbId;
use serde::{Deserialize, Deserializer};

/// Optional status filter for media listings (`?status=pending|completed`).
#[derive(Debug, Deserialize)]
pub struct MediaListParams {
    pub status: Option<AnnotationStatus>,
}

/// Cursor for sequential navigation (`?current_id=`).
///
/// A value that is not an integer reads as absent, so `next` starts from the
/// beginning and `prev` reports the cursor as missing.
#[derive(Debug, Default, Deserialize)]
pub struct CurrentIdParams {
    #[serde(default, deserialize_with = "lenient_id")]
    pub current_id: Option<DbId>,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<DbId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}
