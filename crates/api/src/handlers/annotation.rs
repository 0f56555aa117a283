//! Handler for submitting emotion and valence/arousal annotations.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use markup_core::annotation::AnnotationPatch;
use markup_core::error::CoreError;
use markup_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// Request body for `POST /api/annotate`.
///
/// Valence and arousal are kept as raw JSON so both numbers and numeric
/// strings are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateRequest {
    pub media_id: Option<DbId>,
    pub tag: Option<String>,
    #[serde(default)]
    pub valence: Value,
    #[serde(default)]
    pub arousal: Value,
}

/// Read a valence/arousal value given as a JSON number or numeric string.
///
/// `null` and absent values are `None`; anything else that is not a number
/// is a validation error. Range checks happen when the patch is built.
pub fn parse_vad(label: &str, value: &Value) -> Result<Option<f64>, CoreError> {
    let not_a_number = || CoreError::Validation(format!("{label} must be a number"));
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(not_a_number),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| not_a_number()),
        _ => Err(not_a_number()),
    }
}

/// POST /api/annotate
///
/// Apply a partial annotation to one item. At least an emotion tag or both
/// valence and arousal must be given; omitted fields keep their stored
/// value. Responds with the updated item and fresh stats.
pub async fn submit_annotation(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<AnnotateRequest>,
) -> AppResult<impl IntoResponse> {
    let media_id = input
        .media_id
        .ok_or_else(|| AppError::BadRequest("Missing required fields".into()))?;

    let valence = parse_vad("Valence", &input.valence)?;
    let arousal = parse_vad("Arousal", &input.arousal)?;
    let patch = AnnotationPatch::new(input.tag.as_deref(), valence, arousal)?;

    let result = state
        .store
        .update_annotation(media_id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Media",
            id: media_id,
        }))?;

    let stats = state.store.stats().await?;

    tracing::info!(
        media_id,
        emotion = ?result.emotion,
        valence = ?result.valence,
        arousal = ?result.arousal,
        "Annotation saved",
    );

    Ok(Json(json!({
        "success": true,
        "message": "Annotation saved successfully",
        "result": result,
        "stats": stats,
    })))
}
