//! Audio upload handler (`/upload_audio`).

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upload::UploadError;

/// Multipart field carrying the recording.
pub const AUDIO_FIELD: &str = "audio";

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "Error saving audio file").into_response()
    }
}

pub async fn upload_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match save_audio(&state, multipart).await {
        Ok(file_name) => {
            metrics::record_upload("saved");
            (StatusCode::OK, format!("Audio file saved as {}", file_name)).into_response()
        }
        Err(e) => {
            metrics::record_upload("failed");
            tracing::error!(error = %e, "Error saving audio file");
            e.into_response()
        }
    }
}

async fn save_audio(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, UploadError> {
    let mut multipart = multipart.map_err(|e| UploadError::Multipart(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.body_text()))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| UploadError::Multipart(e.body_text()))?;
        return state.uploads.save(&bytes).await;
    }

    Err(UploadError::MissingField)
}
