//! Cell image upload and clearing handlers.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;

use crate::source::{ImageSource, is_image_content_type, is_image_filename};

use super::super::state::AppState;

/// Response from the upload endpoint.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub filename: String,
    pub bytes: usize,
    pub format: String,
}

/// POST /api/cells/:id/image - Put an uploaded image into a cell.
///
/// The part must be declared as an image (content type, or file extension
/// when no type is sent) and its bytes must look like a known image format.
/// Decoding itself waits for export.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let mut image_data: Option<Vec<u8>> = None;
    let mut filename = String::from("unknown");

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }
        filename = field.file_name().unwrap_or("unknown").to_string();
        let declared_image = match field.content_type() {
            Some(content_type) => is_image_content_type(content_type),
            None => is_image_filename(&filename),
        };
        if !declared_image {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("{} is not an image", filename),
            ));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read image: {}", e)))?;
        image_data = Some(bytes.to_vec());
        break;
    }

    let image_bytes =
        image_data.ok_or((StatusCode::BAD_REQUEST, "No image field found".to_string()))?;
    let format = image::guess_format(&image_bytes).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            format!("{} is not a recognized image format", filename),
        )
    })?;

    let size = image_bytes.len();
    let placed = {
        let mut sheet = state.sheet.write().await;
        sheet.set_image(&id, ImageSource::from_bytes(image_bytes))
    };
    if !placed {
        return Err((StatusCode::NOT_FOUND, format!("No cell named {}", id)));
    }

    tracing::debug!(cell = %id, bytes = size, "image uploaded");
    Ok(Json(UploadResponse {
        id,
        filename,
        bytes: size,
        format: format!("{:?}", format).to_lowercase(),
    }))
}

/// DELETE /api/cells/:id/image - Clear one cell.
pub async fn clear(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut sheet = state.sheet.write().await;
    if sheet.clear_image(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, format!("No cell named {}", id)))
    }
}

/// DELETE /api/cells/images - Clear every cell.
pub async fn clear_all(State(state): State<Arc<AppState>>) -> StatusCode {
    state.sheet.write().await.clear_all();
    StatusCode::NO_CONTENT
}
