//! Export download handlers.

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::export::{self, Export, ExportFormat};

use super::super::state::AppState;
use super::reject;

/// Query parameters for the PNG endpoint.
#[derive(Debug, Deserialize)]
pub struct PngQuery {
    pub dpi: Option<f32>,
}

/// GET /api/export/pdf - Rendered sheet as PDF.
pub async fn pdf(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    render(state, ExportFormat::Pdf).await.map(attachment)
}

/// GET /api/export/png - Rendered sheet as PNG.
pub async fn png(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PngQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let dpi = query.dpi.unwrap_or(state.config.preview_dpi);
    render(state, ExportFormat::Png { dpi }).await.map(attachment)
}

/// GET /api/export/plan - Draw-op log as JSON.
pub async fn plan(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    render(state, ExportFormat::Plan).await.map(attachment)
}

/// Render a snapshot of the sheet without holding the lock.
///
/// The PDF document is not `Send`, so the render future runs to completion
/// on a blocking thread.
async fn render(
    state: Arc<AppState>,
    format: ExportFormat,
) -> Result<Export, (StatusCode, String)> {
    let sheet = state.snapshot().await;
    let handle = tokio::runtime::Handle::current();

    tokio::task::spawn_blocking(move || {
        handle.block_on(export::export(&sheet, format, &state.loader))
    })
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Render task failed: {}", e),
        )
    })?
    .map_err(reject)
}

fn attachment(export: Export) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, export.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
            (
                header::HeaderName::from_static("x-failed-cells"),
                export.report.failures.len().to_string(),
            ),
        ],
        export.bytes,
    )
}
