//! Sheet selection API handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use std::sync::Arc;

use crate::catalog::{CardSize, PaperSize};
use crate::fit::Alignment;
use crate::render::ClipStrategy;
use crate::sheet::SheetSummary;

use super::super::state::AppState;
use super::reject;

/// Request body for PUT /api/sheet. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct SheetUpdate {
    pub paper: Option<String>,
    pub card: Option<String>,
    pub alignment: Option<Alignment>,
    pub repeat_first: Option<bool>,
    pub strategy: Option<ClipStrategy>,
}

/// GET /api/sheet - Current selection, layout and cells.
pub async fn show(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SheetSummary>, (StatusCode, String)> {
    let sheet = state.sheet.read().await;
    sheet.summary().map(Json).map_err(reject)
}

/// PUT /api/sheet - Change sizes and render options.
///
/// Sizes are validated before anything is applied, so a bad name leaves the
/// sheet untouched.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SheetUpdate>,
) -> Result<Json<SheetSummary>, (StatusCode, String)> {
    let paper = update
        .paper
        .as_deref()
        .map(str::parse::<PaperSize>)
        .transpose()
        .map_err(reject)?;
    let card = update
        .card
        .as_deref()
        .map(str::parse::<CardSize>)
        .transpose()
        .map_err(reject)?;

    let mut sheet = state.sheet.write().await;
    if paper.is_some() || card.is_some() {
        let paper = paper.unwrap_or(sheet.paper());
        let card = card.unwrap_or(sheet.card());
        sheet.set_sizes(paper, card).map_err(reject)?;
    }
    if let Some(alignment) = update.alignment {
        sheet.options.alignment = alignment;
    }
    if let Some(repeat_first) = update.repeat_first {
        sheet.options.repeat_first = repeat_first;
    }
    if let Some(strategy) = update.strategy {
        sheet.options.strategy = strategy;
    }

    sheet.summary().map(Json).map_err(reject)
}
