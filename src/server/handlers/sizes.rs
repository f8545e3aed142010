//! Catalog API handler.

use axum::Json;
use serde::Serialize;

use crate::catalog::{list_cards, list_papers};
use crate::fit::Alignment;

/// One catalog entry.
#[derive(Debug, Serialize)]
pub struct SizeInfo {
    pub name: &'static str,
    pub label: String,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct SizesResponse {
    pub papers: Vec<SizeInfo>,
    pub cards: Vec<SizeInfo>,
    pub alignments: Vec<&'static str>,
}

/// GET /api/sizes - Paper and card catalog.
pub async fn list() -> Json<SizesResponse> {
    let papers = list_papers()
        .iter()
        .map(|p| SizeInfo {
            name: p.name(),
            label: p.label(),
            width: p.dimensions().width,
            height: p.dimensions().height,
        })
        .collect();
    let cards = list_cards()
        .iter()
        .map(|c| SizeInfo {
            name: c.name(),
            label: c.label().to_string(),
            width: c.dimensions().width,
            height: c.dimensions().height,
        })
        .collect();
    let alignments = [Alignment::Top, Alignment::Center, Alignment::Bottom]
        .iter()
        .map(|a| a.name())
        .collect();

    Json(SizesResponse {
        papers,
        cards,
        alignments,
    })
}
