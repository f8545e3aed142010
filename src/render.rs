//! # Sheet Renderer
//!
//! Walks a solved grid in row-major order and issues draw calls for every
//! cell against a [`DrawingSurface`]:
//!
//! 1. load the cell's effective image (awaited, one cell at a time)
//! 2. cover-fit it into the cell ([`fit_cover`])
//! 3. draw the image, then paint the overflow masks in the background color
//! 4. stroke the cell border last so nothing covers it
//!
//! A cell whose image fails to load or draw is logged and reported; the rest
//! of the sheet still renders.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::PrintardError;
use crate::fit::{Alignment, aspect_ratio, fit_cover};
use crate::geometry::{Rect, Rgb};
use crate::grid::{CardGrid, cell_id};
use crate::layout::GridLayout;
use crate::source::{ImageLoader, ImageSource};
use crate::surface::DrawingSurface;

/// How overflow outside a cell is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipStrategy {
    /// Draw the full image, then paint mask rectangles over the overflow.
    #[default]
    Mask,
    /// Crop the decoded pixels to the visible window and draw only that.
    ///
    /// Use when neighbouring cells are closer than the overflow, where masks
    /// of one cell would paint over the next.
    CropSource,
}

/// Rendering knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub alignment: Alignment,
    pub repeat_first: bool,
    /// Paper color, used for masks.
    pub background: Rgb,
    pub border_color: Rgb,
    pub border_width_mm: f32,
    pub strategy: ClipStrategy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            alignment: Alignment::Center,
            repeat_first: false,
            background: Rgb::WHITE,
            border_color: Rgb::GUIDE,
            border_width_mm: 0.2,
            strategy: ClipStrategy::Mask,
        }
    }
}

/// A cell that could not be drawn.
#[derive(Debug, Clone, Serialize)]
pub struct CellFailure {
    pub index: usize,
    pub id: String,
    pub error: String,
}

/// Summary of one render pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderReport {
    /// Cells visited (bordered).
    pub cells: usize,
    /// Cells with an image drawn.
    pub drawn: usize,
    /// Cells whose masks reach past the gap into neighbouring cells.
    pub spilled_masks: usize,
    pub failures: Vec<CellFailure>,
}

/// Most recently decoded image, reused while consecutive cells share a
/// source (always the case with RepeatFirst).
#[derive(Default)]
struct DecodeCache {
    last: Option<(ImageSource, Arc<DynamicImage>)>,
}

impl DecodeCache {
    async fn get<L: ImageLoader + ?Sized>(
        &mut self,
        source: &ImageSource,
        loader: &L,
    ) -> Result<Arc<DynamicImage>, PrintardError> {
        if let Some((cached, image)) = &self.last {
            if cached.same_as(source) {
                return Ok(image.clone());
            }
        }
        let image = Arc::new(loader.load(source).await?);
        self.last = Some((source.clone(), image.clone()));
        Ok(image)
    }
}

/// Render one sheet onto `surface`.
///
/// Starts a page of the layout's paper size. Only surface-level failures
/// (starting the page) are returned as errors; per-cell failures end up in
/// the report.
pub async fn render_sheet<S, L>(
    layout: &GridLayout,
    grid: &CardGrid,
    options: &RenderOptions,
    loader: &L,
    surface: &mut S,
) -> Result<RenderReport, PrintardError>
where
    S: DrawingSurface,
    L: ImageLoader + ?Sized,
{
    if grid.len() != layout.total_cells {
        tracing::warn!(
            grid = grid.len(),
            layout = layout.total_cells,
            "grid length does not match layout; cells past the grid render empty"
        );
    }

    surface.begin_page(layout.paper)?;

    let mut report = RenderReport::default();
    let mut cache = DecodeCache::default();
    let gaps = (layout.spacing_x, layout.spacing_y);

    for row in 0..layout.rows {
        for col in 0..layout.columns {
            let index = row * layout.columns + col;
            let rect = layout.cell_rect_at(row, col);

            if let Some(source) = grid.effective_image(index, options.repeat_first) {
                match draw_cell(source, rect, gaps, options, loader, &mut cache, surface).await {
                    Ok(spilled) => {
                        report.drawn += 1;
                        if spilled {
                            report.spilled_masks += 1;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(cell = index, source = %source.describe(), "skipping cell: {}", e);
                        report.failures.push(CellFailure {
                            index,
                            id: cell_id(index),
                            error: e.to_string(),
                        });
                    }
                }
            }

            surface.stroke_rect(rect, options.border_color, options.border_width_mm);
            report.cells += 1;
        }
    }

    if report.spilled_masks > 0 {
        tracing::warn!(
            cells = report.spilled_masks,
            "overflow masks cover neighbouring cards; use the crop_source strategy to keep them"
        );
    }

    tracing::info!(
        cells = report.cells,
        drawn = report.drawn,
        failed = report.failures.len(),
        "sheet rendered"
    );
    Ok(report)
}

/// Load, fit and draw one cell's image with its masks.
///
/// Returns whether masks were painted past the gaps around the cell.
async fn draw_cell<S, L>(
    source: &ImageSource,
    cell: Rect,
    gaps: (f32, f32),
    options: &RenderOptions,
    loader: &L,
    cache: &mut DecodeCache,
    surface: &mut S,
) -> Result<bool, PrintardError>
where
    S: DrawingSurface,
    L: ImageLoader + ?Sized,
{
    let image = cache.get(source, loader).await?;
    let aspect = aspect_ratio(image.width(), image.height())?;
    let placement = fit_cover(aspect, cell, options.alignment)?;

    match options.strategy {
        ClipStrategy::Mask => {
            surface.draw_image(&image, placement.draw)?;
            for mask in &placement.masks {
                surface.fill_rect(*mask, options.background);
            }
            Ok(placement.overflow.exceeds_gap(gaps.0, gaps.1))
        }
        ClipStrategy::CropSource => {
            let crop = placement.source_crop(image.width(), image.height());
            let visible = image.crop_imm(crop.x, crop.y, crop.width, crop.height);
            surface.draw_image(&visible, cell)?;
            Ok(false)
        }
    }
}
