//! Drawing surfaces.
//!
//! The renderer only needs a handful of primitives: start a page, fill or
//! stroke a rectangle, blit an image into a rectangle, and serialize the
//! result. Coordinates are sheet millimeters (top-left origin).
//!
//! | Surface | Output |
//! |---------|--------|
//! | [`RecordingSurface`] | JSON log of draw operations |
//! | [`PdfSurface`](crate::pdf::PdfSurface) | PDF document |
//! | [`PreviewSurface`](crate::preview::PreviewSurface) | PNG raster |

use image::DynamicImage;
use serde::Serialize;

use crate::error::PrintardError;
use crate::geometry::{Dimensions, Rect, Rgb};

/// Primitive drawing target. Surfaces cannot clip.
pub trait DrawingSurface {
    /// Start a new page of the given paper size.
    fn begin_page(&mut self, paper: Dimensions) -> Result<(), PrintardError>;

    /// Solid fill.
    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// Outline with a line width in millimeters.
    fn stroke_rect(&mut self, rect: Rect, color: Rgb, width_mm: f32);

    /// Draw `image` stretched to exactly `rect`.
    fn draw_image(&mut self, image: &DynamicImage, rect: Rect) -> Result<(), PrintardError>;

    /// Serialize everything drawn so far.
    fn finish(self) -> Result<Vec<u8>, PrintardError>
    where
        Self: Sized;
}

/// One recorded primitive call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    BeginPage {
        paper: Dimensions,
    },
    FillRect {
        rect: Rect,
        color: Rgb,
    },
    StrokeRect {
        rect: Rect,
        color: Rgb,
        width_mm: f32,
    },
    DrawImage {
        rect: Rect,
        pixel_width: u32,
        pixel_height: u32,
    },
}

/// Surface that records calls instead of drawing.
///
/// `finish` serializes the log as pretty JSON.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawingSurface for RecordingSurface {
    fn begin_page(&mut self, paper: Dimensions) -> Result<(), PrintardError> {
        self.ops.push(DrawOp::BeginPage { paper });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb, width_mm: f32) {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            color,
            width_mm,
        });
    }

    fn draw_image(&mut self, image: &DynamicImage, rect: Rect) -> Result<(), PrintardError> {
        self.ops.push(DrawOp::DrawImage {
            rect,
            pixel_width: image.width(),
            pixel_height: image.height(),
        });
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, PrintardError> {
        serde_json::to_vec_pretty(&self.ops)
            .map_err(|e| PrintardError::Serialization(format!("Failed to encode plan: {}", e)))
    }
}
