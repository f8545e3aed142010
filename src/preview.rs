//! Raster PNG preview surface.
//!
//! Rasterizes the same draw calls as the PDF surface onto an RGB canvas at a
//! chosen resolution. Multiple pages are stacked top to bottom in one PNG.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

use crate::error::PrintardError;
use crate::geometry::{Dimensions, Rect, Rgb};
use crate::surface::DrawingSurface;

/// Default preview resolution.
pub const DEFAULT_PREVIEW_DPI: f32 = 100.0;

/// Highest accepted preview resolution.
pub const MAX_PREVIEW_DPI: f32 = 600.0;

/// PNG preview surface.
pub struct PreviewSurface {
    px_per_mm: f32,
    pages: Vec<RgbImage>,
}

impl PreviewSurface {
    /// Surface at `dpi`, clamped to `1..=MAX_PREVIEW_DPI`.
    pub fn new(dpi: f32) -> Self {
        let dpi = if dpi.is_finite() {
            dpi.clamp(1.0, MAX_PREVIEW_DPI)
        } else {
            DEFAULT_PREVIEW_DPI
        };
        Self {
            px_per_mm: dpi / 25.4,
            pages: Vec::new(),
        }
    }

    fn px(&self, mm: f32) -> i64 {
        (mm * self.px_per_mm).round() as i64
    }

    /// Current page, if any.
    pub fn canvas(&self) -> Option<&RgbImage> {
        self.pages.last()
    }

    /// Fill the pixel box `[x0, x1) x [y0, y1)`, clipped to the canvas.
    fn fill_px(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb) {
        let Some(canvas) = self.pages.last_mut() else {
            return;
        };
        let (w, h) = (canvas.width() as i64, canvas.height() as i64);
        let pixel = image::Rgb([color.0, color.1, color.2]);
        for y in y0.max(0)..y1.min(h) {
            for x in x0.max(0)..x1.min(w) {
                canvas.put_pixel(x as u32, y as u32, pixel);
            }
        }
    }
}

/// Source pixels `(start, len)` behind the visible part `visible` of a
/// placement spanning `placed`, both in canvas pixels along one axis.
fn source_span(size: u32, placed: (i64, i64), visible: (i64, i64)) -> (u32, u32) {
    let scale = size as f64 / (placed.1 - placed.0).max(1) as f64;
    let from = (((visible.0 - placed.0) as f64 * scale).floor() as u32).min(size - 1);
    let to = (((visible.1 - placed.0) as f64 * scale).ceil() as u32).clamp(from + 1, size);
    (from, to - from)
}

impl Default for PreviewSurface {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_DPI)
    }
}

impl DrawingSurface for PreviewSurface {
    fn begin_page(&mut self, paper: Dimensions) -> Result<(), PrintardError> {
        let width = self.px(paper.width).max(1) as u32;
        let height = self.px(paper.height).max(1) as u32;
        self.pages
            .push(RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255])));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let (x0, y0) = (self.px(rect.x), self.px(rect.y));
        let (x1, y1) = (self.px(rect.right()), self.px(rect.bottom()));
        self.fill_px(x0, y0, x1, y1, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb, width_mm: f32) {
        let t = self.px(width_mm).max(1);
        let (x0, y0) = (self.px(rect.x), self.px(rect.y));
        let (x1, y1) = (self.px(rect.right()), self.px(rect.bottom()));
        self.fill_px(x0, y0, x1, y0 + t, color);
        self.fill_px(x0, y1 - t, x1, y1, color);
        self.fill_px(x0, y0, x0 + t, y1, color);
        self.fill_px(x1 - t, y0, x1, y1, color);
    }

    fn draw_image(&mut self, image: &DynamicImage, rect: Rect) -> Result<(), PrintardError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(PrintardError::ImageDecode("image has no pixels".to_string()));
        }
        let (x0, y0) = (self.px(rect.x), self.px(rect.y));
        let (x1, y1) = (self.px(rect.right()), self.px(rect.bottom()));
        let canvas = self
            .pages
            .last_mut()
            .ok_or_else(|| PrintardError::Serialization("no page started".to_string()))?;

        // Only the part of the rect that lands on the canvas is resampled
        let (vx0, vy0) = (x0.max(0), y0.max(0));
        let (vx1, vy1) = (x1.min(canvas.width() as i64), y1.min(canvas.height() as i64));
        if vx1 <= vx0 || vy1 <= vy0 {
            return Ok(());
        }

        let (sx, sw) = source_span(image.width(), (x0, x1), (vx0, vx1));
        let (sy, sh) = source_span(image.height(), (y0, y1), (vy0, vy1));
        let resized = image
            .crop_imm(sx, sy, sw, sh)
            .resize_exact((vx1 - vx0) as u32, (vy1 - vy0) as u32, FilterType::Triangle)
            .to_rgb8();
        imageops::overlay(canvas, &resized, vx0, vy0);
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, PrintardError> {
        if self.pages.is_empty() {
            return Err(PrintardError::Serialization("preview has no pages".to_string()));
        }
        let width = self.pages.iter().map(|p| p.width()).max().unwrap_or(1);
        let height = self.pages.iter().map(|p| p.height()).sum();
        let mut sheet = RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
        let mut offset = 0i64;
        for page in &self.pages {
            imageops::replace(&mut sheet, page, 0, offset);
            offset += page.height() as i64;
        }

        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(sheet)
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| PrintardError::Serialization(format!("Failed to encode PNG: {}", e)))?;
        Ok(out.into_inner())
    }
}
