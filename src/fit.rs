//! # Cover Fit
//!
//! Places an image of any aspect ratio over a card cell so that the cell is
//! completely filled without distortion. The overflowing part is reported as
//! per-side overflow plus opaque mask rectangles, because the drawing surfaces
//! cannot clip: the renderer draws the image, then paints the masks over the
//! overflow in the background color.
//!
//! ## Fitting
//!
//! ```text
//! image wider than cell         image taller than cell
//! (fit height, crop sides)      (fit width, crop top/bottom)
//!
//!  ┌──┬────────┬──┐                 ┌────────┐  <- top mask
//!  │▓▓│  cell  │▓▓│                 ├────────┤
//!  │▓▓│        │▓▓│                 │  cell  │
//!  └──┴────────┴──┘                 ├────────┤
//!   ^            ^                  └────────┘  <- bottom mask
//!   left/right masks
//! ```
//!
//! Horizontal overflow is always split evenly. Vertical overflow follows the
//! [`Alignment`]: `Top` keeps the top edge and crops the bottom, `Bottom`
//! keeps the bottom edge, `Center` splits it.
//!
//! ## Example
//!
//! ```
//! use printard::fit::{fit_cover, Alignment};
//! use printard::geometry::Rect;
//!
//! let cell = Rect::new(0.0, 0.0, 63.0, 88.0);
//! let placement = fit_cover(2.0, cell, Alignment::Top)?;
//! assert_eq!(placement.draw.width, 176.0);
//! assert_eq!(placement.overflow.left, 56.5);
//! assert_eq!(placement.masks.len(), 2);
//! # Ok::<(), printard::PrintardError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PrintardError;
use crate::geometry::Rect;

/// Overflow smaller than this (in mm) counts as none.
const OVERFLOW_EPSILON: f32 = 1e-4;

/// Vertical anchor of an image taller than its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Top,
    #[default]
    Center,
    Bottom,
}

impl Alignment {
    pub fn name(&self) -> &'static str {
        match self {
            Alignment::Top => "top",
            Alignment::Center => "center",
            Alignment::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Alignment {
    type Err = PrintardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(Alignment::Top),
            "center" | "middle" => Ok(Alignment::Center),
            "bottom" => Ok(Alignment::Bottom),
            other => Err(PrintardError::Job(format!(
                "unknown alignment '{}' (expected top, center or bottom)",
                other
            ))),
        }
    }
}

/// How far the drawn image extends past each cell edge, in mm.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Overflow {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Overflow {
    pub fn is_none(&self) -> bool {
        self.left == 0.0 && self.right == 0.0 && self.top == 0.0 && self.bottom == 0.0
    }

    /// True if overflow on some side is wider than the gap to the next cell
    /// on that axis, so a mask there would paint over a neighbour.
    pub fn exceeds_gap(&self, gap_x: f32, gap_y: f32) -> bool {
        if self.is_none() {
            return false;
        }
        self.left.max(self.right) > gap_x.max(0.0) || self.top.max(self.bottom) > gap_y.max(0.0)
    }
}

/// Result of fitting one image into one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub cell: Rect,
    /// Where the whole image is drawn (contains the cell).
    pub draw: Rect,
    pub overflow: Overflow,
    /// Opaque rectangles covering the overflow, in left, right, top, bottom
    /// order; sides without overflow are omitted.
    pub masks: Vec<Rect>,
}

/// Aspect ratio of an image in pixels.
pub fn aspect_ratio(width: u32, height: u32) -> Result<f32, PrintardError> {
    let aspect = width as f32 / height as f32;
    if width == 0 || height == 0 || !aspect.is_finite() {
        return Err(PrintardError::DegenerateAspect(aspect));
    }
    Ok(aspect)
}

/// Cover-fit an image with `image_aspect` (width / height) into `cell`.
///
/// Fails with [`PrintardError::DegenerateAspect`] for a non-positive or
/// non-finite aspect; callers treat that cell as having no image.
pub fn fit_cover(
    image_aspect: f32,
    cell: Rect,
    alignment: Alignment,
) -> Result<Placement, PrintardError> {
    if !image_aspect.is_finite() || image_aspect <= 0.0 {
        return Err(PrintardError::DegenerateAspect(image_aspect));
    }
    if !cell.size().is_valid() {
        return Err(PrintardError::InvalidDimension(format!(
            "cell {}×{}mm",
            cell.width, cell.height
        )));
    }

    let cell_aspect = cell.size().aspect();
    let (draw_width, draw_height) = if image_aspect > cell_aspect {
        (cell.height * image_aspect, cell.height)
    } else {
        (cell.width, cell.width / image_aspect)
    };

    let draw_x = cell.x + (cell.width - draw_width) / 2.0;
    let draw_y = match alignment {
        Alignment::Top => cell.y,
        Alignment::Bottom => cell.y + (cell.height - draw_height),
        Alignment::Center => cell.y + (cell.height - draw_height) / 2.0,
    };
    let draw = Rect::new(draw_x, draw_y, draw_width, draw_height);

    let overflow = Overflow {
        left: excess(cell.x - draw.x),
        right: excess(draw.right() - cell.right()),
        top: excess(cell.y - draw.y),
        bottom: excess(draw.bottom() - cell.bottom()),
    };

    let mut masks = Vec::with_capacity(2);
    if overflow.left > 0.0 {
        masks.push(Rect::new(draw.x, draw.y, overflow.left, draw.height));
    }
    if overflow.right > 0.0 {
        masks.push(Rect::new(cell.right(), draw.y, overflow.right, draw.height));
    }
    if overflow.top > 0.0 {
        masks.push(Rect::new(draw.x, draw.y, draw.width, overflow.top));
    }
    if overflow.bottom > 0.0 {
        masks.push(Rect::new(draw.x, cell.bottom(), draw.width, overflow.bottom));
    }

    Ok(Placement {
        cell,
        draw,
        overflow,
        masks,
    })
}

fn excess(amount: f32) -> f32 {
    if amount > OVERFLOW_EPSILON { amount } else { 0.0 }
}

/// Pixel window of the source image that ends up inside the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCrop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Map the visible part of the draw rectangle back to source pixels.
    pub fn source_crop(&self, image_width: u32, image_height: u32) -> SourceCrop {
        let scale_x = image_width as f32 / self.draw.width;
        let scale_y = image_height as f32 / self.draw.height;

        let x = ((self.overflow.left * scale_x).round() as u32).min(image_width.saturating_sub(1));
        let y = ((self.overflow.top * scale_y).round() as u32).min(image_height.saturating_sub(1));
        let width = ((self.cell.width * scale_x).round() as u32)
            .clamp(1, image_width.saturating_sub(x).max(1));
        let height = ((self.cell.height * scale_y).round() as u32)
            .clamp(1, image_height.saturating_sub(y).max(1));

        SourceCrop {
            x,
            y,
            width,
            height,
        }
    }
}
