//! # Grid Layout Solver
//!
//! Derives how many cards fit on a sheet and how the leftover space is spread
//! around them.
//!
//! ## Algorithm
//!
//! Per axis, independently:
//!
//! ```text
//! span    = paper - 2 * margin
//! count   = max(1, floor(span / card))
//! spacing = (span - count * card) / (count + 1)
//! ```
//!
//! The leftover is split into `count + 1` equal gaps, so the first card is
//! inset from the margin by the same gap that separates neighbours:
//!
//! ```text
//! │margin│gap│ card │gap│ card │gap│ card │gap│margin│
//! ```
//!
//! A card larger than the span still yields one cell; its spacing is then
//! negative and is left that way.
//!
//! ## Example
//!
//! ```
//! use printard::catalog::{CardSize, PaperSize};
//! use printard::layout::{solve, MIN_MARGIN_MM};
//!
//! let layout = solve(
//!     PaperSize::A4.dimensions(),
//!     CardSize::Poker.dimensions(),
//!     MIN_MARGIN_MM,
//! )?;
//! assert_eq!((layout.columns, layout.rows), (3, 3));
//! assert_eq!(layout.total_cells, 9);
//! # Ok::<(), printard::PrintardError>(())
//! ```

use serde::Serialize;

use crate::error::PrintardError;
use crate::geometry::{Dimensions, Rect};

/// Default inset from the paper edge in millimeters.
pub const MIN_MARGIN_MM: f32 = 10.0;

/// Solved grid for one paper/card combination.
///
/// Always recomputed from its inputs; nothing caches it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    pub total_cells: usize,
    /// Horizontal gap before, between and after cards (may be negative).
    pub spacing_x: f32,
    /// Vertical gap before, between and after cards (may be negative).
    pub spacing_y: f32,
    pub margin: f32,
    pub paper: Dimensions,
    pub card: Dimensions,
}

/// Solve the grid for a paper sheet and card size.
///
/// Fails with [`PrintardError::InvalidDimension`] when a paper or card side is
/// not a positive finite number, or the margin is negative.
pub fn solve(
    paper: Dimensions,
    card: Dimensions,
    min_margin: f32,
) -> Result<GridLayout, PrintardError> {
    if !paper.is_valid() {
        return Err(PrintardError::InvalidDimension(format!(
            "paper {}×{}mm",
            paper.width, paper.height
        )));
    }
    if !card.is_valid() {
        return Err(PrintardError::InvalidDimension(format!(
            "card {}×{}mm",
            card.width, card.height
        )));
    }
    if !min_margin.is_finite() || min_margin < 0.0 {
        return Err(PrintardError::InvalidDimension(format!(
            "margin {}mm",
            min_margin
        )));
    }

    let (columns, spacing_x) = solve_axis(paper.width, card.width, min_margin);
    let (rows, spacing_y) = solve_axis(paper.height, card.height, min_margin);

    tracing::debug!(
        columns,
        rows,
        spacing_x,
        spacing_y,
        "solved {}×{} grid",
        columns,
        rows
    );

    Ok(GridLayout {
        columns,
        rows,
        total_cells: columns * rows,
        spacing_x,
        spacing_y,
        margin: min_margin,
        paper,
        card,
    })
}

/// Count and gap for one axis.
fn solve_axis(paper: f32, card: f32, margin: f32) -> (usize, f32) {
    let span = paper - 2.0 * margin;
    let count = if span <= 0.0 {
        1
    } else {
        ((span / card).floor() as usize).max(1)
    };
    let spacing = (span - count as f32 * card) / (count as f32 + 1.0);
    (count, spacing)
}

impl GridLayout {
    /// Rectangle of the cell at `(row, col)`.
    pub fn cell_rect_at(&self, row: usize, col: usize) -> Rect {
        let x = self.margin + col as f32 * (self.card.width + self.spacing_x) + self.spacing_x;
        let y = self.margin + row as f32 * (self.card.height + self.spacing_y) + self.spacing_y;
        Rect::new(x, y, self.card.width, self.card.height)
    }

    /// Rectangle of the cell at a row-major index, or `None` past the grid.
    pub fn cell_rect(&self, index: usize) -> Option<Rect> {
        if index >= self.total_cells {
            return None;
        }
        Some(self.cell_rect_at(index / self.columns, index % self.columns))
    }

    /// All cell rectangles in row-major order (row 0 first, column 0 first).
    pub fn cells(&self) -> impl Iterator<Item = Rect> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.columns).map(move |col| self.cell_rect_at(row, col)))
    }

    /// True when both spacings are non-negative.
    pub fn fits(&self) -> bool {
        self.spacing_x >= 0.0 && self.spacing_y >= 0.0
    }
}
