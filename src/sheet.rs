//! Designer state for one sheet: selected sizes, render options and cells.
//!
//! The layout is never stored. Every size change re-solves it and, when the
//! cell count differs, resizes the grid explicitly before returning, so a
//! reader never sees a grid that disagrees with the current sizes.

use serde::Serialize;

use crate::catalog::{CardSize, PaperSize};
use crate::error::PrintardError;
use crate::grid::{CardGrid, CellView};
use crate::layout::{self, GridLayout, MIN_MARGIN_MM};
use crate::render::RenderOptions;
use crate::source::ImageSource;

/// Sheet being designed.
#[derive(Debug, Clone)]
pub struct Sheet {
    paper: PaperSize,
    card: CardSize,
    margin: f32,
    grid: CardGrid,
    pub options: RenderOptions,
}

/// Serializable snapshot for APIs.
#[derive(Debug, Clone, Serialize)]
pub struct SheetSummary {
    pub paper: PaperSize,
    pub card: CardSize,
    pub card_label: &'static str,
    pub layout: GridLayout,
    pub options: RenderOptions,
    pub has_images: bool,
    pub cells: Vec<CellView>,
}

impl Sheet {
    /// Sheet with the default margin.
    pub fn new(paper: PaperSize, card: CardSize) -> Result<Self, PrintardError> {
        Self::with_margin(paper, card, MIN_MARGIN_MM)
    }

    pub fn with_margin(
        paper: PaperSize,
        card: CardSize,
        margin: f32,
    ) -> Result<Self, PrintardError> {
        let layout = layout::solve(paper.dimensions(), card.dimensions(), margin)?;
        Ok(Self {
            paper,
            card,
            margin,
            grid: CardGrid::with_len(layout.total_cells),
            options: RenderOptions::default(),
        })
    }

    pub fn paper(&self) -> PaperSize {
        self.paper
    }

    pub fn card(&self) -> CardSize {
        self.card
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn grid(&self) -> &CardGrid {
        &self.grid
    }

    /// Solve the layout for the current sizes.
    pub fn layout(&self) -> Result<GridLayout, PrintardError> {
        layout::solve(self.paper.dimensions(), self.card.dimensions(), self.margin)
    }

    pub fn set_paper(&mut self, paper: PaperSize) -> Result<GridLayout, PrintardError> {
        self.set_sizes(paper, self.card)
    }

    pub fn set_card(&mut self, card: CardSize) -> Result<GridLayout, PrintardError> {
        self.set_sizes(self.paper, card)
    }

    /// Change both sizes at once and resize the grid to the new cell count.
    ///
    /// On error nothing changes.
    pub fn set_sizes(
        &mut self,
        paper: PaperSize,
        card: CardSize,
    ) -> Result<GridLayout, PrintardError> {
        let layout = layout::solve(paper.dimensions(), card.dimensions(), self.margin)?;
        self.paper = paper;
        self.card = card;
        if self.grid.len() != layout.total_cells {
            tracing::debug!(
                from = self.grid.len(),
                to = layout.total_cells,
                "resizing grid"
            );
            self.grid.resize(layout.total_cells);
        }
        Ok(layout)
    }

    pub fn set_image(&mut self, cell_id: &str, image: ImageSource) -> bool {
        self.grid.set_image(cell_id, image)
    }

    pub fn clear_image(&mut self, cell_id: &str) -> bool {
        self.grid.clear_image(cell_id)
    }

    pub fn clear_all(&mut self) {
        self.grid.clear_all();
    }

    /// Image shown at `index`, honoring the RepeatFirst option.
    pub fn effective_image(&self, index: usize) -> Option<&ImageSource> {
        self.grid.effective_image(index, self.options.repeat_first)
    }

    /// Deterministic export filename for this paper/card pair.
    pub fn export_filename(&self, extension: &str) -> String {
        export_filename(self.paper, self.card, extension)
    }

    pub fn summary(&self) -> Result<SheetSummary, PrintardError> {
        Ok(SheetSummary {
            paper: self.paper,
            card: self.card,
            card_label: self.card.label(),
            layout: self.layout()?,
            options: self.options,
            has_images: self.grid.has_images(),
            cells: self.grid.views(self.options.repeat_first),
        })
    }
}

impl Default for Sheet {
    fn default() -> Self {
        let layout = layout::solve(
            PaperSize::default().dimensions(),
            CardSize::default().dimensions(),
            MIN_MARGIN_MM,
        );
        Self {
            paper: PaperSize::default(),
            card: CardSize::default(),
            margin: MIN_MARGIN_MM,
            grid: CardGrid::with_len(layout.map(|l| l.total_cells).unwrap_or(1)),
            options: RenderOptions::default(),
        }
    }
}

/// `layout-cards-{paper}-{card}.{extension}`
pub fn export_filename(paper: PaperSize, card: CardSize, extension: &str) -> String {
    format!("layout-cards-{}-{}.{}", paper.name(), card.name(), extension)
}
