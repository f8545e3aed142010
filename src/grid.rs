//! Card grid model: the ordered cells of one sheet and their images.
//!
//! The grid never resizes itself. Whoever observes a new
//! [`GridLayout`](crate::layout::GridLayout) calls [`CardGrid::resize`] with
//! its `total_cells`; images survive by positional index.

use serde::Serialize;

use crate::source::ImageSource;

/// One card-sized slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Stable id, `card-{index}`.
    pub id: String,
    pub image: Option<ImageSource>,
}

/// Id of the cell at `index`.
pub fn cell_id(index: usize) -> String {
    format!("card-{}", index)
}

/// Serializable summary of a cell for APIs and plans.
#[derive(Debug, Clone, Serialize)]
pub struct CellView {
    pub id: String,
    pub occupied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Ordered cells of a sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardGrid {
    cells: Vec<Cell>,
}

impl CardGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid of `total_cells` empty cells.
    pub fn with_len(total_cells: usize) -> Self {
        let mut grid = Self::new();
        grid.resize(total_cells);
        grid
    }

    /// Rebuild to exactly `total_cells` cells.
    ///
    /// Index `i` keeps its image if it existed before; images past the new
    /// length are dropped. Resizing to the current length changes nothing.
    pub fn resize(&mut self, total_cells: usize) {
        if self.cells.len() == total_cells {
            return;
        }
        let mut previous = std::mem::take(&mut self.cells).into_iter();
        self.cells = (0..total_cells)
            .map(|i| Cell {
                id: cell_id(i),
                image: previous.next().and_then(|c| c.image),
            })
            .collect();
    }

    /// Set the image of the cell with `cell_id`.
    ///
    /// Returns false (and changes nothing) when no cell has that id.
    pub fn set_image(&mut self, cell_id: &str, image: ImageSource) -> bool {
        match self.cells.iter_mut().find(|c| c.id == cell_id) {
            Some(cell) => {
                cell.image = Some(image);
                true
            }
            None => false,
        }
    }

    /// Unset the image of one cell. Returns false when no cell has that id.
    pub fn clear_image(&mut self, cell_id: &str) -> bool {
        match self.cells.iter_mut().find(|c| c.id == cell_id) {
            Some(cell) => {
                cell.image = None;
                true
            }
            None => false,
        }
    }

    /// Unset every image. The number of cells is unchanged.
    pub fn clear_all(&mut self) {
        for cell in &mut self.cells {
            cell.image = None;
        }
    }

    /// Image shown at `index`.
    ///
    /// With `repeat_first`, every index shows the first cell's image; stored
    /// images of other cells are left untouched. Indices past the grid have
    /// no image either way.
    pub fn effective_image(&self, index: usize, repeat_first: bool) -> Option<&ImageSource> {
        let cell = self.cells.get(index)?;
        if repeat_first {
            return self.cells[0].image.as_ref();
        }
        cell.image.as_ref()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if any cell has a stored image.
    pub fn has_images(&self) -> bool {
        self.cells.iter().any(|c| c.image.is_some())
    }

    /// Summaries of the effective state of every cell.
    pub fn views(&self, repeat_first: bool) -> Vec<CellView> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let image = self.effective_image(i, repeat_first);
                CellView {
                    id: cell.id.clone(),
                    occupied: image.is_some(),
                    source: image.map(ImageSource::describe),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn img(tag: u8) -> ImageSource {
        ImageSource::from_bytes(vec![tag])
    }

    #[test]
    fn test_resize_assigns_ids() {
        let grid = CardGrid::with_len(4);
        let ids: Vec<&str> = grid.cells().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["card-0", "card-1", "card-2", "card-3"]);
        assert!(!grid.has_images());
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut grid = CardGrid::with_len(4);
        grid.set_image("card-1", img(1));
        grid.resize(6);
        let once = grid.clone();
        grid.resize(6);
        assert_eq!(grid, once);
    }

    #[test]
    fn test_resize_preserves_images_when_growing() {
        let mut grid = CardGrid::with_len(4);
        grid.set_image("card-0", img(0));
        grid.set_image("card-3", img(3));
        grid.resize(9);
        assert_eq!(grid.len(), 9);
        assert_eq!(grid.cells()[0].image, Some(img(0)));
        assert_eq!(grid.cells()[3].image, Some(img(3)));
        assert!(grid.cells()[4..].iter().all(|c| c.image.is_none()));
    }

    #[test]
    fn test_resize_drops_images_past_new_length() {
        let mut grid = CardGrid::with_len(9);
        grid.set_image("card-1", img(1));
        grid.set_image("card-8", img(8));
        grid.resize(4);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.cells()[1].image, Some(img(1)));
        grid.resize(9);
        assert_eq!(grid.cells()[8].image, None);
    }

    #[test]
    fn test_set_image_unknown_id_is_noop() {
        let mut grid = CardGrid::with_len(2);
        let before = grid.clone();
        assert!(!grid.set_image("card-7", img(7)));
        assert!(!grid.set_image("bogus", img(7)));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_clear_all_keeps_length() {
        let mut grid = CardGrid::with_len(3);
        grid.set_image("card-0", img(0));
        grid.set_image("card-2", img(2));
        grid.clear_all();
        assert_eq!(grid.len(), 3);
        assert!(!grid.has_images());
    }

    #[test]
    fn test_clear_single_image() {
        let mut grid = CardGrid::with_len(3);
        grid.set_image("card-2", img(2));
        assert!(grid.clear_image("card-2"));
        assert!(!grid.clear_image("card-9"));
        assert!(!grid.has_images());
    }

    #[test]
    fn test_effective_image_without_repeat() {
        let mut grid = CardGrid::with_len(4);
        grid.set_image("card-2", img(2));
        assert_eq!(grid.effective_image(2, false), Some(&img(2)));
        assert_eq!(grid.effective_image(0, false), None);
        assert_eq!(grid.effective_image(10, false), None);
    }

    #[test]
    fn test_effective_image_repeat_first() {
        let mut grid = CardGrid::with_len(4);
        grid.set_image("card-0", img(0));
        grid.set_image("card-3", img(3));
        for i in 0..4 {
            assert_eq!(grid.effective_image(i, true), Some(&img(0)));
        }
        // Stored data of other cells is untouched
        assert_eq!(grid.cells()[3].image, Some(img(3)));

        assert_eq!(grid.effective_image(4, true), None);

        grid.clear_all();
        for i in 0..4 {
            assert_eq!(grid.effective_image(i, true), None);
        }
    }

    #[test]
    fn test_effective_image_repeat_first_on_empty_grid() {
        let grid = CardGrid::new();
        assert_eq!(grid.effective_image(0, true), None);
    }

    #[test]
    fn test_views() {
        let mut grid = CardGrid::with_len(2);
        grid.set_image("card-1", img(1));
        let views = grid.views(false);
        assert!(!views[0].occupied);
        assert!(views[1].occupied);
        assert_eq!(views[1].source.as_deref(), Some("1 bytes"));
        assert!(grid.views(true).iter().all(|v| !v.occupied));
    }
}
