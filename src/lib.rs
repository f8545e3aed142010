//! # Printard - Card Sheet Layout Library
//!
//! Printard lays out uniform cards on a paper sheet and renders a print-ready
//! document. It provides:
//!
//! - **Layout solving**: rows, columns and even spacing under a minimum margin
//! - **Cover fitting**: scale any image to fill a card, aligned top, center or
//!   bottom, with overflow masked or cropped
//! - **Surfaces**: PDF (printpdf), PNG preview, and a recording surface
//! - **Server**: an HTTP API for building a sheet interactively
//!
//! ## Quick Start
//!
//! ```no_run
//! use printard::{
//!     catalog::{CardSize, PaperSize},
//!     export,
//!     sheet::Sheet,
//!     source::{ImageSource, SourceLoader},
//! };
//!
//! # async fn example() -> Result<(), printard::PrintardError> {
//! let mut sheet = Sheet::new(PaperSize::A4, CardSize::Poker)?;
//! sheet.set_image("card-0", ImageSource::parse("front.png")?);
//! sheet.options.repeat_first = true;
//!
//! let loader = SourceLoader::new()?;
//! let pdf = export::export_pdf(&sheet, &loader).await?;
//! std::fs::write(&pdf.filename, &pdf.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Paper and card sizes |
//! | [`layout`] | Grid solver |
//! | [`grid`] | Cells and their images |
//! | [`fit`] | Cover-fit placement and masks |
//! | [`render`] | Sheet renderer |
//! | [`surface`] | Drawing surface trait |
//! | [`pdf`] / [`preview`] | PDF and PNG surfaces |
//! | [`sheet`] | Designer state |
//! | [`job`] | JSON job files |
//! | [`export`] | PDF/PNG/plan export |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod catalog;
pub mod error;
pub mod export;
pub mod fit;
pub mod geometry;
pub mod grid;
pub mod job;
pub mod layout;
pub mod pdf;
pub mod preview;
pub mod render;
pub mod server;
pub mod sheet;
pub mod source;
pub mod surface;

// Re-exports for convenience
pub use error::PrintardError;
pub use sheet::Sheet;
