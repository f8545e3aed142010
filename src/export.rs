//! Sheet export: render a [`Sheet`] to PDF, PNG or a JSON draw plan.
//!
//! Each export solves the sheet's layout, renders it through
//! [`render_sheet`] onto the matching surface, and names the result
//! `layout-cards-{paper}-{card}.{ext}`.
//!
//! PDF export holds a `!Send` document while it awaits image loads. Inside a
//! multi-threaded server, run it on a blocking thread with
//! `Handle::block_on`.

use serde::Serialize;

use crate::error::PrintardError;
use crate::pdf::PdfSurface;
use crate::preview::PreviewSurface;
use crate::render::{RenderReport, render_sheet};
use crate::sheet::Sheet;
use crate::source::ImageLoader;
use crate::surface::{DrawingSurface, RecordingSurface};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportFormat {
    Pdf,
    /// Raster preview at the given resolution.
    Png { dpi: f32 },
    /// JSON log of draw operations.
    Plan,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png { .. } => "png",
            ExportFormat::Plan => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Png { .. } => "image/png",
            ExportFormat::Plan => "application/json",
        }
    }
}

/// A rendered sheet.
#[derive(Debug, Clone, Serialize)]
pub struct Export {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
    pub report: RenderReport,
}

/// Render `sheet` in `format`.
pub async fn export<L>(
    sheet: &Sheet,
    format: ExportFormat,
    loader: &L,
) -> Result<Export, PrintardError>
where
    L: ImageLoader + ?Sized,
{
    match format {
        ExportFormat::Pdf => {
            let title = format!("Card layout {} {}", sheet.paper(), sheet.card());
            render_with(sheet, format, loader, PdfSurface::new(title)).await
        }
        ExportFormat::Png { dpi } => {
            render_with(sheet, format, loader, PreviewSurface::new(dpi)).await
        }
        ExportFormat::Plan => render_with(sheet, format, loader, RecordingSurface::new()).await,
    }
}

pub async fn export_pdf<L>(sheet: &Sheet, loader: &L) -> Result<Export, PrintardError>
where
    L: ImageLoader + ?Sized,
{
    export(sheet, ExportFormat::Pdf, loader).await
}

pub async fn export_png<L>(sheet: &Sheet, dpi: f32, loader: &L) -> Result<Export, PrintardError>
where
    L: ImageLoader + ?Sized,
{
    export(sheet, ExportFormat::Png { dpi }, loader).await
}

/// Draw-op log as pretty JSON, without producing a document.
pub async fn plan<L>(sheet: &Sheet, loader: &L) -> Result<Export, PrintardError>
where
    L: ImageLoader + ?Sized,
{
    export(sheet, ExportFormat::Plan, loader).await
}

async fn render_with<S, L>(
    sheet: &Sheet,
    format: ExportFormat,
    loader: &L,
    mut surface: S,
) -> Result<Export, PrintardError>
where
    S: DrawingSurface,
    L: ImageLoader + ?Sized,
{
    let layout = sheet.layout()?;
    let report = render_sheet(&layout, sheet.grid(), &sheet.options, loader, &mut surface).await?;
    let bytes = surface.finish()?;
    let filename = sheet.export_filename(format.extension());
    tracing::info!(
        file = %filename,
        bytes = bytes.len(),
        failed = report.failures.len(),
        "sheet exported"
    );
    Ok(Export {
        bytes,
        filename,
        content_type: format.content_type(),
        report,
    })
}
