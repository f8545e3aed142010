//! PDF output via `printpdf`.
//!
//! Sheet coordinates are top-left based; PDF user space is bottom-left based,
//! so every rectangle is flipped against the current page height.
//!
//! Images are embedded as 8-bit RGB XObjects. Anything denser than
//! [`MAX_IMAGE_DPI`] at its placed size is downsampled first so exports of
//! phone photos stay a reasonable size.
//!
//! `PdfDocumentReference` is `!Send`; callers running inside a multi-threaded
//! runtime render on a blocking thread.

use image::imageops::FilterType;
use image::DynamicImage;
use printpdf::path::PaintMode;
use printpdf::{
    Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Px, Rect as PdfRect, Rgb as PdfRgb,
};

use crate::error::PrintardError;
use crate::geometry::{Dimensions, Rect, Rgb};
use crate::surface::DrawingSurface;

/// Upper bound on embedded image resolution.
pub const MAX_IMAGE_DPI: f32 = 300.0;

const MM_PER_INCH: f32 = 25.4;
const PT_PER_MM: f32 = 72.0 / MM_PER_INCH;

/// PDF drawing surface.
pub struct PdfSurface {
    title: String,
    doc: Option<PdfDocumentReference>,
    layer: Option<PdfLayerReference>,
    page_height: f32,
    pages: usize,
}

impl PdfSurface {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            doc: None,
            layer: None,
            page_height: 0.0,
            pages: 0,
        }
    }

    fn layer(&self) -> Result<&PdfLayerReference, PrintardError> {
        self.layer
            .as_ref()
            .ok_or_else(|| PrintardError::Serialization("no page started".to_string()))
    }

    /// Sheet rectangle to PDF lower-left / upper-right corners.
    fn to_pdf_rect(&self, rect: Rect) -> PdfRect {
        let lly = self.page_height - rect.bottom();
        PdfRect::new(
            Mm(rect.x),
            Mm(lly),
            Mm(rect.right()),
            Mm(lly + rect.height),
        )
    }
}

fn pdf_color(color: Rgb) -> Color {
    let (r, g, b) = color.to_unit();
    Color::Rgb(PdfRgb::new(r, g, b, None))
}

impl DrawingSurface for PdfSurface {
    fn begin_page(&mut self, paper: Dimensions) -> Result<(), PrintardError> {
        self.pages += 1;
        let page_name = format!("Sheet {}", self.pages);
        let layer = match &self.doc {
            None => {
                let (doc, page, layer) = PdfDocument::new(
                    self.title.as_str(),
                    Mm(paper.width),
                    Mm(paper.height),
                    page_name,
                );
                let layer = doc.get_page(page).get_layer(layer);
                self.doc = Some(doc);
                layer
            }
            Some(doc) => {
                let (page, layer) = doc.add_page(Mm(paper.width), Mm(paper.height), page_name);
                doc.get_page(page).get_layer(layer)
            }
        };
        self.layer = Some(layer);
        self.page_height = paper.height;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let shape = self.to_pdf_rect(rect).with_mode(PaintMode::Fill);
        if let Ok(layer) = self.layer() {
            layer.set_fill_color(pdf_color(color));
            layer.add_rect(shape);
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb, width_mm: f32) {
        let shape = self.to_pdf_rect(rect).with_mode(PaintMode::Stroke);
        if let Ok(layer) = self.layer() {
            layer.set_outline_color(pdf_color(color));
            layer.set_outline_thickness(width_mm * PT_PER_MM);
            layer.add_rect(shape);
        }
    }

    fn draw_image(&mut self, image: &DynamicImage, rect: Rect) -> Result<(), PrintardError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(PrintardError::ImageDecode("image has no pixels".to_string()));
        }
        let layer = self.layer()?.clone();

        let max_width = (rect.width / MM_PER_INCH * MAX_IMAGE_DPI).ceil().max(1.0) as u32;
        let max_height = (rect.height / MM_PER_INCH * MAX_IMAGE_DPI).ceil().max(1.0) as u32;
        let rgb = if image.width() > max_width || image.height() > max_height {
            image
                .resize_exact(
                    image.width().min(max_width),
                    image.height().min(max_height),
                    FilterType::Triangle,
                )
                .to_rgb8()
        } else {
            image.to_rgb8()
        };
        let (width_px, height_px) = rgb.dimensions();

        let xobject = Image::from(ImageXObject {
            width: Px(width_px as usize),
            height: Px(height_px as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: rgb.into_raw(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        // Natural size at MAX_IMAGE_DPI, then stretch to the target rect
        let natural_width = width_px as f32 / MAX_IMAGE_DPI * MM_PER_INCH;
        let natural_height = height_px as f32 / MAX_IMAGE_DPI * MM_PER_INCH;

        xobject.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(rect.x)),
                translate_y: Some(Mm(self.page_height - rect.bottom())),
                dpi: Some(MAX_IMAGE_DPI),
                scale_x: Some(rect.width / natural_width),
                scale_y: Some(rect.height / natural_height),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, PrintardError> {
        let doc = self
            .doc
            .ok_or_else(|| PrintardError::Serialization("document has no pages".to_string()))?;
        doc.save_to_bytes()
            .map_err(|e| PrintardError::Serialization(format!("Failed to write PDF: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_without_pages_fails() {
        let surface = PdfSurface::new("empty");
        assert!(matches!(
            surface.finish(),
            Err(PrintardError::Serialization(_))
        ));
    }

    #[test]
    fn test_draw_before_page_fails() {
        let mut surface = PdfSurface::new("t");
        let result = surface.draw_image(&DynamicImage::new_rgb8(2, 2), Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(result.is_err());
    }

    #[test]
    fn test_pdf_bytes() {
        let mut surface = PdfSurface::new("sheet");
        surface.begin_page(Dimensions::new(210.0, 297.0)).unwrap();
        surface.fill_rect(Rect::new(10.0, 10.0, 20.0, 20.0), Rgb::WHITE);
        surface
            .draw_image(&DynamicImage::new_rgb8(8, 8), Rect::new(10.0, 10.0, 63.0, 88.0))
            .unwrap();
        surface.stroke_rect(Rect::new(10.0, 10.0, 63.0, 88.0), Rgb::GUIDE, 0.2);
        surface.begin_page(Dimensions::new(210.0, 297.0)).unwrap();
        let bytes = surface.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
