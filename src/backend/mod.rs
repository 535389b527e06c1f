//! Rasterisation backends.
//!
//! The converter only ever needs two things from a PDF engine: how many
//! pages a document has, and a bitmap of page `i` at scale `s`. Both engines
//! sit behind [`RasterBackend`] / [`RasterDocument`] so the batch loop in
//! [`crate::convert`] is written once.
//!
//! ```text
//!            ┌── pdfium  — in-process, renders straight to a pixel map
//! backend ───┤
//!            └── poppler — bridge to the pdfinfo / pdftoppm executables
//! ```
//!
//! Neither trait requires `Send`: a backend is created and used on the same
//! blocking worker thread.

pub mod pdfium;
pub mod poppler;

use crate::config::BackendKind;
use crate::error::Pdf2PngError;
use image::DynamicImage;
use std::path::Path;

/// A PDF engine able to open documents.
pub trait RasterBackend {
    /// Short engine name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Open `path`, using `password` for encrypted documents.
    ///
    /// The returned document may borrow the backend; it is dropped (and the
    /// file released) as soon as its pages are written.
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PngError>;
}

/// An opened PDF document.
pub trait RasterDocument {
    fn page_count(&self) -> usize;

    /// Render page `index` (0-based) at `scale` pixels per PDF point.
    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, Pdf2PngError>;
}

/// Bind the engine selected by `kind`.
///
/// Binding pdfium loads a shared library and poppler probes `PATH`, so call
/// this only once there is actual work to do.
pub fn connect(kind: BackendKind) -> Result<Box<dyn RasterBackend>, Pdf2PngError> {
    match kind {
        BackendKind::Pdfium => Ok(Box::new(pdfium::PdfiumBackend::bind()?)),
        BackendKind::Poppler => Ok(Box::new(poppler::PopplerBackend::locate()?)),
    }
}

/// Pixel dimensions of a page measuring `width_pts × height_pts` points,
/// rendered at `scale`.
///
/// Each axis is rounded to the nearest pixel and never collapses below one.
pub fn scaled_size(width_pts: f32, height_pts: f32, scale: f32) -> (u32, u32) {
    let px = |pts: f32| ((pts * scale).round() as u32).max(1);
    (px(width_pts), px(height_pts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::dpi_to_scale;

    #[test]
    fn a4_at_72_dpi_is_one_pixel_per_point() {
        assert_eq!(scaled_size(595.0, 842.0, dpi_to_scale(72)), (595, 842));
    }

    #[test]
    fn doubling_dpi_doubles_pixels() {
        let (w1, h1) = scaled_size(612.0, 792.0, dpi_to_scale(72));
        let (w2, h2) = scaled_size(612.0, 792.0, dpi_to_scale(144));
        assert_eq!((w2, h2), (w1 * 2, h1 * 2));
    }

    #[test]
    fn tiny_pages_keep_one_pixel() {
        assert_eq!(scaled_size(0.1, 0.1, 1.0), (1, 1));
    }

    #[test]
    fn fractional_points_round() {
        // 595.3 pt × 300/72 = 2480.4 px
        assert_eq!(scaled_size(595.3, 841.9, dpi_to_scale(300)).0, 2480);
    }
}
