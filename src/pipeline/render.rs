//! Page rasterisation on top of a [`RasterBackend`].
//!
//! Opening goes through the `%PDF` magic check first so that a misnamed
//! file gets a clear [`Pdf2PngError::NotAPdf`] instead of whatever the
//! engine makes of it. Rendered pages are normalised to 8-bit RGB, which is
//! what every output PNG contains regardless of backend.

use crate::backend::{RasterBackend, RasterDocument};
use crate::error::Pdf2PngError;
use crate::pipeline::input;
use image::DynamicImage;
use std::path::Path;
use tracing::info;

/// Open one PDF for rendering.
pub fn open_document<'a>(
    backend: &'a dyn RasterBackend,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PngError> {
    input::check_pdf_magic(pdf_path)?;
    let document = backend.open(pdf_path, password)?;
    info!(
        "Opened {} with {}: {} pages",
        pdf_path.display(),
        backend.name(),
        document.page_count()
    );
    Ok(document)
}

/// Rasterise page `index` (0-based) at `scale` and convert it to RGB.
pub fn render_page(
    document: &dyn RasterDocument,
    index: usize,
    scale: f32,
) -> Result<DynamicImage, Pdf2PngError> {
    let image = document.render_page(index, scale)?;
    Ok(to_rgb(image))
}

/// Drop any alpha channel; pages are opaque.
fn to_rgb(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb8(_) => image,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}
