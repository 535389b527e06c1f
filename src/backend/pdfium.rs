//! Native backend: pdfium renders each page straight into a pixel map.
//!
//! ## Library lookup
//!
//! `libpdfium` is a plain shared library, loaded at runtime. The first
//! location that binds wins:
//!
//! 1. `PDFIUM_LIB_PATH` — the library file itself, or a directory holding it
//! 2. the current working directory
//! 3. the directory of the running executable
//! 4. the system library search path

use super::{scaled_size, RasterBackend, RasterDocument};
use crate::error::Pdf2PngError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable pointing at an existing pdfium library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Bind to the first pdfium library found (see module docs).
    pub fn bind() -> Result<Self, Pdf2PngError> {
        let mut attempts = Vec::new();

        for candidate in candidate_paths() {
            match Pdfium::bind_to_library(&candidate) {
                Ok(bindings) => {
                    info!("Bound pdfium from {}", candidate.display());
                    return Ok(Self {
                        pdfium: Pdfium::new(bindings),
                    });
                }
                Err(e) => {
                    debug!("pdfium not loadable from {}: {}", candidate.display(), e);
                    attempts.push(format!("{}: {}", candidate.display(), e));
                }
            }
        }

        match Pdfium::bind_to_system_library() {
            Ok(bindings) => {
                info!("Bound pdfium from the system library path");
                Ok(Self {
                    pdfium: Pdfium::new(bindings),
                })
            }
            Err(e) => {
                attempts.push(format!("system library: {e}"));
                Err(Pdf2PngError::PdfiumBindingFailed(attempts.join("; ")))
            }
        }
    }
}

/// Explicit library locations, most specific first.
fn candidate_paths() -> Vec<PathBuf> {
    let lib_name = Pdfium::pdfium_platform_library_name();
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        let p = PathBuf::from(env_path);
        if p.is_dir() {
            paths.push(p.join(&lib_name));
        } else {
            paths.push(p);
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(&lib_name));
    }

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(exe_dir.join(&lib_name));
    }

    paths.retain(|p| p.exists());
    paths.dedup();
    paths
}

impl RasterBackend for PdfiumBackend {
    fn name(&self) -> &'static str {
        "pdfium"
    }

    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PngError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| classify_load_error(path, password.is_some(), &format!("{:?}", e)))?;

        Ok(Box::new(PdfiumDocument {
            path: path.to_path_buf(),
            document,
        }))
    }
}

/// Map a pdfium load failure to a password or corruption error.
fn classify_load_error(path: &Path, had_password: bool, detail: &str) -> Pdf2PngError {
    if detail.contains("Password") || detail.contains("password") {
        if had_password {
            Pdf2PngError::WrongPassword {
                path: path.to_path_buf(),
            }
        } else {
            Pdf2PngError::PasswordRequired {
                path: path.to_path_buf(),
            }
        }
    } else {
        Pdf2PngError::CorruptPdf {
            path: path.to_path_buf(),
            detail: detail.to_string(),
        }
    }
}

struct PdfiumDocument<'a> {
    path: PathBuf,
    document: PdfDocument<'a>,
}

impl RasterDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, Pdf2PngError> {
        let failed = |detail: String| Pdf2PngError::RasterisationFailed {
            path: self.path.clone(),
            page: index + 1,
            detail,
        };

        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| failed(format!("{:?}", e)))?;

        // Size the bitmap ourselves so the pixel extent is exactly
        // round(points × scale) on both axes.
        let (width, height) = scaled_size(page.width().value, page.height().value, scale);
        let render_config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| failed(format!("{:?}", e)))?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} of {} → {}x{} px",
            index + 1,
            self.path.display(),
            image.width(),
            image.height()
        );

        Ok(image)
    }
}
