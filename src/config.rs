//! Job configuration for a batch conversion.
//!
//! A [`ConversionJob`] is the whole input of one run: where the PDFs are,
//! where the PNGs go, how finely to rasterise and which engine to use. It is
//! built once and passed by reference into [`crate::convert`]; nothing in the
//! conversion reads ambient state.

use crate::error::Pdf2PngError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Lowest accepted render DPI (one pixel per PDF point).
pub const MIN_DPI: u32 = 72;
/// Highest accepted render DPI.
pub const MAX_DPI: u32 = 600;
/// Default render DPI.
pub const DEFAULT_DPI: u32 = 200;

/// PDF user space unit: 72 points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Configuration for one folder conversion.
///
/// Built via [`ConversionJob::builder()`].
///
/// # Example
/// ```rust
/// use pdf2png::{BackendKind, ConversionJob};
///
/// let job = ConversionJob::builder()
///     .input_dir("scans")
///     .output_dir("pngs")
///     .dpi(300)
///     .backend(BackendKind::Pdfium)
///     .build()
///     .unwrap();
/// assert_eq!(job.scale(), 300.0 / 72.0);
/// ```
#[derive(Clone)]
pub struct ConversionJob {
    /// Folder searched (non-recursively) for `*.pdf` files.
    ///
    /// An empty path means "not selected" and fails the job before anything
    /// on disk is touched.
    pub input_dir: PathBuf,

    /// Folder receiving `{name}_pagina_{n}.png` files. Created if missing.
    pub output_dir: PathBuf,

    /// Render resolution in dots per inch. Range: 72–600. Default: 200.
    ///
    /// The page is rasterised at `dpi / 72` pixels per PDF point on both axes.
    /// PNG is lossless, so this is the only quality knob: it decides the pixel
    /// dimensions of every output image.
    pub dpi: u32,

    /// Rasterisation engine. Default: [`BackendKind::Pdfium`].
    pub backend: BackendKind,

    /// PDF user password, tried on every document in the folder.
    pub password: Option<String>,

    /// Receives per-document and per-page events while the batch runs.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionJob {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            dpi: DEFAULT_DPI,
            backend: BackendKind::default(),
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionJob")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("dpi", &self.dpi)
            .field("backend", &self.backend)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionJob {
    /// Create a new builder for `ConversionJob`.
    pub fn builder() -> ConversionJobBuilder {
        ConversionJobBuilder {
            job: Self::default(),
        }
    }

    /// Linear scale factor applied to both page axes.
    pub fn scale(&self) -> f32 {
        dpi_to_scale(self.dpi)
    }

    /// Check the preconditions of a run.
    ///
    /// Pure: inspects only the job value, never the filesystem.
    pub fn validate(&self) -> Result<(), Pdf2PngError> {
        if is_unset(&self.input_dir) {
            return Err(Pdf2PngError::MissingInputDir);
        }
        if is_unset(&self.output_dir) {
            return Err(Pdf2PngError::MissingOutputDir);
        }
        if !(MIN_DPI..=MAX_DPI).contains(&self.dpi) {
            return Err(Pdf2PngError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                self.dpi
            )));
        }
        Ok(())
    }
}

fn is_unset(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

/// Convert a render DPI to the scale factor handed to the backend.
pub fn dpi_to_scale(dpi: u32) -> f32 {
    dpi as f32 / POINTS_PER_INCH
}

/// Builder for [`ConversionJob`].
#[derive(Debug)]
pub struct ConversionJobBuilder {
    job: ConversionJob,
}

impl ConversionJobBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.job.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.job.output_dir = dir.into();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.job.dpi = dpi.clamp(MIN_DPI, MAX_DPI);
        self
    }

    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.job.backend = backend;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.job.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.job.progress_callback = Some(cb);
        self
    }

    /// Build the job, validating the DPI range.
    ///
    /// Empty folders are accepted here and rejected by
    /// [`ConversionJob::validate`] when the batch starts, mirroring a form
    /// whose fields may still be blank when the user presses "convert".
    pub fn build(self) -> Result<ConversionJob, Pdf2PngError> {
        let dpi = self.job.dpi;
        if !(MIN_DPI..=MAX_DPI).contains(&dpi) {
            return Err(Pdf2PngError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {dpi}"
            )));
        }
        Ok(self.job)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which engine rasterises the pages.
///
/// | Backend | Engine | Requirement |
/// |---------|--------|-------------|
/// | `Pdfium`  | pdfium, rendered in-process to a pixel map | `libpdfium` shared library |
/// | `Poppler` | `pdftoppm` / `pdfinfo` executables (bridge) | poppler-utils on `PATH` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Pdfium,
    Poppler,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Pdfium => "pdfium",
            BackendKind::Poppler => "poppler",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
