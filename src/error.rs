//! Error types for the pdf2png library.
//!
//! A batch has exactly two ways to fail:
//!
//! * **Precondition** errors: the job is unusable before any work starts
//!   (no input or output folder chosen, DPI out of range). Nothing on disk is
//!   touched. See [`Pdf2PngError::is_precondition`].
//!
//! * **Runtime** errors: anything raised while listing the folder, opening a
//!   document, rendering a page or writing a PNG. The batch stops at the first
//!   one; PNGs already written stay on disk.
//!
//! "No PDF files found" is not an error at all; it is reported as
//! [`crate::output::BatchOutcome::NothingToDo`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2png library.
#[derive(Debug, Error)]
pub enum Pdf2PngError {
    // ── Precondition errors ───────────────────────────────────────────────
    /// No input folder was selected.
    #[error("No input folder selected.\nChoose the folder that contains the PDF files.")]
    MissingInputDir,

    /// No output folder was selected.
    #[error("No output folder selected.\nChoose the folder where the PNG images will be saved.")]
    MissingOutputDir,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// The input folder could not be listed.
    #[error("Cannot read input folder '{path}': {source}")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file has a `.pdf` name but does not start with `%PDF`.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: Vec<u8> },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The backend failed to rasterise a page.
    #[error("Rasterisation failed for page {page} of '{path}': {detail}")]
    RasterisationFailed {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The rendered bitmap could not be PNG-encoded.
    #[error("PNG encoding failed for '{path}': {detail}")]
    EncodeFailed { path: PathBuf, detail: String },

    /// The output folder does not exist and could not be created.
    #[error("Cannot use output folder '{path}': {source}")]
    OutputDirUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write an output PNG.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Backend errors ────────────────────────────────────────────────────
    /// A bridge backend's external program is missing or unusable.
    #[error("The '{backend}' backend is unavailable: {detail}")]
    BackendUnavailable {
        backend: &'static str,
        detail: String,
    },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Place libpdfium next to the executable or in the working directory.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (file or directory).\n\
  • Use the poppler backend instead: --backend poppler\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2PngError {
    /// `true` when the job was rejected before any filesystem work began.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Pdf2PngError::MissingInputDir
                | Pdf2PngError::MissingOutputDir
                | Pdf2PngError::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_classification() {
        assert!(Pdf2PngError::MissingInputDir.is_precondition());
        assert!(Pdf2PngError::MissingOutputDir.is_precondition());
        assert!(Pdf2PngError::InvalidConfig("dpi".into()).is_precondition());
        assert!(!Pdf2PngError::Internal("boom".into()).is_precondition());
        assert!(!Pdf2PngError::CorruptPdf {
            path: "a.pdf".into(),
            detail: "bad xref".into(),
        }
        .is_precondition());
    }

    #[test]
    fn rasterisation_display() {
        let e = Pdf2PngError::RasterisationFailed {
            path: "report.pdf".into(),
            page: 3,
            detail: "out of memory".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("report.pdf"), "got: {msg}");
        assert!(msg.contains("out of memory"), "got: {msg}");
    }

    #[test]
    fn backend_unavailable_display() {
        let e = Pdf2PngError::BackendUnavailable {
            backend: "poppler",
            detail: "pdftoppm not found".into(),
        };
        assert!(e.to_string().contains("poppler"));
        assert!(e.to_string().contains("pdftoppm"));
    }

    #[test]
    fn output_write_keeps_source() {
        use std::error::Error as _;
        let e = Pdf2PngError::OutputWriteFailed {
            path: "out/a_pagina_1.png".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("a_pagina_1.png"));
    }
}
