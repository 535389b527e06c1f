//! # pdf2png
//!
//! Batch-convert every PDF in a folder into PNG images, one per page.
//!
//! Each page of `report.pdf` becomes `report_pagina_1.png`,
//! `report_pagina_2.png`, … in the output folder. Rasterisation is delegated
//! to a PDF engine; this crate only finds the files, drives the engine and
//! writes the images.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input folder
//!  │
//!  ├─ 1. Validate  both folders chosen, DPI in range
//!  ├─ 2. Input     list *.pdf (case-insensitive, non-recursive)
//!  ├─ 3. Render    one page at a time via pdfium or poppler, scale = dpi / 72
//!  └─ 4. Encode    RGB PNG → {stem}_pagina_{n}.png (atomic write)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2png::{convert_folder, BatchOutcome, ConversionJob};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let job = ConversionJob::builder()
//!         .input_dir("invoices")
//!         .output_dir("invoices/png")
//!         .dpi(150)
//!         .build()?;
//!
//!     match convert_folder(&job).await? {
//!         BatchOutcome::NothingToDo { .. } => eprintln!("no PDF files found"),
//!         BatchOutcome::Completed(report) => {
//!             eprintln!("{} pages written", report.total_pages())
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2png` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Choosing a Backend
//!
//! | Backend | Needs | Notes |
//! |---------|-------|-------|
//! | `pdfium` (default) | `libpdfium` shared library | In-process, fastest |
//! | `poppler` | `pdfinfo` + `pdftoppm` on `PATH` | One process per page |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod backend;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use backend::{RasterBackend, RasterDocument};
pub use config::{BackendKind, ConversionJob, ConversionJobBuilder, DEFAULT_DPI, MAX_DPI, MIN_DPI};
pub use convert::{convert_folder, convert_folder_sync, convert_with_backend, inspect_folder};
pub use error::Pdf2PngError;
pub use output::{BatchOutcome, BatchReport, DocumentInfo, DocumentReport};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
