//! Batch conversion entry points.
//!
//! Every entry point runs the same sequence:
//!
//! 1. validate the job (no filesystem access on failure)
//! 2. list the input folder; stop with [`BatchOutcome::NothingToDo`] when it
//!    holds no PDF
//! 3. bind the backend, create the output folder
//! 4. for each PDF in turn: open, render and write every page, release
//!
//! The first error aborts the batch. PNGs written before it stay on disk.

use crate::backend::{self, RasterBackend};
use crate::config::ConversionJob;
use crate::error::Pdf2PngError;
use crate::output::{BatchOutcome, BatchReport, DocumentInfo, DocumentReport};
use crate::pipeline::{encode, input, render};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Convert every PDF of `job.input_dir` into PNGs in `job.output_dir`.
///
/// This is the primary entry point for the library. The batch runs on a
/// blocking worker thread (pdfium is not async-safe); the future resolves
/// when the last page is written or the first error occurs.
///
/// # Errors
/// - precondition errors (`MissingInputDir`, `MissingOutputDir`,
///   `InvalidConfig`) before anything on disk is touched
/// - the first runtime error raised while listing, opening, rendering or
///   writing
pub async fn convert_folder(job: &ConversionJob) -> Result<BatchOutcome, Pdf2PngError> {
    job.validate()?;
    let job = job.clone();
    tokio::task::spawn_blocking(move || convert_folder_sync(&job))
        .await
        .map_err(|e| Pdf2PngError::Internal(format!("Conversion task panicked: {}", e)))?
}

/// Blocking version of [`convert_folder`]; runs on the calling thread.
pub fn convert_folder_sync(job: &ConversionJob) -> Result<BatchOutcome, Pdf2PngError> {
    let started = Instant::now();
    let Some(pdfs) = collect_inputs(job)? else {
        return Ok(nothing_to_do(job));
    };

    let backend = backend::connect(job.backend)?;
    let report = process_documents(job, backend.as_ref(), &pdfs, started)?;
    Ok(BatchOutcome::Completed(report))
}

/// Run a batch with a caller-supplied backend.
///
/// `job.backend` is ignored. Useful for custom engines and for exercising
/// the batch logic without a PDF engine installed.
pub fn convert_with_backend(
    job: &ConversionJob,
    backend: &dyn RasterBackend,
) -> Result<BatchOutcome, Pdf2PngError> {
    let started = Instant::now();
    let Some(pdfs) = collect_inputs(job)? else {
        return Ok(nothing_to_do(job));
    };

    let report = process_documents(job, backend, &pdfs, started)?;
    Ok(BatchOutcome::Completed(report))
}

/// List what a conversion of `job` would produce, without rendering.
///
/// Opens each PDF only to count its pages. Nothing is written.
pub async fn inspect_folder(job: &ConversionJob) -> Result<Vec<DocumentInfo>, Pdf2PngError> {
    job.validate()?;
    let job = job.clone();
    tokio::task::spawn_blocking(move || -> Result<Vec<DocumentInfo>, Pdf2PngError> {
        let Some(pdfs) = collect_inputs(&job)? else {
            return Ok(Vec::new());
        };
        let backend = backend::connect(job.backend)?;
        inspect_with_backend(&job, backend.as_ref(), &pdfs)
    })
    .await
    .map_err(|e| Pdf2PngError::Internal(format!("Inspect task panicked: {}", e)))?
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Validate the job and list its PDFs; `None` when there are none.
fn collect_inputs(job: &ConversionJob) -> Result<Option<Vec<PathBuf>>, Pdf2PngError> {
    job.validate()?;
    let pdfs = input::discover_pdfs(&job.input_dir)?;
    if pdfs.is_empty() {
        info!("No PDF files in {}", job.input_dir.display());
        return Ok(None);
    }
    info!(
        "Found {} PDF files in {}",
        pdfs.len(),
        job.input_dir.display()
    );
    Ok(Some(pdfs))
}

fn nothing_to_do(job: &ConversionJob) -> BatchOutcome {
    BatchOutcome::NothingToDo {
        input_dir: job.input_dir.clone(),
    }
}

fn ensure_output_dir(dir: &Path) -> Result<(), Pdf2PngError> {
    std::fs::create_dir_all(dir).map_err(|e| Pdf2PngError::OutputDirUnavailable {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Convert `pdfs` in order, stopping at the first error.
fn process_documents(
    job: &ConversionJob,
    backend: &dyn RasterBackend,
    pdfs: &[PathBuf],
    started: Instant,
) -> Result<BatchReport, Pdf2PngError> {
    ensure_output_dir(&job.output_dir)?;

    let total = pdfs.len();
    if let Some(ref cb) = job.progress_callback {
        cb.on_batch_start(total);
    }

    let mut documents = Vec::with_capacity(total);
    for (i, pdf_path) in pdfs.iter().enumerate() {
        documents.push(convert_document(job, backend, pdf_path, i + 1, total)?);
    }

    let report = BatchReport {
        documents,
        dpi: job.dpi,
        duration_ms: started.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} documents, {} pages, {}ms",
        report.documents.len(),
        report.total_pages(),
        report.duration_ms
    );

    if let Some(ref cb) = job.progress_callback {
        cb.on_batch_complete(report.documents.len(), report.total_pages());
    }

    Ok(report)
}

/// Render and write every page of one PDF.
fn convert_document(
    job: &ConversionJob,
    backend: &dyn RasterBackend,
    pdf_path: &Path,
    index: usize,
    total: usize,
) -> Result<DocumentReport, Pdf2PngError> {
    let doc_start = Instant::now();
    let scale = job.scale();

    let document = render::open_document(backend, pdf_path, job.password.as_deref())?;
    let page_count = document.page_count();

    if let Some(ref cb) = job.progress_callback {
        cb.on_document_start(index, total, pdf_path, page_count);
    }

    let mut outputs = Vec::with_capacity(page_count);
    for page_idx in 0..page_count {
        let page_num = page_idx + 1;
        let image = render::render_page(document.as_ref(), page_idx, scale)?;
        let out_path = encode::output_path(&job.output_dir, pdf_path, page_num);
        encode::write_png(&image, &out_path)?;
        drop(image);

        if let Some(ref cb) = job.progress_callback {
            cb.on_page_written(page_num, page_count, &out_path);
        }
        outputs.push(out_path);
    }

    // Release the document before moving to the next file.
    drop(document);

    let duration_ms = doc_start.elapsed().as_millis() as u64;
    debug!(
        "Converted {} ({} pages) in {}ms",
        pdf_path.display(),
        page_count,
        duration_ms
    );

    if let Some(ref cb) = job.progress_callback {
        cb.on_document_complete(pdf_path, page_count);
    }

    Ok(DocumentReport {
        source: pdf_path.to_path_buf(),
        page_count,
        outputs,
        duration_ms,
    })
}

fn inspect_with_backend(
    job: &ConversionJob,
    backend: &dyn RasterBackend,
    pdfs: &[PathBuf],
) -> Result<Vec<DocumentInfo>, Pdf2PngError> {
    pdfs.iter()
        .map(|pdf_path| {
            let document = render::open_document(backend, pdf_path, job.password.as_deref())?;
            let page_count = document.page_count();
            Ok(DocumentInfo {
                path: pdf_path.clone(),
                page_count,
                outputs: encode::output_paths(&job.output_dir, pdf_path, page_count),
            })
        })
        .collect()
}
