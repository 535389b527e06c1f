//! Progress-callback trait for batch conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionJobBuilder::progress_callback`] to be told as
//! each document is opened and each PNG lands on disk.
//!
//! The batch runs on a single worker thread, so events arrive strictly in
//! order: one `on_batch_start`, then for every document an
//! `on_document_start`, its `on_page_written` events and an
//! `on_document_complete`, and finally `on_batch_complete` (only when the
//! whole batch succeeded).
//!
//! # Example
//!
//! ```rust
//! use pdf2png::{ConversionProgressCallback, ConversionJob};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct PageCounter {
//!     written: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for PageCounter {
//!     fn on_page_written(&self, page_num: usize, page_count: usize, output: &Path) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} → {}", page_num, page_count, output.display());
//!     }
//! }
//!
//! let counter = Arc::new(PageCounter { written: AtomicUsize::new(0) });
//!
//! let job = ConversionJob::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the batch converter as it processes documents and pages.
///
/// Implementations must be `Send + Sync` because the batch runs on a
/// blocking worker thread, not on the caller's thread. All methods have
/// default no-op implementations.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once, after the input folder was listed and before the first
    /// document is opened.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called after a document was opened.
    ///
    /// # Arguments
    /// * `index`      — 1-indexed position of the document in the batch
    /// * `total`      — number of documents in the batch
    /// * `path`       — source PDF
    /// * `page_count` — pages that will be written for it
    fn on_document_start(&self, index: usize, total: usize, path: &Path, page_count: usize) {
        let _ = (index, total, path, page_count);
    }

    /// Called after a PNG was written.
    ///
    /// # Arguments
    /// * `page_num`   — 1-indexed page number within the document
    /// * `page_count` — pages in the document
    /// * `output`     — the PNG just written
    fn on_page_written(&self, page_num: usize, page_count: usize, output: &Path) {
        let _ = (page_num, page_count, output);
    }

    /// Called after every page of a document was written and the document
    /// was released.
    fn on_document_complete(&self, path: &Path, page_count: usize) {
        let _ = (path, page_count);
    }

    /// Called once when every document converted without error.
    fn on_batch_complete(&self, documents: usize, pages: usize) {
        let _ = (documents, pages);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionJob`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
