//! Input discovery: find the PDFs of a folder.
//!
//! Only the folder itself is searched, never sub-folders. A file qualifies
//! when its name ends in `.pdf` in any letter case. The list is sorted by
//! file name so two runs over the same folder process documents in the same
//! order.
//!
//! The `%PDF` magic check happens per document, right before it is opened,
//! so a bad file in the middle of a batch stops the batch at that file and
//! not before the first one.

use crate::error::Pdf2PngError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// List the PDF files directly inside `dir`, sorted by file name.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, Pdf2PngError> {
    let unreadable = |source| Pdf2PngError::InputDirUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        if has_pdf_extension(&path) && path.is_file() {
            pdfs.push(path);
        }
    }

    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Found {} PDF files in {}", pdfs.len(), dir.display());
    Ok(pdfs)
}

/// `true` when the file name ends in `.pdf`, ignoring case.
///
/// A file called just `.pdf` counts too.
pub fn has_pdf_extension(path: &Path) -> bool {
    const SUFFIX: &[u8] = b".pdf";
    path.file_name()
        .map(|name| name.as_encoded_bytes())
        .is_some_and(|name| {
            name.len() >= SUFFIX.len()
                && name[name.len() - SUFFIX.len()..].eq_ignore_ascii_case(SUFFIX)
        })
}

/// Verify the file starts with the `%PDF` magic bytes.
pub fn check_pdf_magic(path: &Path) -> Result<(), Pdf2PngError> {
    let mut file = std::fs::File::open(path).map_err(|e| Pdf2PngError::CorruptPdf {
        path: path.to_path_buf(),
        detail: format!("cannot open: {e}"),
    })?;

    let mut magic = Vec::with_capacity(4);
    file.by_ref()
        .take(4)
        .read_to_end(&mut magic)
        .map_err(|e| Pdf2PngError::CorruptPdf {
            path: path.to_path_buf(),
            detail: format!("cannot read: {e}"),
        })?;

    if magic.as_slice() != b"%PDF" {
        return Err(Pdf2PngError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}
