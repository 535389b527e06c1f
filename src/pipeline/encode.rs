//! PNG output: name the file and write the page bitmap to disk.
//!
//! Output names follow `{stem}_pagina_{n}.png` where `stem` is the PDF file
//! name without its last extension and `n` counts pages from 1. An existing
//! file of the same name is replaced, so re-running a batch refreshes its
//! output in place.
//!
//! Writes are atomic (temp file in the same folder, then rename): if the
//! batch dies mid-write, the folder never holds a truncated PNG under a
//! final name.

use crate::error::Pdf2PngError;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Separator between the PDF stem and the page number.
pub const PAGE_INFIX: &str = "_pagina_";

/// Output path for page `page_num` (1-based) of `pdf_path`.
pub fn output_path(output_dir: &Path, pdf_path: &Path, page_num: usize) -> PathBuf {
    // Kept as an OsString so non-UTF-8 names stay distinct.
    let mut name = pdf_path.file_stem().unwrap_or_default().to_os_string();
    name.push(format!("{PAGE_INFIX}{page_num}.png"));
    output_dir.join(name)
}

/// All output paths of a document with `page_count` pages.
pub fn output_paths(output_dir: &Path, pdf_path: &Path, page_count: usize) -> Vec<PathBuf> {
    (1..=page_count)
        .map(|n| output_path(output_dir, pdf_path, n))
        .collect()
}

/// Encode `img` as PNG and atomically write it to `path`.
pub fn write_png(img: &DynamicImage, path: &Path) -> Result<(), Pdf2PngError> {
    let tmp_path = path.with_extension("png.tmp");

    let result = write_png_to(img, &tmp_path, path).and_then(|()| {
        std::fs::rename(&tmp_path, path).map_err(|e| Pdf2PngError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    });

    if result.is_err() {
        std::fs::remove_file(&tmp_path).ok();
    } else {
        debug!("Wrote {} ({}x{})", path.display(), img.width(), img.height());
    }
    result
}

fn write_png_to(img: &DynamicImage, tmp_path: &Path, final_path: &Path) -> Result<(), Pdf2PngError> {
    let write_failed = |source| Pdf2PngError::OutputWriteFailed {
        path: final_path.to_path_buf(),
        source,
    };

    let file = File::create(tmp_path).map_err(write_failed)?;
    let mut writer = BufWriter::new(file);

    let encoder =
        PngEncoder::new_with_quality(&mut writer, CompressionType::Default, FilterType::Adaptive);
    img.write_with_encoder(encoder).map_err(|e| match e {
        image::ImageError::IoError(source) => write_failed(source),
        other => Pdf2PngError::EncodeFailed {
            path: final_path.to_path_buf(),
            detail: other.to_string(),
        },
    })?;

    writer.flush().map_err(write_failed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn output_name_convention() {
        let out = Path::new("/out");
        assert_eq!(
            output_path(out, Path::new("/in/report.pdf"), 1),
            PathBuf::from("/out/report_pagina_1.png")
        );
        assert_eq!(
            output_path(out, Path::new("/in/Scan.2024.PDF"), 12),
            PathBuf::from("/out/Scan.2024_pagina_12.png")
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_stems_do_not_collide() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let out = Path::new("o");
        let a = output_path(out, Path::new(OsStr::from_bytes(b"r\xffa.pdf")), 1);
        let b = output_path(out, Path::new(OsStr::from_bytes(b"r\xfea.pdf")), 1);

        assert_ne!(a, b);
        assert_eq!(
            a.file_name().unwrap().as_bytes(),
            b"r\xffa_pagina_1.png".as_slice()
        );
    }

    #[test]
    fn output_paths_are_one_based() {
        let paths = output_paths(Path::new("o"), Path::new("doc.pdf"), 3);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("o/doc_pagina_1.png"),
                PathBuf::from("o/doc_pagina_2.png"),
                PathBuf::from("o/doc_pagina_3.png"),
            ]
        );
        assert!(output_paths(Path::new("o"), Path::new("doc.pdf"), 0).is_empty());
    }

    #[test]
    fn writes_decodable_rgb_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a_pagina_1.png");
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(7, 5, Rgb([200, 100, 50])));

        write_png(&img, &path).expect("write should succeed");

        let back = image::open(&path).expect("valid PNG");
        assert_eq!((back.width(), back.height()), (7, 5));
        assert_eq!(back.to_rgb8().get_pixel(3, 2).0, [200, 100, 50]);
        assert!(!dir.path().join("a_pagina_1.png.tmp").exists());
    }

    #[test]
    fn overwrites_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a_pagina_1.png");
        std::fs::write(&path, b"stale").unwrap();

        let img = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        write_png(&img, &path).unwrap();
        assert!(image::open(&path).is_ok());
    }

    #[test]
    fn missing_folder_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/a_pagina_1.png");
        let img = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        assert!(matches!(
            write_png(&img, &path),
            Err(Pdf2PngError::OutputWriteFailed { .. })
        ));
    }
}
