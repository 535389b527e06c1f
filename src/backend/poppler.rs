//! Bridge backend: shells out to poppler's `pdfinfo` and `pdftoppm`.
//!
//! Each page is rendered by its own `pdftoppm -singlefile` call into a
//! scratch directory owned by the open document, then decoded back into a
//! `DynamicImage` so the rest of the pipeline treats both backends alike.
//! The scratch directory disappears when the document is dropped.
//!
//! Set `POPPLER_PATH` to the folder holding the executables when they are
//! not on `PATH` (the usual case on Windows).

use super::{RasterBackend, RasterDocument};
use crate::error::Pdf2PngError;
use image::DynamicImage;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;
use tracing::{debug, info};

/// Environment variable naming the directory of the poppler executables.
pub const POPPLER_PATH_ENV: &str = "POPPLER_PATH";

pub struct PopplerBackend {
    pdfinfo: PathBuf,
    pdftoppm: PathBuf,
}

impl PopplerBackend {
    /// Find `pdfinfo` and `pdftoppm` and check that both can be started.
    pub fn locate() -> Result<Self, Pdf2PngError> {
        let dir = std::env::var_os(POPPLER_PATH_ENV).map(PathBuf::from);
        let tool = |name: &str| match &dir {
            Some(d) => d.join(exe_name(name)),
            None => PathBuf::from(exe_name(name)),
        };

        let backend = Self {
            pdfinfo: tool("pdfinfo"),
            pdftoppm: tool("pdftoppm"),
        };

        for program in [&backend.pdfinfo, &backend.pdftoppm] {
            // `-v` prints the version and exits; only spawn failures matter.
            run(program, ["-v"]).map_err(|e| Pdf2PngError::BackendUnavailable {
                backend: "poppler",
                detail: describe_spawn_error(program, &e),
            })?;
        }

        info!("Using poppler executables: {}", backend.pdftoppm.display());
        Ok(backend)
    }
}

fn exe_name(name: &str) -> String {
    format!("{name}{}", std::env::consts::EXE_SUFFIX)
}

fn run<I, S>(program: &Path, args: I) -> std::io::Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
}

fn describe_spawn_error(program: &Path, e: &std::io::Error) -> String {
    if e.kind() == ErrorKind::NotFound {
        format!(
            "'{}' not found; install poppler-utils or set {POPPLER_PATH_ENV}",
            program.display()
        )
    } else {
        format!("cannot run '{}': {e}", program.display())
    }
}

impl RasterBackend for PopplerBackend {
    fn name(&self) -> &'static str {
        "poppler"
    }

    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PngError> {
        let mut args: Vec<&OsStr> = Vec::new();
        // Visible in the process list while the tool runs.
        if let Some(pwd) = password {
            args.push(OsStr::new("-upw"));
            args.push(OsStr::new(pwd));
        }
        args.push(path.as_os_str());

        let output = run(&self.pdfinfo, &args).map_err(|e| Pdf2PngError::BackendUnavailable {
            backend: "poppler",
            detail: describe_spawn_error(&self.pdfinfo, &e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_stderr(path, password.is_some(), stderr.trim()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let page_count = parse_page_count(&stdout).ok_or_else(|| Pdf2PngError::CorruptPdf {
            path: path.to_path_buf(),
            detail: "pdfinfo reported no page count".into(),
        })?;

        let scratch = TempDir::new().map_err(|e| Pdf2PngError::Internal(format!("tempdir: {e}")))?;

        Ok(Box::new(PopplerDocument {
            tools: self,
            path: path.to_path_buf(),
            password,
            page_count,
            scratch,
        }))
    }
}

/// Extract `N` from the `Pages:  N` line of `pdfinfo` output.
fn parse_page_count(pdfinfo_stdout: &str) -> Option<usize> {
    pdfinfo_stdout
        .lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|rest| rest.trim().parse().ok())
}

/// Map poppler's stderr to a password or corruption error.
fn classify_stderr(path: &Path, had_password: bool, stderr: &str) -> Pdf2PngError {
    if stderr.contains("Incorrect password") || stderr.contains("password") {
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
            detail: stderr.to_string(),
        }
    }
}

struct PopplerDocument<'a> {
    tools: &'a PopplerBackend,
    path: PathBuf,
    password: Option<&'a str>,
    page_count: usize,
    scratch: TempDir,
}

impl RasterDocument for PopplerDocument<'_> {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, Pdf2PngError> {
        let page = index + 1;
        let failed = |detail: String| Pdf2PngError::RasterisationFailed {
            path: self.path.clone(),
            page,
            detail,
        };

        let prefix = self.scratch.path().join("page");
        let resolution = format!("{:.3}", scale * crate::config::POINTS_PER_INCH);
        let page_arg = page.to_string();

        let mut cmd = Command::new(&self.tools.pdftoppm);
        cmd.args(["-png", "-singlefile", "-r", resolution.as_str()])
            .args(["-f", page_arg.as_str(), "-l", page_arg.as_str()]);
        if let Some(pwd) = self.password {
            cmd.arg("-upw").arg(pwd);
        }
        let output = cmd
            .arg(&self.path)
            .arg(&prefix)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| failed(describe_spawn_error(&self.tools.pdftoppm, &e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!(
                "pdftoppm exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        // -singlefile writes `<prefix>.png` without a page suffix.
        let rendered = prefix.with_extension("png");
        let image = image::open(&rendered).map_err(|e| failed(e.to_string()))?;
        std::fs::remove_file(&rendered).ok();

        debug!(
            "Rendered page {} of {} → {}x{} px",
            page,
            self.path.display(),
            image.width(),
            image.height()
        );

        Ok(image)
    }
}
