//! CLI binary for pdf2png.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `ConversionJob`, shows progress and reports how the batch ended.
//!
//! Exit status: 0 on success or when there is nothing to convert, 1 when the
//! conversion failed, 2 when the folders were not given.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2png::{
    convert_folder, inspect_folder, BackendKind, BatchOutcome, BatchReport,
    ConversionJob, ConversionProgressCallback, Pdf2PngError, ProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the documents of the batch and
/// one log line per finished document.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a spinner; `on_batch_start` turns it into a bar once the
    /// number of documents is known.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Listing input folder…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
    }

    /// Stop the bar without a summary line (the batch failed or was empty).
    fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.activate_bar(total_documents);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_documents} PDF files…"))
        ));
    }

    fn on_document_start(&self, _index: usize, _total: usize, path: &Path, page_count: usize) {
        self.bar
            .set_message(format!("{} (0/{page_count})", file_label(path)));
    }

    fn on_page_written(&self, page_num: usize, page_count: usize, output: &Path) {
        let label = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar
            .set_message(format!("{label} ({page_num}/{page_count})"));
    }

    fn on_document_complete(&self, path: &Path, page_count: usize) {
        self.bar.println(format!(
            "  {} {:<40}  {}",
            green("✓"),
            file_label(path),
            dim(&format!("{page_count:>4} pages")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, _documents: usize, _pages: usize) {
        self.bar.finish_and_clear();
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every PDF in ./scans into ./png at the default 200 DPI
  pdf2png scans png

  # Print-quality output
  pdf2png --dpi 300 scans png

  # Use poppler's pdftoppm instead of pdfium
  pdf2png --backend poppler scans png

  # List what would be written, without rendering
  pdf2png --inspect-only scans png

  # Machine-readable report
  pdf2png --json scans png > report.json

OUTPUT NAMES:
  Page n of report.pdf is written as {OUTPUT_DIR}/report_pagina_{n}.png
  (n starts at 1). Existing files with the same name are replaced.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  POPPLER_PATH            Directory holding pdfinfo / pdftoppm
  RUST_LOG                Override log filter (e.g. pdf2png=debug)
"#;

/// Convert every PDF in a folder into one PNG per page.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2png",
    version,
    about = "Convert every PDF in a folder into one PNG per page",
    long_about = "Convert every PDF file in INPUT_DIR (non-recursive, *.pdf in any case) into PNG \
images written to OUTPUT_DIR, one image per page. Pages are rendered at the chosen DPI with \
pdfium or poppler.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder containing the PDF files.
    #[arg(env = "PDF2PNG_INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Folder where the PNG images are written (created if missing).
    #[arg(env = "PDF2PNG_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Rendering DPI (72–600). 72 = one pixel per PDF point.
    #[arg(long, env = "PDF2PNG_DPI", default_value_t = pdf2png::DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Rasterisation engine.
    #[arg(long, env = "PDF2PNG_BACKEND", value_enum, default_value = "pdfium")]
    backend: BackendArg,

    /// PDF user password for encrypted documents.
    ///
    /// With `--backend poppler` the password is handed to pdfinfo and pdftoppm
    /// as `-upw <PASSWORD>`, where other local users can read it through `ps`.
    /// Prefer the pdfium backend on shared machines.
    #[arg(long, env = "PDF2PNG_PASSWORD")]
    password: Option<String>,

    /// List documents, page counts and output names only; write nothing.
    #[arg(long, env = "PDF2PNG_INSPECT_ONLY")]
    inspect_only: bool,

    /// Print a JSON report on stdout instead of the summary.
    #[arg(long, env = "PDF2PNG_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2PNG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PNG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2PNG_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum BackendArg {
    Pdfium,
    Poppler,
}

impl From<BackendArg> for BackendKind {
    fn from(v: BackendArg) -> Self {
        match v {
            BackendArg::Pdfium => BackendKind::Pdfium,
            BackendArg::Poppler => BackendKind::Poppler,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; verbose mode always wins.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress = show_progress.then(CliProgressCallback::new_dynamic);
    let job = build_job(&cli, progress.clone())?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let docs = match inspect_folder(&job).await {
            Ok(docs) => docs,
            Err(e) => return Ok(report_error(&e)),
        };

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&docs).context("Failed to serialise report")?
            );
        } else if docs.is_empty() {
            println!("No PDF files found in {}", job.input_dir.display());
        } else {
            for doc in &docs {
                println!("{:<40}  {:>4} pages", file_label(&doc.path), doc.page_count);
                for out in &doc.outputs {
                    println!("    → {}", out.display());
                }
            }
            let pages: usize = docs.iter().map(|d| d.page_count).sum();
            println!("{} files, {} pages", docs.len(), pages);
        }
        return Ok(ExitCode::SUCCESS);
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let outcome = convert_folder(&job).await;
    if let Some(ref cb) = progress {
        cb.abandon();
    }

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => return Ok(report_error(&e)),
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialise report")?
        );
        return Ok(ExitCode::SUCCESS);
    }

    if !cli.quiet {
        match &outcome {
            BatchOutcome::NothingToDo { input_dir } => {
                eprintln!(
                    "{} No PDF files found in {}",
                    cyan("ℹ"),
                    bold(&input_dir.display().to_string())
                );
            }
            BatchOutcome::Completed(report) => print_summary(report, &job.output_dir),
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Map CLI args to `ConversionJob`.
fn build_job(cli: &Cli, progress: Option<Arc<CliProgressCallback>>) -> Result<ConversionJob> {
    let mut builder = ConversionJob::builder()
        .input_dir(cli.input_dir.clone().unwrap_or_default())
        .output_dir(cli.output_dir.clone().unwrap_or_default())
        .dpi(cli.dpi)
        .backend(cli.backend.into());

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb as ProgressCallback);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(report: &BatchReport, output_dir: &Path) {
    eprintln!(
        "{}  {} files  {} pages  {} DPI  {}ms  →  {}",
        green("✔"),
        report.documents.len(),
        report.total_pages(),
        report.dpi,
        report.duration_ms,
        bold(&output_dir.display().to_string()),
    );
}

/// Print a failed batch the way the user needs to see it and pick the exit
/// status.
fn report_error(e: &Pdf2PngError) -> ExitCode {
    if e.is_precondition() {
        eprintln!("{} {}", red("✘"), e);
        eprintln!("{}", dim("Usage: pdf2png <INPUT_DIR> <OUTPUT_DIR>  (see --help)"));
        ExitCode::from(2)
    } else {
        eprintln!("{} {}", red("✘ Conversion failed:"), e);
        eprintln!(
            "{}",
            dim("Files converted before the error were kept in the output folder.")
        );
        ExitCode::FAILURE
    }
}
