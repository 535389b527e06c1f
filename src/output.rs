//! Result types returned by the batch converter.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a batch ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// The input folder holds no `*.pdf` file; nothing was written.
    NothingToDo { input_dir: PathBuf },
    /// Every document was converted.
    Completed(BatchReport),
}

impl BatchOutcome {
    /// The report of a completed batch, `None` when there was nothing to do.
    pub fn report(&self) -> Option<&BatchReport> {
        match self {
            BatchOutcome::Completed(report) => Some(report),
            BatchOutcome::NothingToDo { .. } => None,
        }
    }
}

/// Summary of a completed batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// One entry per converted PDF, in processing order.
    pub documents: Vec<DocumentReport>,
    /// Render DPI used for every page.
    pub dpi: u32,
    /// Wall-clock time of the whole batch.
    pub duration_ms: u64,
}

impl BatchReport {
    /// Total PNG files written.
    pub fn total_pages(&self) -> usize {
        self.documents.iter().map(|d| d.outputs.len()).sum()
    }

    /// Every PNG written, in write order.
    pub fn outputs(&self) -> impl Iterator<Item = &PathBuf> {
        self.documents.iter().flat_map(|d| d.outputs.iter())
    }
}

/// The PNGs produced from one PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub source: PathBuf,
    pub page_count: usize,
    /// `{output_dir}/{stem}_pagina_{n}.png`, `n` = 1..=page_count.
    pub outputs: Vec<PathBuf>,
    pub duration_ms: u64,
}

/// What a conversion of one PDF would produce, without rendering it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub path: PathBuf,
    pub page_count: usize,
    pub outputs: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, pages: usize) -> DocumentReport {
        DocumentReport {
            source: PathBuf::from(format!("in/{name}.pdf")),
            page_count: pages,
            outputs: (1..=pages)
                .map(|n| PathBuf::from(format!("out/{name}_pagina_{n}.png")))
                .collect(),
            duration_ms: 1,
        }
    }

    #[test]
    fn totals_sum_over_documents() {
        let report = BatchReport {
            documents: vec![doc("a", 2), doc("b", 3)],
            dpi: 200,
            duration_ms: 5,
        };
        assert_eq!(report.total_pages(), 5);
        let last = report.outputs().last().unwrap();
        assert_eq!(last, &PathBuf::from("out/b_pagina_3.png"));
    }

    #[test]
    fn outcome_json_is_tagged() {
        let outcome = BatchOutcome::NothingToDo {
            input_dir: PathBuf::from("empty"),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"nothing_to_do\""), "got: {json}");
        assert!(outcome.report().is_none());
    }
}
