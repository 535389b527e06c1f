//! Pipeline stages for folder-to-PNG conversion.
//!
//! Each submodule implements exactly one step, so each can be tested without
//! a PDF engine and the engine itself stays swappable (see
//! [`crate::backend`]).
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode
//! (list)    (backend)  (PNG on disk)
//! ```
//!
//! 1. [`input`]  — list `*.pdf` files in the input folder and check each
//!    one's `%PDF` header before the engine sees it
//! 2. [`render`] — open a document and rasterise one page at a time
//! 3. [`encode`] — name the output file and write the bitmap as an RGB PNG

pub mod encode;
pub mod input;
pub mod render;
