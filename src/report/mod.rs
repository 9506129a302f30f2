//! Document Renderer - engagement letters from a Typst template.
//!
//! - `format` - presentation formatters (currency, percent, long date)
//! - `context` - the formatted field set merged into the template
//! - `engine` - writes the Typst source and converts it to PDF
//! - `generator` - `EngagementLetterGenerator`, the template owner

pub mod common;
pub mod context;
pub mod engine;
pub mod format;
pub mod generator;
pub mod handlers;
pub mod model;
pub mod traits;

pub use context::RenderingContext;
pub use engine::TypstRenderEngine;
pub use generator::EngagementLetterGenerator;
pub use handlers::config;
pub use model::ReportRequest;
pub use traits::{Generator, Validator};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during document generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to load Typst template: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("failed to create reports directory: {0}")]
    ReportsDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("converter produced no PDF at {0}")]
    MissingPdf(PathBuf),
}

/// The persisted document pair of one render.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// File name of the PDF inside the reports directory.
    pub filename: String,
    pub source_path: PathBuf,
    pub pdf_path: PathBuf,
    pub date: String,
}
