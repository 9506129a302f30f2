//! Typst rendering engine.
//!
//! Writes the rendered Typst source next to its PDF in the reports directory
//! and invokes the Typst compiler to produce the final document.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{GeneratedDocument, GeneratorError};

/// Renders Typst sources into persisted source/PDF pairs.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    reports_dir: PathBuf,
    typst_bin: PathBuf,
}

impl TypstRenderEngine {
    pub fn new(reports_dir: impl Into<PathBuf>, typst_bin: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
            typst_bin: typst_bin.into(),
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Render a Typst string to `<stem>.typ` and `<stem>.pdf`.
    ///
    /// # Arguments
    /// * `file_stem` - Shared name of the output pair, without extension.
    /// * `typst_source` - The complete, rendered Typst source code string.
    /// * `date` - The date printed on the document.
    pub fn render(
        &self,
        file_stem: &str,
        typst_source: &str,
        date: String,
    ) -> Result<GeneratedDocument, GeneratorError> {
        fs::create_dir_all(&self.reports_dir).map_err(GeneratorError::ReportsDir)?;

        let source_path = self.reports_dir.join(format!("{}.typ", file_stem));
        let filename = format!("{}.pdf", file_stem);
        let pdf_path = self.reports_dir.join(&filename);

        fs::write(&source_path, typst_source).map_err(GeneratorError::WriteTypst)?;

        log::info!("Compiling {} to PDF", source_path.display());
        self.compile_typst_to_pdf(&source_path, &pdf_path)?;

        if !pdf_path.is_file() {
            return Err(GeneratorError::MissingPdf(pdf_path));
        }

        Ok(GeneratedDocument {
            filename,
            source_path,
            pdf_path,
            date,
        })
    }

    /// Compile a Typst source file to PDF.
    fn compile_typst_to_pdf(&self, typ_path: &Path, output_path: &Path) -> Result<(), GeneratorError> {
        let status = Command::new(&self.typst_bin)
            .arg("compile")
            .arg(typ_path)
            .arg(output_path)
            .status()
            .map_err(GeneratorError::TypstIo)?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            return Err(GeneratorError::TypstExit(code));
        }

        Ok(())
    }
}
