//! Generator for appraisal engagement letters.
//!
//! Binds the formatted [`RenderingContext`] as a Typst dictionary named `ctx`
//! ahead of the template body, then hands the source to the render engine.

use std::fs;
use std::path::{Path, PathBuf};

use super::common::{engagement_file_stem, escape_typst_string, get_static_dir};
use super::context::RenderingContext;
use super::engine::TypstRenderEngine;
use super::model::ReportRequest;
use super::traits::Generator;
use super::{GeneratedDocument, GeneratorError};

pub const TEMPLATE_FILE: &str = "engagement_letter.typ";

pub struct EngagementLetterGenerator {
    template: String,
    engine: TypstRenderEngine,
}

impl EngagementLetterGenerator {
    /// Load the template at `template_path`.
    pub fn new(
        template_path: &Path,
        reports_dir: impl Into<PathBuf>,
        typst_bin: impl Into<PathBuf>,
    ) -> Result<Self, GeneratorError> {
        let template = fs::read_to_string(template_path).map_err(GeneratorError::TemplateIo)?;
        Ok(Self {
            template,
            engine: TypstRenderEngine::new(reports_dir, typst_bin),
        })
    }

    /// Use the bundled template from the static directory.
    pub fn with_bundled_template(
        reports_dir: impl Into<PathBuf>,
        typst_bin: impl Into<PathBuf>,
    ) -> Result<Self, GeneratorError> {
        Self::new(&get_static_dir().join(TEMPLATE_FILE), reports_dir, typst_bin)
    }

    pub fn reports_dir(&self) -> &Path {
        self.engine.reports_dir()
    }

    /// Full Typst source for one letter.
    pub fn render_source(&self, ctx: &RenderingContext) -> String {
        let mut source = String::from("#let ctx = (\n");
        for (key, value) in ctx.fields() {
            source.push_str(&format!("  {}: \"{}\",\n", key, escape_typst_string(value)));
        }
        source.push_str(")\n\n");
        source.push_str(&self.template);
        source
    }
}

impl Generator for EngagementLetterGenerator {
    type Request = ReportRequest;

    fn generate(&self, request: ReportRequest) -> Result<GeneratedDocument, GeneratorError> {
        let ctx = RenderingContext::from(&request);
        let stem = engagement_file_stem(request.client_name());

        log::info!("Rendering engagement letter {}", stem);
        let document = self
            .engine
            .render(&stem, &self.render_source(&ctx), ctx.date.clone())?;
        log::info!("Engagement letter ready: {}", document.pdf_path.display());

        Ok(document)
    }
}
