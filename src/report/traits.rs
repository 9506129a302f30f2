//! Seams between the HTTP layer and document rendering.

use super::{GeneratedDocument, GeneratorError};

/// Input checks that must pass before anything is written to disk.
pub trait Validator {
    /// Human-readable reason on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Renders one persisted document pair per request.
pub trait Generator {
    type Request: Validator;

    fn generate(&self, request: Self::Request) -> Result<GeneratedDocument, GeneratorError>;
}
