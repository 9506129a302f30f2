//! Common utilities for document generation.

use std::path::Path;

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

/// File stem shared by both halves of a document pair, e.g.
/// `Engagement_Letter_Jane_Doe`.
pub fn engagement_file_stem(client_name: &str) -> String {
    let safe_name = client_name.trim().replace([' ', '/'], "_");
    sanitize_filename::sanitize(format!("Engagement_Letter_{}", safe_name))
}

/// Get the static assets directory path.
pub fn get_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}
