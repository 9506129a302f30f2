use serde::{Deserialize, Serialize};
use std::path::Path;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SendEmailRequest {
    /// Name of a PDF previously produced by `/generate_report`
    pub pdf_path: Option<String>,
    pub customer_email: Option<String>,
    pub client_name: Option<String>,
    pub address: Option<String>,
}

impl SendEmailRequest {
    /// File name of the referenced PDF, stripped of any directory part.
    pub fn pdf_file_name(&self) -> Option<String> {
        let raw = self.pdf_path.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        let base = Path::new(raw).file_name()?.to_str()?;
        let clean = sanitize_filename::sanitize(base);
        (!clean.is_empty()).then_some(clean)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendEmailResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SendEmailResponse {
    pub fn sent() -> Self {
        Self {
            success: Some(true),
            warning: None,
        }
    }

    pub fn warning(message: &str) -> Self {
        Self {
            success: None,
            warning: Some(message.to_string()),
        }
    }
}
