use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::traits::Validator;

/// Body of `POST /generate_report`.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct ReportRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub property_under_appraisal: Option<String>,
    pub parcel_id: Option<String>,
    /// Engagement fee in dollars, number or numeric string.
    #[schema(value_type = Option<f64>)]
    pub fee: Option<Value>,
    /// Percent of the fee due at signing.
    #[schema(value_type = Option<f64>)]
    pub due_signing: Option<Value>,
    /// Percent of the fee due at completion.
    #[schema(value_type = Option<f64>)]
    pub due_completion: Option<Value>,
    /// `YYYY-MM-DD`; today when missing or invalid.
    pub report_date: Option<String>,
}

impl ReportRequest {
    pub fn client_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default().trim()
    }
}

impl Validator for ReportRequest {
    fn validate(&self) -> Result<(), String> {
        if self.client_name().is_empty() {
            return Err("Client name is required".to_string());
        }
        Ok(())
    }
}
