use serde::Serialize;
use serde_json::Value;

use super::format::{format_currency, format_date, format_percent};
use super::model::ReportRequest;

/// Presentation-formatted fields merged into the engagement letter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderingContext {
    pub date: String,
    pub name: String,
    pub address: String,
    pub property_under_appraisal: String,
    pub parcel_id: String,
    pub fee: String,
    pub due_signing: String,
    pub due_completion: String,
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn amount<F>(value: &Option<Value>, format: F) -> String
where
    F: Fn(&Value) -> String,
{
    value.as_ref().map(format).unwrap_or_default()
}

impl From<&ReportRequest> for RenderingContext {
    fn from(request: &ReportRequest) -> Self {
        Self {
            date: format_date(request.report_date.as_deref()),
            name: text(&request.name),
            address: text(&request.address),
            property_under_appraisal: text(&request.property_under_appraisal),
            parcel_id: text(&request.parcel_id),
            fee: amount(&request.fee, format_currency),
            due_signing: amount(&request.due_signing, format_percent),
            due_completion: amount(&request.due_completion, format_percent),
        }
    }
}

impl RenderingContext {
    /// Field name / value pairs in template order.
    pub fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("date", &self.date),
            ("name", &self.name),
            ("address", &self.address),
            ("property_under_appraisal", &self.property_under_appraisal),
            ("parcel_id", &self.parcel_id),
            ("fee", &self.fee),
            ("due_signing", &self.due_signing),
            ("due_completion", &self.due_completion),
        ]
    }
}
