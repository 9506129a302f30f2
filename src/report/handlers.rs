use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse};

use super::model::ReportRequest;
use super::traits::{Generator, Validator};
use crate::{AppState, ErrorResponse};

/// Render the engagement letter and return it as a PDF attachment
#[utoipa::path(
    post,
    path = "/generate_report",
    tag = "Reports",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Engagement letter PDF attachment"),
        (status = 400, description = "Invalid report request", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn generate_report(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ReportRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    if let Err(message) = request.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
    }

    let generator = state.reports.clone();
    let document = match web::block(move || generator.generate(request)).await {
        Ok(Ok(document)) => document,
        Ok(Err(e)) => {
            log::error!("Report generation failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to generate report"));
        }
        Err(e) => {
            log::error!("Report generation task failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to generate report"));
        }
    };

    match NamedFile::open(&document.pdf_path) {
        Ok(file) => file
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(document.filename)],
            })
            .into_response(&req),
        Err(e) => {
            log::error!("Failed to open {}: {}", document.pdf_path.display(), e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error("Failed to send PDF"))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/generate_report").route(web::post().to(generate_report)));
}
