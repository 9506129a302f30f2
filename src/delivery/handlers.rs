use actix_web::{web, HttpResponse};

use super::mailer::compose_engagement_mail;
use super::model::{SendEmailRequest, SendEmailResponse};
use crate::{AppState, ErrorResponse};

/// Archive a generated letter and email it to the client
#[utoipa::path(
    post,
    path = "/send_email",
    tag = "Delivery",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Email sent, or archived without email", body = SendEmailResponse),
        (status = 400, description = "PDF path missing", body = ErrorResponse),
        (status = 500, description = "Email failed", body = ErrorResponse)
    )
)]
pub async fn send_email(state: web::Data<AppState>, body: web::Json<SendEmailRequest>) -> HttpResponse {
    let request = body.into_inner();
    let Some(pdf_name) = request.pdf_file_name() else {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request("PDF path missing"));
    };

    // Archive failures never block the email.
    let archiver = state.archive.clone();
    let (name, client, address) = (
        pdf_name.clone(),
        request.client_name.clone(),
        request.address.clone(),
    );
    match web::block(move || archiver.archive(&name, client.as_deref(), address.as_deref())).await {
        Ok(Ok(dest)) => log::info!("Archived {} to {}", pdf_name, dest.display()),
        Ok(Err(e)) => log::warn!("Archiving {} failed: {}", pdf_name, e),
        Err(e) => log::warn!("Archive task for {} failed: {}", pdf_name, e),
    }

    let Some(mailer) = state.mailer.clone() else {
        log::warn!("SMTP is not configured; {} was not emailed", pdf_name);
        return HttpResponse::Ok().json(SendEmailResponse::warning("PDF archived, but email not sent"));
    };

    let source = state.reports.reports_dir().join(&pdf_name);
    let attachment = match tokio::fs::read(&source).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Failed to read {}: {}", source.display(), e);
            return HttpResponse::InternalServerError().json(ErrorResponse::internal_error("Email failed"));
        }
    };

    let mail = compose_engagement_mail(
        request.customer_email.as_deref().unwrap_or_default(),
        request.client_name.as_deref(),
        request.address.as_deref(),
        &pdf_name,
        attachment,
    );

    match mailer.send(mail).await {
        Ok(()) => HttpResponse::Ok().json(SendEmailResponse::sent()),
        Err(e) => {
            log::error!("Email for {} failed: {}", pdf_name, e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error("Email failed"))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/send_email").route(web::post().to(send_email)));
}
