use actix_web::{web, HttpResponse, Responder};

use super::model::{ParcelLookupRequest, ParcelResponse};
use crate::{AppState, ErrorResponse};

/// Look up a parcel ID on the county-records portal
#[utoipa::path(
    post,
    path = "/fetch_parcel_ui",
    tag = "Parcel Lookup",
    request_body = ParcelLookupRequest,
    responses(
        (status = 200, description = "Parcel found", body = ParcelResponse),
        (status = 400, description = "Missing address or county", body = ErrorResponse),
        (status = 404, description = "Parcel ID not found", body = ErrorResponse),
        (status = 500, description = "Portal automation failed", body = ErrorResponse)
    )
)]
pub async fn fetch_parcel_ui(
    state: web::Data<AppState>,
    body: web::Json<ParcelLookupRequest>,
) -> impl Responder {
    let query = match body.into_inner().into_query() {
        Some(query) => query,
        None => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::bad_request("Missing address or county"));
        }
    };

    match state.portal.lookup_parcel(query).await {
        Ok(Some(parcel_id)) => HttpResponse::Ok().json(ParcelResponse { parcel_id }),
        Ok(None) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found("Parcel ID not found"))
        }
        Err(e) => {
            log::error!("Portal lookup error: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error("CRS Bot failed"))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/fetch_parcel_ui").route(web::post().to(fetch_parcel_ui)));
}
