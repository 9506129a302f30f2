use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{error, http::header, web, App, HttpResponse, HttpServer, Responder};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod config;
pub mod delivery;
pub mod portal;
pub mod report;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    pub kind: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(kind: &str, message: &str) -> Self {
        Self {
            error: message.to_string(),
            kind: kind.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = String)
    )
)]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().body("THG Backend Running")
}

/// Reject unreadable JSON bodies with the standard error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = ErrorResponse::bad_request(&format!("Invalid request body: {}", err));
        error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

/// Every public route, mounted at the root.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(home))
        .configure(auth::config)
        .configure(portal::config)
        .configure(report::config)
        .configure(delivery::config);
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::home,
        crate::auth::handlers::login,
        crate::portal::handlers::fetch_parcel_ui,
        crate::report::handlers::generate_report,
        crate::delivery::handlers::send_email
    ),
    components(
        schemas(
            ErrorResponse,
            auth::model::LoginRequest,
            auth::model::LoginResponse,
            portal::model::ParcelLookupRequest,
            portal::model::ParcelResponse,
            report::model::ReportRequest,
            delivery::model::SendEmailRequest,
            delivery::model::SendEmailResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness."),
        (name = "Authentication", description = "Login against the configured user table."),
        (name = "Parcel Lookup", description = "Parcel ID lookup on the county-records portal."),
        (name = "Reports", description = "Engagement letter rendering."),
        (name = "Delivery", description = "Archival and email delivery of rendered letters.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Local server")
    )
)]
pub struct ApiDoc;

fn cors(origins: &[String]) -> Cors {
    if origins.is_empty() {
        return Cors::permissive();
    }

    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let app_state = web::Data::new(AppState::from_config(&config)?);

    let prometheus = PrometheusMetricsBuilder::new("appraisal_engagement_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("failed to create Prometheus metrics middleware: {}", e))?;

    let origins = config.cors_origins.clone();
    if origins.is_empty() {
        log::warn!("CORS_ALLOWED_ORIGINS is empty; allowing every origin");
    }

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors(&origins))
            .app_data(app_state.clone())
            .configure(routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
