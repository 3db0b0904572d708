use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod analysis;
pub mod astrology;
pub mod cache;
pub mod chart;
pub mod config;
pub mod error;
pub mod narrative;
pub mod report;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::error::AnalysisError;
pub use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message, safe to show to end users.
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

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::analysis::handlers::analyze,
        crate::analysis::handlers::validate_location,
        crate::analysis::handlers::clear_cache,
        crate::report::handlers::report_layout,
        crate::report::handlers::report_pdf,
        crate::report::handlers::report_snapshot
    ),
    components(
        schemas(
            chart::Location,
            chart::Subject,
            chart::Placement,
            chart::HousePlacement,
            chart::Big3,
            chart::AnalysisResult,
            chart::AnalyzeRequest,
            chart::ValidateLocationRequest,
            chart::LocationValidation,
            report::handlers::ReportRequest,
            report::Page,
            report::DrawOp,
            report::TextRun,
            report::TableGrid,
            report::content::FontWeight,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Analysis", description = "Natal chart analysis and location lookup."),
        (name = "Report", description = "Paginated report layout and rendering.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost")
    )
)]
pub struct ApiDoc;

/// Register every `/api` route on `cfg`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                log::warn!("Rejected request body: {}", err);
                AnalysisError::Validation(err.to_string()).into()
            }))
            .configure(analysis::handlers::config)
            .configure(report::handlers::config),
    );
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    log::debug!("Loaded {:?}", config);

    let app_state = web::Data::new(
        AppState::from_config(&config).context("Failed to create HTTP client")?,
    );

    let prometheus = PrometheusMetricsBuilder::new("natal_report_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create Prometheus metrics middleware: {}", e))?;

    let origins = config.cors_allowed_origins.clone();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .configure(configure_api)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
