use actix_web::{http::header, web, HttpResponse, Responder};
use serde::Deserialize;
use utoipa::ToSchema;

use super::{compose, Helvetica, Page, ReportContent, PDF_FILENAME, SNAPSHOT_FILENAME};
use crate::chart::{AnalysisResult, Subject};
use crate::{AppState, ErrorResponse};

/// A finished analysis together with the subject it belongs to.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReportRequest {
    pub subject: Subject,
    pub result: AnalysisResult,
}

fn attachment(content_type: &'static str, filename: &str, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(bytes)
}

fn compose_report(state: &AppState, request: &ReportRequest) -> Result<Vec<Page>, HttpResponse> {
    let content = ReportContent::from_analysis(&request.subject, &request.result);
    compose(&content, &state.page_config, &Helvetica).map_err(|e| {
        log::error!("Report layout failed: {}", e);
        HttpResponse::UnprocessableEntity().json(ErrorResponse::new("LayoutError", &e.to_string()))
    })
}

fn render_failed(e: impl std::fmt::Display) -> HttpResponse {
    log::error!("Report rendering failed: {}", e);
    HttpResponse::InternalServerError()
        .json(ErrorResponse::internal_error("Failed to render report"))
}

#[utoipa::path(
    post,
    path = "/api/report/layout",
    tag = "Report",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Composed pages with positioned draw operations", body = Vec<Page>),
        (status = 422, description = "Page configuration cannot hold the report", body = ErrorResponse)
    )
)]
pub async fn report_layout(
    state: web::Data<AppState>,
    request: web::Json<ReportRequest>,
) -> impl Responder {
    match compose_report(&state, &request) {
        Ok(pages) => {
            log::info!("Composed report for {} into {} page(s)", request.subject.name, pages.len());
            HttpResponse::Ok().json(pages)
        }
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/api/report/pdf",
    tag = "Report",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Paginated PDF report", body = Vec<u8>, content_type = "application/pdf"),
        (status = 422, description = "Page configuration cannot hold the report", body = ErrorResponse),
        (status = 500, description = "Rendering backend failed", body = ErrorResponse)
    )
)]
pub async fn report_pdf(
    state: web::Data<AppState>,
    request: web::Json<ReportRequest>,
) -> impl Responder {
    let pages = match compose_report(&state, &request) {
        Ok(pages) => pages,
        Err(response) => return response,
    };

    let renderer = state.renderer.clone();
    let page_config = state.page_config.clone();
    match web::block(move || renderer.render_pdf(&pages, &page_config)).await {
        Ok(Ok(bytes)) => {
            log::info!("Rendered PDF report ({} bytes)", bytes.len());
            attachment("application/pdf", PDF_FILENAME, bytes)
        }
        Ok(Err(e)) => render_failed(e),
        Err(e) => render_failed(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/report/snapshot",
    tag = "Report",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "PNG image of the result panel", body = Vec<u8>, content_type = "image/png"),
        (status = 500, description = "Rendering backend failed", body = ErrorResponse)
    )
)]
pub async fn report_snapshot(
    state: web::Data<AppState>,
    request: web::Json<ReportRequest>,
) -> impl Responder {
    let renderer = state.renderer.clone();
    let result = request.into_inner().result;
    match web::block(move || renderer.render_snapshot(&result)).await {
        Ok(Ok(bytes)) => attachment("image/png", SNAPSHOT_FILENAME, bytes),
        Ok(Err(e)) => render_failed(e),
        Err(e) => render_failed(e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/report/layout").route(web::post().to(report_layout)))
        .service(web::resource("/report/pdf").route(web::post().to(report_pdf)))
        .service(web::resource("/report/snapshot").route(web::post().to(report_snapshot)));
}
