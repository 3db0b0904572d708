use actix_web::{web, HttpResponse};

use crate::chart::{AnalysisResult, AnalyzeRequest, LocationValidation, Subject, ValidateLocationRequest};
use crate::error::AnalysisError;
use crate::{AppState, ErrorResponse};

#[utoipa::path(
    post,
    path = "/api/analyze",
    tag = "Analysis",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Big3, placements and interpretations", body = AnalysisResult),
        (status = 400, description = "Location not selected, malformed date/time or no placement data", body = ErrorResponse),
        (status = 502, description = "Placement or narrative service failed", body = ErrorResponse)
    )
)]
pub async fn analyze(
    state: web::Data<AppState>,
    request: web::Json<AnalyzeRequest>,
) -> Result<web::Json<AnalysisResult>, AnalysisError> {
    let result = state.analysis.analyze(request.into_inner()).await.map_err(|e| {
        log::warn!("Analysis request failed: {}", e);
        e
    })?;
    Ok(web::Json(result))
}

#[utoipa::path(
    post,
    path = "/api/validate-location",
    tag = "Analysis",
    request_body = ValidateLocationRequest,
    responses(
        (status = 200, description = "One or more matching locations", body = LocationValidation),
        (status = 400, description = "No location matched", body = LocationValidation),
        (status = 502, description = "Geocoding service failed", body = ErrorResponse)
    )
)]
pub async fn validate_location(
    state: web::Data<AppState>,
    request: web::Json<ValidateLocationRequest>,
) -> Result<HttpResponse, AnalysisError> {
    let locations = state.analysis.validate_location(&request.location).await?;

    if locations.is_empty() {
        return Ok(HttpResponse::BadRequest().json(LocationValidation::not_found()));
    }
    Ok(HttpResponse::Ok().json(LocationValidation::found(locations)))
}

#[utoipa::path(
    delete,
    path = "/api/analyze/cache",
    tag = "Analysis",
    request_body(content = Subject, description = "Subject whose cached analysis should be dropped; send no body to clear everything"),
    responses(
        (status = 204, description = "Cache cleared"),
        (status = 400, description = "Body is present but is not a complete subject", body = ErrorResponse)
    )
)]
pub async fn clear_cache(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AnalysisError> {
    // Only an absent body clears every entry.
    if body.iter().all(u8::is_ascii_whitespace) {
        state.analysis.clear(None).await;
        return Ok(HttpResponse::NoContent().finish());
    }

    let subject: Subject = serde_json::from_slice(&body).map_err(|e| {
        log::warn!("Rejected cache removal request: {}", e);
        AnalysisError::Validation(format!("Invalid subject: {}", e))
    })?;
    state.analysis.clear(Some(&subject)).await;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/analyze").route(web::post().to(analyze)))
        .service(web::resource("/analyze/cache").route(web::delete().to(clear_cache)))
        .service(web::resource("/validate-location").route(web::post().to(validate_location)));
}
