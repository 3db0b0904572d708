//! Failure taxonomy for the analysis pipeline.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::ErrorResponse;

/// User-visible text for failures whose detail stays in the logs.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to generate analysis. Please check your API key and try again.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Missing location or malformed date/time fields.
    #[error("{0}")]
    Validation(String),
    /// Placement or geocoding service returned a non-success status or an unparseable body.
    #[error("upstream service failed: {0}")]
    Upstream(String),
    /// The narrative service call failed.
    #[error("narrative generation failed: {0}")]
    Generation(String),
    /// Both placement lists normalized to empty.
    #[error("No data available")]
    EmptyResult,
}

impl AnalysisError {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Validation(_) => "ValidationError",
            AnalysisError::Upstream(_) => "UpstreamError",
            AnalysisError::Generation(_) => "GenerationError",
            AnalysisError::EmptyResult => "EmptyResultError",
        }
    }

    fn public_message(&self) -> String {
        match self {
            AnalysisError::Validation(_) | AnalysisError::EmptyResult => self.to_string(),
            AnalysisError::Upstream(_) | AnalysisError::Generation(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

impl ResponseError for AnalysisError {
    fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::Validation(_) | AnalysisError::EmptyResult => StatusCode::BAD_REQUEST,
            AnalysisError::Upstream(_) | AnalysisError::Generation(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(ErrorResponse::new(self.kind(), &self.public_message()))
    }
}
