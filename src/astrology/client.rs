//! Client for the external placement and geocoding service.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::Serialize;
use serde_json::{json, Value};

use crate::chart::Subject;
use crate::error::AnalysisError;

/// Request body shared by the planets and houses endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRequest {
    pub year: i32,
    pub month: u32,
    pub date: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: f64,
}

impl ChartRequest {
    /// Build the request from a subject. The date must be `YYYY-MM-DD` and the
    /// time `HH:mm` or `HH:mm:ss`; missing seconds mean zero.
    pub fn from_subject(subject: &Subject) -> Result<Self, AnalysisError> {
        let date = NaiveDate::parse_from_str(subject.date_of_birth.trim(), "%Y-%m-%d")
            .map_err(|_| {
                AnalysisError::Validation(format!(
                    "Invalid date of birth '{}', expected YYYY-MM-DD",
                    subject.date_of_birth
                ))
            })?;

        let raw_time = subject.time_of_birth.trim();
        let time = NaiveTime::parse_from_str(raw_time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw_time, "%H:%M"))
            .map_err(|_| {
                AnalysisError::Validation(format!(
                    "Invalid time of birth '{}', expected HH:mm or HH:mm:ss",
                    subject.time_of_birth
                ))
            })?;

        let location = &subject.selected_location;
        Ok(Self {
            year: date.year(),
            month: date.month(),
            date: date.day(),
            hours: time.hour(),
            minutes: time.minute(),
            seconds: time.second(),
            latitude: location.latitude,
            longitude: location.longitude,
            timezone: location.timezone_offset,
        })
    }
}

/// Raw access to the placement service. Payloads are returned untyped and
/// go through `astrology::normalize` before use.
#[async_trait]
pub trait AstrologyClient: Send + Sync {
    async fn planets(&self, request: &ChartRequest) -> Result<Value, AnalysisError>;
    async fn houses(&self, request: &ChartRequest) -> Result<Value, AnalysisError>;
    async fn geo_details(&self, location: &str) -> Result<Value, AnalysisError>;
}

pub struct FreeAstrologyClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FreeAstrologyClient {
    pub fn new(http_client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, AnalysisError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AnalysisError::Upstream(format!("request to {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Astrology service {} returned {}: {}", path, status, body);
            return Err(AnalysisError::Upstream(format!("{} returned status {}", path, status)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AnalysisError::Upstream(format!("unparseable body from {}: {}", path, e)))
    }
}

#[async_trait]
impl AstrologyClient for FreeAstrologyClient {
    async fn planets(&self, request: &ChartRequest) -> Result<Value, AnalysisError> {
        self.post("/western/planets", request).await
    }

    async fn houses(&self, request: &ChartRequest) -> Result<Value, AnalysisError> {
        self.post("/western/houses", request).await
    }

    async fn geo_details(&self, location: &str) -> Result<Value, AnalysisError> {
        self.post("/geo-details", &json!({ "location": location })).await
    }
}
