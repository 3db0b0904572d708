use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A geocoded birthplace as returned by the location lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    #[schema(example = 106.8456)]
    pub longitude: f64,
    #[schema(example = -6.2088)]
    pub latitude: f64,
    /// Hours from UTC, fractional for half-hour zones.
    #[serde(default)]
    #[schema(example = 7.0)]
    pub timezone_offset: f64,
    #[serde(default)]
    #[schema(example = "Asia/Jakarta")]
    pub timezone: String,
    #[serde(default)]
    #[schema(example = "Jakarta")]
    pub location_name: String,
    #[serde(default)]
    #[schema(example = "Jakarta, Daerah Khusus Ibukota Jakarta, Indonesia")]
    pub complete_name: String,
    #[serde(default)]
    #[schema(example = "Indonesia")]
    pub country: String,
    #[serde(default)]
    pub administrative_zone_1: String,
    #[serde(default)]
    pub administrative_zone_2: String,
}

/// The person a chart is generated for. Cache identity is the whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[schema(example = "Rina Maharani")]
    pub name: String,
    #[schema(example = "rina@example.com")]
    pub email: String,
    #[schema(example = "1994-03-21")]
    pub date_of_birth: String,
    #[schema(example = "06:45")]
    pub time_of_birth: String,
    #[schema(example = "Jakarta")]
    pub place_of_birth: String,
    pub selected_location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Placement {
    #[schema(example = "Sun")]
    pub name: String,
    #[schema(example = "Aries")]
    pub sign: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HousePlacement {
    /// Always within 1..=12 and unique within one result.
    #[schema(example = 1, minimum = 1, maximum = 12)]
    pub house: u8,
    #[schema(example = "Leo")]
    pub sign: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Big3 {
    pub ascendant: String,
    pub sun: String,
    pub moon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub big3: Big3,
    pub planets: Vec<Placement>,
    pub houses: Vec<HousePlacement>,
    pub planet_interpretation: String,
    pub house_interpretation: String,
}

/// A computed result together with the exact input that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub subject: Subject,
    pub result: AnalysisResult,
}

/// Body of `POST /api/analyze`. Every field is optional on the wire so a
/// missing location surfaces as a validation error instead of a parse failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeRequest {
    pub name: String,
    pub email: String,
    #[schema(example = "1994-03-21")]
    pub date_of_birth: String,
    #[schema(example = "06:45")]
    pub time_of_birth: String,
    pub place_of_birth: String,
    pub selected_location: Option<Location>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateLocationRequest {
    #[serde(default)]
    #[schema(example = "Jakarta")]
    pub location: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationValidation {
    pub valid: bool,
    pub locations: Vec<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LocationValidation {
    pub fn found(locations: Vec<Location>) -> Self {
        Self {
            valid: !locations.is_empty(),
            locations,
            error: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            valid: false,
            locations: Vec::new(),
            error: Some("Location not found".to_string()),
        }
    }
}
