#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use natal_report_server::astrology::{AstrologyClient, ChartRequest};
use natal_report_server::cache::AnalysisCache;
use natal_report_server::chart::Location;
use natal_report_server::narrative::{GenerationConfig, NarrativeGenerator};
use natal_report_server::report::{Page, PageConfig, RenderError, ReportRenderer};
use natal_report_server::{AnalysisError, AppState};
use natal_report_server::chart::AnalysisResult;
use serde_json::{json, Value};

pub const ZODIAC: [&str; 12] = [
    "Aries", "Taurus", "Gemini", "Cancer", "Leo", "Virgo", "Libra", "Scorpio", "Sagittarius",
    "Capricorn", "Aquarius", "Pisces",
];

pub fn planets_payload(entries: &[(&str, &str)]) -> Value {
    let output: Vec<Value> = entries
        .iter()
        .map(|(planet, sign)| {
            json!({
                "planet": { "en": planet },
                "zodiac_sign": { "name": { "en": sign } }
            })
        })
        .collect();
    json!({ "statusCode": 200, "output": output })
}

pub fn houses_payload(count: usize) -> Value {
    let houses: Vec<Value> = (1..=count)
        .map(|n| {
            json!({
                "House": n,
                "zodiac_sign": { "name": { "en": ZODIAC[(n - 1) % 12] } }
            })
        })
        .collect();
    json!({ "statusCode": 200, "output": { "Houses": houses } })
}

pub fn empty_payload() -> Value {
    json!({ "statusCode": 200, "output": [] })
}

/// In-memory placement service with per-method call counters.
pub struct MockAstrology {
    pub planets: Value,
    pub houses: Value,
    pub geo: Value,
    pub fail_placements: bool,
    pub planet_calls: AtomicUsize,
    pub house_calls: AtomicUsize,
    pub geo_calls: AtomicUsize,
}

impl MockAstrology {
    pub fn new(planets: Value, houses: Value) -> Self {
        Self {
            planets,
            houses,
            geo: json!([]),
            fail_placements: false,
            planet_calls: AtomicUsize::new(0),
            house_calls: AtomicUsize::new(0),
            geo_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_geo(mut self, geo: Value) -> Self {
        self.geo = geo;
        self
    }

    pub fn failing() -> Self {
        Self {
            fail_placements: true,
            ..Self::new(empty_payload(), empty_payload())
        }
    }

    pub fn placement_calls(&self) -> usize {
        self.planet_calls.load(Ordering::SeqCst) + self.house_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AstrologyClient for MockAstrology {
    async fn planets(&self, _request: &ChartRequest) -> Result<Value, AnalysisError> {
        self.planet_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_placements {
            return Err(AnalysisError::Upstream("/western/planets returned status 401".to_string()));
        }
        Ok(self.planets.clone())
    }

    async fn houses(&self, _request: &ChartRequest) -> Result<Value, AnalysisError> {
        self.house_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_placements {
            return Err(AnalysisError::Upstream("/western/houses returned status 401".to_string()));
        }
        Ok(self.houses.clone())
    }

    async fn geo_details(&self, _location: &str) -> Result<Value, AnalysisError> {
        self.geo_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.geo.clone())
    }
}

/// Echoes a markdown-wrapped interpretation. Prompts containing
/// `fail_on` fail with a generation error.
pub struct MockNarrator {
    pub fail_on: Option<&'static str>,
    pub calls: AtomicUsize,
}

impl MockNarrator {
    pub fn new() -> Self {
        Self { fail_on: None, calls: AtomicUsize::new(0) }
    }

    pub fn failing_on(marker: &'static str) -> Self {
        Self { fail_on: Some(marker), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NarrativeGenerator for MockNarrator {
    async fn generate(&self, prompt: &str, _config: &GenerationConfig) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(marker) = self.fail_on {
            if prompt.contains(marker) {
                return Err(AnalysisError::Generation("quota exceeded".to_string()));
            }
        }
        let side = if prompt.contains("house placements") { "houses" } else { "planets" };
        Ok(format!("```markdown\n**Interpretation** of {}\n```", side))
    }
}

/// Returns fixed bytes and counts the pages it was handed.
pub struct StubRenderer {
    pub pages_seen: AtomicUsize,
}

impl StubRenderer {
    pub fn new() -> Self {
        Self { pages_seen: AtomicUsize::new(0) }
    }
}

impl ReportRenderer for StubRenderer {
    fn render_pdf(&self, pages: &[Page], _config: &PageConfig) -> Result<Vec<u8>, RenderError> {
        self.pages_seen.store(pages.len(), Ordering::SeqCst);
        Ok(b"%PDF-1.7 stub".to_vec())
    }

    fn render_snapshot(&self, _result: &AnalysisResult) -> Result<Vec<u8>, RenderError> {
        Ok(b"\x89PNG stub".to_vec())
    }
}

pub fn app_state(
    astrology: Arc<MockAstrology>,
    narrator: Arc<MockNarrator>,
    renderer: Arc<StubRenderer>,
) -> AppState {
    AppState::new_with_collaborators(
        astrology,
        narrator,
        AnalysisCache::keyed(100),
        renderer,
        PageConfig::default(),
    )
}

pub fn jakarta() -> Location {
    Location {
        longitude: 106.8456,
        latitude: -6.2088,
        timezone_offset: 7.0,
        timezone: "Asia/Jakarta".to_string(),
        location_name: "Jakarta".to_string(),
        complete_name: "Jakarta, Indonesia".to_string(),
        country: "Indonesia".to_string(),
        administrative_zone_1: String::new(),
        administrative_zone_2: String::new(),
    }
}

pub fn analyze_body() -> Value {
    json!({
        "name": "Rina",
        "email": "rina@example.com",
        "dateOfBirth": "1994-03-21",
        "timeOfBirth": "06:45",
        "placeOfBirth": "Jakarta",
        "selectedLocation": jakarta()
    })
}

pub fn standard_planets() -> Value {
    planets_payload(&[("Ascendant", "Leo"), ("Sun", "Aries"), ("Moon", "Cancer")])
}
