//! The analyze pipeline: cache, placements, Big3, narratives.

use std::sync::Arc;

use crate::astrology::{
    extract_big3, normalize_houses, normalize_locations, normalize_planets, AstrologyClient,
    ChartRequest,
};
use crate::cache::AnalysisCache;
use crate::chart::{AnalysisResult, AnalyzeRequest, HousePlacement, Location, Placement, Subject};
use crate::error::AnalysisError;
use crate::narrative::{
    house_prompt, planet_prompt, GenerationConfig, NarrativeGenerator, NO_HOUSE_DATA,
    NO_PLANET_DATA,
};

#[derive(Clone)]
pub struct AnalysisService {
    astrology: Arc<dyn AstrologyClient>,
    narrator: Arc<dyn NarrativeGenerator>,
    cache: AnalysisCache,
    generation: GenerationConfig,
}

impl AnalysisService {
    pub fn new(
        astrology: Arc<dyn AstrologyClient>,
        narrator: Arc<dyn NarrativeGenerator>,
        cache: AnalysisCache,
    ) -> Self {
        Self {
            astrology,
            narrator,
            cache,
            generation: GenerationConfig::default(),
        }
    }

    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Run the full pipeline for `request`, reusing a cached result when the
    /// subject is unchanged in every field.
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisResult, AnalysisError> {
        let subject = request.into_subject()?;

        if let Some(cached) = self.cache.lookup(&subject).await {
            log::info!("Analysis cache hit for {}", subject.name);
            return Ok(cached);
        }
        log::info!("Analysis cache miss for {}, generating", subject.name);

        let chart = ChartRequest::from_subject(&subject)?;
        let (planets, houses) = self.fetch_placements(&chart).await?;
        log::info!(
            "Normalized {} planet and {} house placements",
            planets.len(),
            houses.len()
        );

        if planets.is_empty() && houses.is_empty() {
            return Err(AnalysisError::EmptyResult);
        }

        let big3 = extract_big3(&planets);
        let (planet_interpretation, house_interpretation) =
            self.interpret(&subject, &planets, &houses).await;

        let result = AnalysisResult {
            big3,
            planets,
            houses,
            planet_interpretation,
            house_interpretation,
        };
        self.cache.store(subject, result.clone()).await;
        Ok(result)
    }

    async fn fetch_placements(
        &self,
        chart: &ChartRequest,
    ) -> Result<(Vec<Placement>, Vec<HousePlacement>), AnalysisError> {
        let (raw_planets, raw_houses) =
            futures::try_join!(self.astrology.planets(chart), self.astrology.houses(chart))?;
        Ok((normalize_planets(&raw_planets), normalize_houses(&raw_houses)))
    }

    async fn interpret(
        &self,
        subject: &Subject,
        planets: &[Placement],
        houses: &[HousePlacement],
    ) -> (String, String) {
        let planet_side = async {
            if planets.is_empty() {
                return NO_PLANET_DATA.to_string();
            }
            let prompt = planet_prompt(&subject.name, planets);
            self.narrate(&prompt, NO_PLANET_DATA, "planet").await
        };
        let house_side = async {
            if houses.is_empty() {
                return NO_HOUSE_DATA.to_string();
            }
            let prompt = house_prompt(&subject.name, houses);
            self.narrate(&prompt, NO_HOUSE_DATA, "house").await
        };

        futures::join!(planet_side, house_side)
    }

    async fn narrate(&self, prompt: &str, fallback: &str, side: &str) -> String {
        match self.narrator.generate(prompt, &self.generation).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("{} narrative degraded to fallback: {}", side, e);
                fallback.to_string()
            }
        }
    }

    /// Geocode a free-text place name into candidate locations.
    pub async fn validate_location(&self, location: &str) -> Result<Vec<Location>, AnalysisError> {
        let query = location.trim();
        if query.is_empty() {
            return Err(AnalysisError::Validation("Location is required".to_string()));
        }

        let payload = self.astrology.geo_details(query).await?;
        let locations = normalize_locations(&payload);
        log::info!("Location lookup for '{}' matched {} result(s)", query, locations.len());
        Ok(locations)
    }

    /// Drop the cached analysis for `subject`, or every cached analysis when `None`.
    pub async fn clear(&self, subject: Option<&Subject>) {
        match subject {
            Some(subject) => {
                self.cache.forget(subject).await;
                log::info!("Cleared cached analysis for {}", subject.name);
            }
            None => {
                self.cache.clear().await;
                log::info!("Cleared all cached analyses");
            }
        }
    }
}
