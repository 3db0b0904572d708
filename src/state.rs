use std::sync::Arc;
use std::time::Duration;

use crate::analysis::AnalysisService;
use crate::astrology::{AstrologyClient, FreeAstrologyClient};
use crate::cache::AnalysisCache;
use crate::config::{AppConfig, CacheMode};
use crate::narrative::{GeminiClient, NarrativeGenerator};
use crate::report::{PageConfig, ReportRenderer, TypstRenderer};

#[derive(Clone)]
pub struct AppState {
    pub analysis: AnalysisService,
    pub renderer: Arc<dyn ReportRenderer>,
    pub page_config: PageConfig,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(900))
            .user_agent("natal-report-server/1.0")
            .build()?;

        let astrology = Arc::new(FreeAstrologyClient::new(
            http_client.clone(),
            &config.astrology_api_base,
            &config.astrology_api_key,
        ));
        let narrator = Arc::new(GeminiClient::new(
            http_client,
            &config.gemini_api_base,
            &config.gemini_model,
            &config.gemini_api_key,
        ));
        let cache = match config.cache_mode {
            CacheMode::Single => AnalysisCache::single_slot(),
            CacheMode::Keyed => AnalysisCache::keyed(config.cache_capacity),
        };
        let renderer = Arc::new(TypstRenderer::new(config.typst_bin.clone()));

        Ok(Self::new_with_collaborators(
            astrology,
            narrator,
            cache,
            renderer,
            PageConfig::default(),
        ))
    }

    /// Assemble state from explicit collaborators; tests pass mocks here.
    pub fn new_with_collaborators(
        astrology: Arc<dyn AstrologyClient>,
        narrator: Arc<dyn NarrativeGenerator>,
        cache: AnalysisCache,
        renderer: Arc<dyn ReportRenderer>,
        page_config: PageConfig,
    ) -> Self {
        Self {
            analysis: AnalysisService::new(astrology, narrator, cache),
            renderer,
            page_config,
        }
    }
}
