//! Process configuration read from the environment (and `.env`).

use std::env;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_ASTROLOGY_API_BASE: &str = "https://json.freeastrologyapi.com";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// One global slot; a new subject evicts the previous one.
    Single,
    /// One entry per subject fingerprint.
    Keyed,
}

impl FromStr for CacheMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(CacheMode::Single),
            "keyed" => Ok(CacheMode::Keyed),
            _ => Err(()),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub astrology_api_key: String,
    pub astrology_api_base: String,
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub host: String,
    pub port: u16,
    pub cache_mode: CacheMode,
    pub cache_capacity: u64,
    pub typst_bin: String,
    pub cors_allowed_origins: Vec<String>,
}

// API keys stay out of Debug output so the config can be logged.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("astrology_api_base", &self.astrology_api_base)
            .field("gemini_api_base", &self.gemini_api_base)
            .field("gemini_model", &self.gemini_model)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cache_mode", &self.cache_mode)
            .field("cache_capacity", &self.cache_capacity)
            .field("typst_bin", &self.typst_bin)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));
        let or_default = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        fn parsed<T: FromStr>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
            match raw {
                None => Ok(default),
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid { name, value }),
            }
        }

        let cors_allowed_origins = or_default("CORS_ALLOWED_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            astrology_api_key: required("FREE_ASTROLOGY_API_KEY")?,
            astrology_api_base: or_default("ASTROLOGY_API_BASE", DEFAULT_ASTROLOGY_API_BASE),
            gemini_api_key: required("GEMINI_API_KEY")?,
            gemini_api_base: or_default("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            gemini_model: or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            host: or_default("HOST", "0.0.0.0"),
            port: parsed("PORT", var("PORT"), 8080)?,
            cache_mode: parsed("ANALYSIS_CACHE_MODE", var("ANALYSIS_CACHE_MODE"), CacheMode::Keyed)?,
            cache_capacity: parsed("ANALYSIS_CACHE_CAPACITY", var("ANALYSIS_CACHE_CAPACITY"), 1000)?,
            typst_bin: or_default("TYPST_BIN", "typst"),
            cors_allowed_origins,
        })
    }
}
