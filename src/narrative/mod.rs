//! Narrative generation and cleanup.

pub mod client;
pub mod prompt;
pub mod sanitize;

pub use client::{GeminiClient, GenerationConfig, NarrativeGenerator};
pub use prompt::{house_prompt, planet_prompt};
pub use sanitize::sanitize_narrative;

pub const NO_PLANET_DATA: &str = "No planet data available.";
pub const NO_HOUSE_DATA: &str = "No house data available.";
