//! Placement retrieval and normalization.

pub mod big3;
pub mod client;
pub mod normalize;

pub use big3::extract_big3;
pub use client::{AstrologyClient, ChartRequest, FreeAstrologyClient};
pub use normalize::{normalize_houses, normalize_locations, normalize_planets};
