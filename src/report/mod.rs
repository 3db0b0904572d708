//! Report composition and rendering.
//!
//! - `content` - the ordered block model built from a subject and its analysis
//! - `layout` - the pure paginated composer
//! - `render` - the Typst backend that turns pages into PDF or PNG bytes

pub mod config;
pub mod content;
pub mod handlers;
pub mod layout;
pub mod metrics;
pub mod render;
pub mod wrap;

pub use config::PageConfig;
pub use content::{Block, NarrativeBlock, ReportContent};
pub use layout::{compose, DrawOp, Page, TableGrid, TextRun};
pub use metrics::{FontMetrics, Helvetica};
pub use render::{RenderError, ReportRenderer, TypstRenderer};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid page configuration: {0}")]
    InvalidConfig(String),
    #[error("block of {height}pt cannot fit in {available}pt of usable page height")]
    BlockTooTall { height: f32, available: f32 },
}

pub const PDF_FILENAME: &str = "spirit-personality-analysis.pdf";
pub const SNAPSHOT_FILENAME: &str = "spirit-personality-analysis.png";
