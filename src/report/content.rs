//! Content model fed to the composer.

use crate::chart::{AnalysisResult, Subject};
use crate::narrative::sanitize_narrative;

pub const REPORT_TITLE: &str = "Spirit Personality Analysis";
pub const PLANETS_HEADING: &str = "Planets Interpretation:";
pub const HOUSES_HEADING: &str = "Houses Interpretation:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

/// A block that is never split across pages.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedBlock {
    pub lines: Vec<String>,
    pub font_size: f32,
    pub line_height: f32,
    pub weight: FontWeight,
    pub spacing_after: f32,
    /// Body lines that must fit below this block on the same page.
    pub keep_with_next: usize,
}

impl FixedBlock {
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    fn title(text: &str) -> Self {
        Self {
            lines: vec![text.to_string()],
            font_size: 22.0,
            line_height: 24.0,
            weight: FontWeight::Bold,
            spacing_after: 6.0,
            keep_with_next: 0,
        }
    }

    fn metadata(lines: Vec<String>) -> Self {
        Self {
            lines,
            font_size: 12.0,
            line_height: 15.0,
            weight: FontWeight::Regular,
            spacing_after: 0.0,
            keep_with_next: 0,
        }
    }

    fn summary(text: String) -> Self {
        Self {
            lines: vec![text],
            font_size: 16.0,
            line_height: 18.0,
            weight: FontWeight::Bold,
            spacing_after: 12.0,
            keep_with_next: 0,
        }
    }

    fn heading(text: &str) -> Self {
        Self {
            lines: vec![text.to_string()],
            font_size: 14.0,
            line_height: 16.0,
            weight: FontWeight::Bold,
            spacing_after: 4.0,
            keep_with_next: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Generated narrative, sanitized on construction. The raw text is not kept,
/// so only cleaned text can reach layout.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeBlock {
    text: String,
}

impl NarrativeBlock {
    pub fn from_generated(raw: &str) -> Self {
        Self {
            text: sanitize_narrative(raw),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Fixed(FixedBlock),
    Table(TableBlock),
    Narrative(NarrativeBlock),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportContent {
    pub blocks: Vec<Block>,
}

impl ReportContent {
    pub fn from_analysis(subject: &Subject, result: &AnalysisResult) -> Self {
        let metadata = vec![
            format!("Name: {}", subject.name),
            format!("Email: {}", subject.email),
            format!("Date of Birth: {}", subject.date_of_birth),
            format!("Time of Birth: {}", subject.time_of_birth),
            format!("Place of Birth: {}", subject.place_of_birth),
            format!("Location: {}", subject.selected_location.complete_name),
        ];
        let big3 = &result.big3;
        let summary = format!(
            "Big 3: Ascendant ({}), Sun ({}), Moon ({})",
            big3.ascendant, big3.sun, big3.moon
        );

        let planets = TableBlock {
            header: vec!["Planet".to_string(), "Sign".to_string()],
            rows: result
                .planets
                .iter()
                .map(|p| vec![p.name.clone(), p.sign.clone()])
                .collect(),
        };
        let houses = TableBlock {
            header: vec!["House".to_string(), "Sign".to_string()],
            rows: result
                .houses
                .iter()
                .map(|h| vec![h.house.to_string(), h.sign.clone()])
                .collect(),
        };

        Self {
            blocks: vec![
                Block::Fixed(FixedBlock::title(REPORT_TITLE)),
                Block::Fixed(FixedBlock::metadata(metadata)),
                Block::Fixed(FixedBlock::summary(summary)),
                Block::Table(planets),
                Block::Fixed(FixedBlock::heading(PLANETS_HEADING)),
                Block::Narrative(NarrativeBlock::from_generated(&result.planet_interpretation)),
                Block::Table(houses),
                Block::Fixed(FixedBlock::heading(HOUSES_HEADING)),
                Block::Narrative(NarrativeBlock::from_generated(&result.house_interpretation)),
            ],
        }
    }

    #[cfg(test)]
    pub fn narratives(&self) -> impl Iterator<Item = &NarrativeBlock> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Narrative(n) => Some(n),
            _ => None,
        })
    }
}
