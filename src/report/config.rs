use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::LayoutError;

/// Fixed page geometry and body typography, all in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageConfig {
    pub page_width: f32,
    pub page_height: f32,
    /// Applied to every edge; `y` restarts here on each page.
    pub margin: f32,
    pub max_width: f32,
    pub body_font_size: f32,
    pub line_height: f32,
    pub table_font_size: f32,
    pub table_row_height: f32,
    pub table_cell_padding: f32,
    /// Body rows that must fit beneath a header before the table may start.
    pub table_min_body_rows: usize,
    pub table_spacing: f32,
    /// Gap left after each narrative block.
    pub block_gap: f32,
}

impl Default for PageConfig {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 40.0,
            max_width: 520.0,
            body_font_size: 11.0,
            line_height: 14.0,
            table_font_size: 11.0,
            table_row_height: 20.0,
            table_cell_padding: 4.0,
            table_min_body_rows: 2,
            table_spacing: 20.0,
            block_gap: 10.0,
        }
    }
}

impl PageConfig {
    /// Lowest `y` any drawn content may reach.
    pub fn content_limit(&self) -> f32 {
        self.page_height - self.margin
    }

    /// Vertical space between the top margin and `content_limit`.
    pub fn usable_height(&self) -> f32 {
        self.content_limit() - self.margin
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let invalid = |reason: &str| Err(LayoutError::InvalidConfig(reason.to_string()));

        if self.margin < 0.0 || self.usable_height() <= 0.0 {
            return invalid("margins leave no vertical space");
        }
        if self.max_width <= 0.0 || self.margin + self.max_width > self.page_width {
            return invalid("max_width must be positive and fit inside the page");
        }
        if self.line_height <= 0.0 || self.line_height > self.usable_height() {
            return invalid("line_height must be positive and fit on a page");
        }
        // widest Helvetica glyph is just over one em
        if self.max_width < self.body_font_size * 1.1 {
            return invalid("max_width is narrower than a single glyph");
        }
        if self.table_min_body_rows == 0 {
            return invalid("table_min_body_rows must be at least 1");
        }
        let table_floor = self.table_row_height * (1 + self.table_min_body_rows) as f32;
        if self.table_row_height <= 0.0 || table_floor > self.usable_height() {
            return invalid("a table header plus its minimum rows must fit on a page");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid_a4() {
        let config = PageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.content_limit(), 841.89 - 40.0);
    }

    #[test]
    fn test_rejects_table_that_can_never_start() {
        let config = PageConfig {
            page_height: 120.0,
            table_row_height: 20.0,
            table_min_body_rows: 3,
            ..PageConfig::default()
        };
        assert!(matches!(config.validate(), Err(LayoutError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zero_min_rows_and_oversized_width() {
        let zero_rows = PageConfig {
            table_min_body_rows: 0,
            ..PageConfig::default()
        };
        assert!(zero_rows.validate().is_err());

        let too_wide = PageConfig {
            max_width: 600.0,
            ..PageConfig::default()
        };
        assert!(too_wide.validate().is_err());
    }
}
