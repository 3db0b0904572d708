//! Paginated composer.
//!
//! `compose` is a pure function from content and page geometry to pages of
//! positioned draw instructions. `y` grows downwards from the top edge; a
//! text run occupies `[y, y + line_height]` and a table grid occupies one
//! header row plus its body rows.

use serde::Serialize;
use utoipa::ToSchema;

use super::config::PageConfig;
use super::content::{Block, FixedBlock, FontWeight, NarrativeBlock, ReportContent, TableBlock};
use super::metrics::FontMetrics;
use super::wrap::wrap_text;
use super::LayoutError;

const ELLIPSIS: char = '\u{2026}';

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub line_height: f32,
    pub weight: FontWeight,
    pub text: String,
}

/// One page's fragment of a table. `header` is repeated on every fragment.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TableGrid {
    pub x: f32,
    pub y: f32,
    pub column_widths: Vec<f32>,
    pub row_height: f32,
    pub font_size: f32,
    pub cell_padding: f32,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn height(&self) -> f32 {
        grid_height(self.row_height, self.rows.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawOp {
    Text(TextRun),
    Table(TableGrid),
}

impl DrawOp {
    pub fn top(&self) -> f32 {
        match self {
            DrawOp::Text(run) => run.y,
            DrawOp::Table(grid) => grid.y,
        }
    }

    pub fn bottom(&self) -> f32 {
        match self {
            DrawOp::Text(run) => run.y + run.line_height,
            DrawOp::Table(grid) => grid.y + grid.height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Lowest drawn point on the page, or `None` when nothing was drawn.
    #[cfg(test)]
    pub fn content_bottom(&self) -> Option<f32> {
        self.ops.iter().map(DrawOp::bottom).reduce(f32::max)
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            DrawOp::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableGrid> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Table(grid) => Some(grid),
            DrawOp::Text(_) => None,
        })
    }
}

fn grid_height(row_height: f32, body_rows: usize) -> f32 {
    row_height * (body_rows + 1) as f32
}

struct Cursor<'c> {
    config: &'c PageConfig,
    pages: Vec<Page>,
    ops: Vec<DrawOp>,
    y: f32,
}

impl<'c> Cursor<'c> {
    fn new(config: &'c PageConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            ops: Vec::new(),
            y: config.margin,
        }
    }

    fn fits(&self, height: f32) -> bool {
        self.y + height <= self.config.content_limit()
    }

    fn at_page_top(&self) -> bool {
        self.ops.is_empty()
    }

    fn break_page(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.pages.push(Page {
            number: self.pages.len() + 1,
            ops,
        });
        self.y = self.config.margin;
    }

    /// Move to a fresh page unless `height` fits below the cursor.
    fn reserve(&mut self, height: f32) {
        if !self.fits(height) && !self.at_page_top() {
            self.break_page();
        }
    }

    fn push(&mut self, op: DrawOp) {
        self.y = op.bottom();
        self.ops.push(op);
    }

    /// Body rows that fit beneath a header placed at the cursor.
    fn rows_that_fit(&self, row_height: f32) -> usize {
        let mut rows = 0;
        while self.fits(grid_height(row_height, rows + 1)) {
            rows += 1;
        }
        rows
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.break_page();
        }
        self.pages
    }
}

/// Lay `content` out across pages of `config`.
pub fn compose<M: FontMetrics + ?Sized>(
    content: &ReportContent,
    config: &PageConfig,
    metrics: &M,
) -> Result<Vec<Page>, LayoutError> {
    config.validate()?;

    let mut cursor = Cursor::new(config);
    for block in &content.blocks {
        match block {
            Block::Fixed(fixed) => place_fixed(&mut cursor, fixed)?,
            Block::Narrative(narrative) => place_narrative(&mut cursor, narrative, metrics),
            Block::Table(table) => place_table(&mut cursor, table, metrics),
        }
    }
    Ok(cursor.finish())
}

fn place_fixed(cursor: &mut Cursor<'_>, block: &FixedBlock) -> Result<(), LayoutError> {
    let config = cursor.config;
    let height = block.height();
    if height > config.usable_height() {
        return Err(LayoutError::BlockTooTall {
            height,
            available: config.usable_height(),
        });
    }

    let keep = block.keep_with_next as f32 * config.line_height;
    cursor.reserve(height + keep);

    for line in &block.lines {
        let y = cursor.y;
        cursor.push(DrawOp::Text(TextRun {
            x: config.margin,
            y,
            font_size: block.font_size,
            line_height: block.line_height,
            weight: block.weight,
            text: line.clone(),
        }));
    }
    cursor.y += block.spacing_after;
    Ok(())
}

fn place_narrative<M: FontMetrics + ?Sized>(
    cursor: &mut Cursor<'_>,
    narrative: &NarrativeBlock,
    metrics: &M,
) {
    let config = cursor.config;
    for line in wrap_text(narrative.text(), config.max_width, config.body_font_size, metrics) {
        cursor.reserve(config.line_height);
        let y = cursor.y;
        cursor.push(DrawOp::Text(TextRun {
            x: config.margin,
            y,
            font_size: config.body_font_size,
            line_height: config.line_height,
            weight: FontWeight::Regular,
            text: line,
        }));
    }
    cursor.y += config.block_gap;
}

fn place_table<M: FontMetrics + ?Sized>(cursor: &mut Cursor<'_>, table: &TableBlock, metrics: &M) {
    let config = cursor.config;
    let row_height = config.table_row_height;
    let columns = table.header.len().max(1);
    let column_width = config.max_width / columns as f32;
    let column_widths = vec![column_width; columns];
    let cell_width = column_width - 2.0 * config.table_cell_padding;

    let fit_row = |row: &Vec<String>| -> Vec<String> {
        row.iter()
            .map(|cell| fit_cell(cell, cell_width, config.table_font_size, metrics))
            .collect()
    };
    let header = fit_row(&table.header);

    let min_rows = config.table_min_body_rows.min(table.rows.len());
    cursor.reserve(grid_height(row_height, min_rows));

    let mut remaining = table.rows.as_slice();
    loop {
        let take = cursor.rows_that_fit(row_height).min(remaining.len());
        let (chunk, rest) = remaining.split_at(take);
        let y = cursor.y;
        cursor.push(DrawOp::Table(TableGrid {
            x: config.margin,
            y,
            column_widths: column_widths.clone(),
            row_height,
            font_size: config.table_font_size,
            cell_padding: config.table_cell_padding,
            header: header.clone(),
            rows: chunk.iter().map(&fit_row).collect(),
        }));

        remaining = rest;
        if remaining.is_empty() {
            break;
        }
        cursor.break_page();
    }
    cursor.y += config.table_spacing;
}

/// Truncate `text` with an ellipsis so it fits `width`.
fn fit_cell<M: FontMetrics + ?Sized>(text: &str, width: f32, font_size: f32, metrics: &M) -> String {
    if metrics.text_width(text, font_size) <= width {
        return text.to_string();
    }

    let mut kept = String::new();
    for c in text.chars() {
        let candidate = format!("{}{}{}", kept, c, ELLIPSIS);
        if metrics.text_width(&candidate, font_size) > width {
            break;
        }
        kept.push(c);
    }
    kept.push(ELLIPSIS);
    kept
}
