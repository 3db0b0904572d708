//! Typst rendering backend.
//!
//! Composed pages are written out as absolutely positioned Typst source and
//! compiled by the `typst` CLI. The result-panel snapshot uses the same CLI
//! with PNG output.

use std::fmt::Write as _;
use std::fs;
use std::process::Command;
use tempfile::tempdir;
use thiserror::Error;

use super::config::PageConfig;
use super::content::{FontWeight, NarrativeBlock};
use super::layout::{DrawOp, Page, TableGrid, TextRun};
use crate::chart::AnalysisResult;

const FONT_STACK: &str = r#"("Liberation Sans", "Arial", "Helvetica")"#;
const HEADER_FILL: &str = "rgb(124, 58, 237)";
const SNAPSHOT_PPI: u32 = 144;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteSource(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read rendered output: {0}")]
    ReadOutput(#[source] std::io::Error),
}

/// Turns layout output into document bytes.
pub trait ReportRenderer: Send + Sync {
    fn render_pdf(&self, pages: &[Page], config: &PageConfig) -> Result<Vec<u8>, RenderError>;
    fn render_snapshot(&self, result: &AnalysisResult) -> Result<Vec<u8>, RenderError>;
}

pub struct TypstRenderer {
    binary: String,
}

impl TypstRenderer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn compile(&self, source: &str, output_filename: &str, extra_args: &[String]) -> Result<Vec<u8>, RenderError> {
        let temp_dir = tempdir().map_err(RenderError::TempDir)?;
        let typ_path = temp_dir.path().join("report.typ");
        let output_path = temp_dir.path().join(output_filename);

        fs::write(&typ_path, source).map_err(RenderError::WriteSource)?;

        let status = Command::new(&self.binary)
            .arg("compile")
            .args(extra_args)
            .arg(&typ_path)
            .arg(&output_path)
            .current_dir(temp_dir.path())
            .status()
            .map_err(RenderError::TypstIo)?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            log::error!("{} compile exited with {}", self.binary, code);
            return Err(RenderError::TypstExit(code));
        }

        fs::read(&output_path).map_err(RenderError::ReadOutput)
    }
}

impl ReportRenderer for TypstRenderer {
    fn render_pdf(&self, pages: &[Page], config: &PageConfig) -> Result<Vec<u8>, RenderError> {
        let source = pages_to_typst(pages, config);
        self.compile(&source, "report.pdf", &[])
    }

    fn render_snapshot(&self, result: &AnalysisResult) -> Result<Vec<u8>, RenderError> {
        let source = snapshot_to_typst(result);
        let args = vec![
            "--format".to_string(),
            "png".to_string(),
            "--ppi".to_string(),
            SNAPSHOT_PPI.to_string(),
        ];
        self.compile(&source, "snapshot.png", &args)
    }
}

/// Escape a value for use inside a Typst string literal.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\r', "")
        .replace('\n', r"\n")
        .replace('\t', r"\t")
}

fn weight(weight: FontWeight) -> &'static str {
    match weight {
        FontWeight::Regular => "regular",
        FontWeight::Bold => "bold",
    }
}

fn text_call(text: &str, size: f32, weight_name: &str, fill: Option<&str>) -> String {
    let fill = fill.map(|f| format!(", fill: {}", f)).unwrap_or_default();
    format!(
        r#"text(size: {:.2}pt, weight: "{}"{}, "{}")"#,
        size,
        weight_name,
        fill,
        escape_typst_string(text)
    )
}

fn write_text_run(out: &mut String, run: &TextRun) {
    let _ = writeln!(
        out,
        "#place(top + left, dx: {:.2}pt, dy: {:.2}pt, {})",
        run.x,
        run.y,
        text_call(&run.text, run.font_size, weight(run.weight), None)
    );
}

fn write_table_grid(out: &mut String, grid: &TableGrid) {
    let columns = grid
        .column_widths
        .iter()
        .map(|w| format!("{:.2}pt", w))
        .collect::<Vec<_>>()
        .join(", ");
    let header = grid
        .header
        .iter()
        .map(|cell| {
            format!(
                "table.cell(fill: {}, {})",
                HEADER_FILL,
                text_call(cell, grid.font_size, "bold", Some("white"))
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let _ = writeln!(
        out,
        "#place(top + left, dx: {:.2}pt, dy: {:.2}pt, table(",
        grid.x, grid.y
    );
    // trailing comma keeps a one-column tuple a tuple
    let _ = writeln!(out, "  columns: ({},),", columns);
    let _ = writeln!(out, "  rows: {:.2}pt,", grid.row_height);
    let _ = writeln!(out, "  inset: (x: {:.2}pt, y: 0pt),", grid.cell_padding);
    let _ = writeln!(out, "  align: left + horizon,");
    let _ = writeln!(out, "  stroke: 0.5pt + luma(170),");
    let _ = writeln!(out, "  table.header({}),", header);
    for row in &grid.rows {
        let cells = row
            .iter()
            .map(|cell| text_call(cell, grid.font_size, "regular", None))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "  {},", cells);
    }
    let _ = writeln!(out, "))");
}

/// Typst source for the composed pages. Every coordinate is taken from the
/// layout; Typst does no flowing of its own.
pub fn pages_to_typst(pages: &[Page], config: &PageConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#set page(width: {:.2}pt, height: {:.2}pt, margin: 0pt)",
        config.page_width, config.page_height
    );
    let _ = writeln!(
        out,
        r#"#set text(font: {}, size: {:.2}pt, top-edge: "ascender", bottom-edge: "descender")"#,
        FONT_STACK, config.body_font_size
    );

    for (index, page) in pages.iter().enumerate() {
        if index > 0 {
            let _ = writeln!(out, "#pagebreak()");
        }
        let _ = writeln!(out, "// page {}", page.number);
        for op in &page.ops {
            match op {
                DrawOp::Text(run) => write_text_run(&mut out, run),
                DrawOp::Table(grid) => write_table_grid(&mut out, grid),
            }
        }
    }
    out
}

fn snapshot_panel(title: &str, head: [&str; 2], rows: Vec<[String; 2]>, narrative: &str) -> String {
    let mut cells = vec![
        format!("[*{}*]", head[0]),
        format!("[*{}*]", head[1]),
    ];
    for [left, right] in rows {
        cells.push(format!("\"{}\"", escape_typst_string(&left)));
        cells.push(format!("\"{}\"", escape_typst_string(&right)));
    }

    format!(
        "block(fill: white, radius: 8pt, inset: 16pt, width: 100%, stack(spacing: 10pt, \
         {}, table(columns: (1fr, 1fr), stroke: none, {}), {}, {}))",
        text_call(title, 18.0, "bold", Some("rgb(76, 29, 149)")),
        cells.join(", "),
        text_call("Interpretation", 13.0, "bold", Some("rgb(91, 33, 182)")),
        text_call(narrative, 11.0, "regular", Some("rgb(55, 65, 81)")),
    )
}

/// Typst source for the single-page result panel.
pub fn snapshot_to_typst(result: &AnalysisResult) -> String {
    let big3 = &result.big3;
    let headline = format!(
        "Your Big 3: Ascendant {}, Sun {}, Moon {}",
        big3.ascendant, big3.sun, big3.moon
    );
    let planets = snapshot_panel(
        "Planets",
        ["Planet", "Sign"],
        result
            .planets
            .iter()
            .map(|p| [p.name.clone(), p.sign.clone()])
            .collect(),
        NarrativeBlock::from_generated(&result.planet_interpretation).text(),
    );
    let houses = snapshot_panel(
        "Houses",
        ["House", "Sign"],
        result
            .houses
            .iter()
            .map(|h| [h.house.to_string(), h.sign.clone()])
            .collect(),
        NarrativeBlock::from_generated(&result.house_interpretation).text(),
    );

    let mut out = String::new();
    let _ = writeln!(
        out,
        "#set page(width: 900pt, height: auto, margin: 24pt, fill: rgb(59, 7, 100))"
    );
    let _ = writeln!(out, "#set text(font: {}, size: 11pt)", FONT_STACK);
    let _ = writeln!(
        out,
        "#align(center, {})",
        text_call(&headline, 26.0, "bold", Some("white"))
    );
    let _ = writeln!(out, "#v(16pt)");
    let _ = writeln!(
        out,
        "#grid(columns: (1fr, 1fr), gutter: 20pt, {}, {})",
        planets, houses
    );
    out
}
