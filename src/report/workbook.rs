use super::aggregator::Report;
use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

/// Widest a rendered column may get, in characters
pub const MAX_COLUMN_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Text,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "text" | "txt" => Ok(ReportFormat::Text),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Longest cell (header included) plus two, capped at [`MAX_COLUMN_WIDTH`].
    pub fn column_widths(&self) -> Vec<usize> {
        (0..self.columns.len())
            .map(|i| {
                let longest = std::iter::once(&self.columns[i])
                    .chain(self.rows.iter().filter_map(|r| r.get(i)))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0);
                (longest + 2).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    fn render(&self, out: &mut String) {
        let widths = self.column_widths();
        let _ = writeln!(out, "== {} ==", self.name);
        render_line(out, &self.columns, &widths);
        let _ = writeln!(out, "{}", "-".repeat(widths.iter().sum()));
        for row in &self.rows {
            render_line(out, row, &widths);
        }
        out.push('\n');
    }
}

fn render_line(out: &mut String, cells: &[String], widths: &[usize]) {
    for (cell, &width) in cells.iter().zip(widths) {
        let clipped: String = cell.chars().take(width.saturating_sub(1)).collect();
        let _ = write!(out, "{clipped:<width$}");
    }
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
    out.push('\n');
}

#[derive(Debug, Serialize)]
struct WorkbookDocument<'a> {
    generated_at: String,
    sheets: Vec<SheetDocument<'a>>,
}

#[derive(Debug, Serialize)]
struct SheetDocument<'a> {
    #[serde(flatten)]
    sheet: &'a Sheet,
    column_widths: Vec<usize>,
}

/// Raw rows, summary counts and the material/color breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn from_report(report: &Report) -> Self {
        let mut data = Sheet::new(
            "RFID Data",
            &["Material Type", "Color", "UID", "Color Code", "Print Temperature"],
        );
        data.rows = report
            .rows
            .iter()
            .map(|row| row.cells().iter().map(|c| c.to_string()).collect())
            .collect();

        let mut summary = Sheet::new("Summary", &["Category", "Value", "Count"]);
        summary.rows = report
            .stats
            .iter()
            .map(|((category, value), count)| {
                vec![category.label().to_string(), value.clone(), count.to_string()]
            })
            .collect();

        let mut breakdown = Sheet::new("Material Breakdown", &["Material Type", "Color", "Count"]);
        breakdown.rows = report
            .cross_tab
            .iter()
            .map(|((material_type, color), count)| {
                vec![material_type.clone(), color.clone(), count.to_string()]
            })
            .collect();

        Self {
            sheets: vec![data, summary, breakdown],
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let doc = WorkbookDocument {
            generated_at: chrono::Local::now().to_rfc3339(),
            sheets: self
                .sheets
                .iter()
                .map(|sheet| SheetDocument {
                    sheet,
                    column_widths: sheet.column_widths(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&doc)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for sheet in &self.sheets {
            sheet.render(&mut out);
        }
        out
    }

    /// Write the workbook to `path`, creating parent directories as needed.
    pub fn export(&self, path: &Path, format: ReportFormat) -> Result<()> {
        let content = match format {
            ReportFormat::Json => self.to_json().map_err(|e| CatalogError::Export {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?,
            ReportFormat::Text => self.to_text(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
        }
        std::fs::write(path, content).map_err(|e| CatalogError::io(path, e))?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }
}
