// src/export/mod.rs

mod fs_utils;
mod json_csv;
mod text;

pub use fs_utils::ensure_writable;
pub use json_csv::{CsvSurface, JsonSurface, SeriesRow, chart_rows};
pub use text::TextSurface;

use crate::errors::AppResult;
use crate::models::ChartGroup;
use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Anything able to display prepared chart groups.
pub trait ChartSurface {
    fn render(&mut self, charts: &[ChartGroup]) -> AppResult<()>;
}

/// Helper comune per messaggi di completamento export.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Text,
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Text => "text",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// File-based formats need `--out`.
    pub fn needs_file(&self) -> bool {
        !matches!(self, ExportFormat::Text)
    }
}
