// src/export/json_csv.rs

use crate::errors::AppResult;
use crate::export::{ChartSurface, notify_export_success};
use crate::models::ChartGroup;
use crate::ui::messages::info;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Chart groups as pretty-printed JSON.
pub struct JsonSurface {
    path: PathBuf,
}

impl JsonSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChartSurface for JsonSurface {
    fn render(&mut self, charts: &[ChartGroup]) -> AppResult<()> {
        info(format!("Exporting to JSON: {}", self.path.display()));

        let json_data = serde_json::to_string_pretty(charts)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json_data.as_bytes())?;

        notify_export_success("JSON", &self.path);
        Ok(())
    }
}

/// Riga "piatta" per l'export CSV: un punto di una serie.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SeriesRow {
    pub chart: usize,
    pub title: String,
    pub series: String,
    pub x: f64,
    pub y: f64,
}

/// Flatten chart groups; `chart` is the group's position (several "Flow" charts share a title).
pub fn chart_rows(charts: &[ChartGroup]) -> Vec<SeriesRow> {
    let mut rows = Vec::new();
    for (i, group) in charts.iter().enumerate() {
        for series in &group.series {
            for p in series.points() {
                rows.push(SeriesRow {
                    chart: i,
                    title: group.title.clone(),
                    series: series.name().to_string(),
                    x: p.x,
                    y: p.y,
                });
            }
        }
    }
    rows
}

/// Long-format CSV (header included thanks to serde).
pub struct CsvSurface {
    path: PathBuf,
}

impl CsvSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChartSurface for CsvSurface {
    fn render(&mut self, charts: &[ChartGroup]) -> AppResult<()> {
        info(format!("Exporting to CSV: {}", self.path.display()));

        let mut wtr = csv::Writer::from_path(&self.path)?;
        for row in chart_rows(charts) {
            wtr.serialize(row)?;
        }
        wtr.flush()?;

        notify_export_success("CSV", &self.path);
        Ok(())
    }
}
