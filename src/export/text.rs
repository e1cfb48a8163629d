// src/export/text.rs

use crate::core::chart::HISTOGRAM_TITLE;
use crate::errors::AppResult;
use crate::export::ChartSurface;
use crate::models::{ChartGroup, Series};
use ansi_term::Colour;
use std::io::{self, Write};

const BAR_WIDTH: usize = 40;

/// Same cycle the flow curves use: one colour per session.
const PALETTE: [Colour; 5] = [
    Colour::Red,
    Colour::Green,
    Colour::Blue,
    Colour::Yellow,
    Colour::Purple,
];

/// Terminal rendering: a summary per flow curve and bar rows for histograms.
pub struct TextSurface<W: Write> {
    out: W,
    color: bool,
}

impl TextSurface<io::Stdout> {
    /// Colours unless `NO_COLOR` is set.
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            color: std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, idx: usize, s: &str) -> String {
        if self.color {
            PALETTE[idx % PALETTE.len()].paint(s).to_string()
        } else {
            s.to_string()
        }
    }

    fn flow(&mut self, group: &ChartGroup) -> io::Result<()> {
        // series come in (curve, marker) pairs
        for (i, pair) in group.series.chunks(2).enumerate() {
            let curve = &pair[0];
            let peak = curve.max_y().unwrap_or(0.0);
            let mut line = format!(
                "  {:<24} {:>4} samples  max {:>5.1} {}",
                curve.name(),
                curve.points().len(),
                peak,
                group.y_label
            );
            if let Some(marker) = pair.get(1)
                && let Some(top) = marker.points().last()
            {
                line.push_str(&format!(
                    "  peak @ {:.1} {} ({:.1})",
                    top.x, group.x_label, top.y
                ));
            }
            writeln!(self.out, "{}", self.paint(i, &line))?;
        }
        Ok(())
    }

    fn histogram(&mut self, group: &ChartGroup) -> io::Result<()> {
        let max = group
            .series
            .iter()
            .filter_map(Series::max_y)
            .fold(0.0_f64, f64::max);

        for (i, series) in group.series.iter().enumerate() {
            let total: f64 = series.points().iter().map(|p| p.y).sum();
            writeln!(
                self.out,
                "  {}",
                self.paint(i, &format!("week of {} ({total} sessions)", series.name()))
            )?;

            for p in series.points().iter().filter(|p| p.y > 0.0) {
                let len = if max > 0.0 {
                    ((p.y / max) * BAR_WIDTH as f64).round().max(1.0) as usize
                } else {
                    0
                };
                let bar = "█".repeat(len);
                writeln!(
                    self.out,
                    "    {:>2} {} │{} {}",
                    p.x,
                    group.x_label,
                    self.paint(i, &bar),
                    p.y
                )?;
            }
        }
        Ok(())
    }
}

impl<W: Write> ChartSurface for TextSurface<W> {
    fn render(&mut self, charts: &[ChartGroup]) -> AppResult<()> {
        for (n, group) in charts.iter().enumerate() {
            writeln!(
                self.out,
                "\n=== {} #{} ({} vs {}) ===",
                group.title,
                n + 1,
                group.y_label,
                group.x_label
            )?;
            if group.title == HISTOGRAM_TITLE {
                self.histogram(group)?;
            } else {
                self.flow(group)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
