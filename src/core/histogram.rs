//! Weekly Qmax histograms.
//!
//! Sessions are fed in file order. A window is anchored at the date of the
//! first session it holds and stays open while later sessions fall within
//! `anchor + WINDOW_DAYS`; the first session beyond that closes it and
//! anchors a new one.

use crate::errors::{AppError, AppResult};
use crate::models::{Point, Series};
use chrono::{Duration, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub const BIN_COUNT: usize = 30;
pub const WINDOW_DAYS: i64 = 6;

/// Applied to every count when a window is emitted.
const COUNT_SCALE: f64 = 1.0;

/// What to do with a Qmax that rounds outside `0..BIN_COUNT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinPolicy {
    /// Count it in the first or last bin.
    #[default]
    Clamp,
    /// Leave the session out of the histogram.
    Reject,
}

/// Bin index for a Qmax value (rounded half up).
pub fn bin_index(q_max: f32, policy: BinPolicy) -> AppResult<usize> {
    if q_max.is_nan() {
        return Err(AppError::OutOfRangeBin(q_max));
    }

    let rounded = (q_max + 0.5).floor();
    if (0.0..BIN_COUNT as f32).contains(&rounded) {
        return Ok(rounded as usize);
    }

    match policy {
        BinPolicy::Reject => Err(AppError::OutOfRangeBin(q_max)),
        BinPolicy::Clamp => {
            let bin = if rounded < 0.0 { 0 } else { BIN_COUNT - 1 };
            warn!("Qmax {q_max} outside histogram range, counted in bin {bin}");
            Ok(bin)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramWindow {
    anchor: NaiveDate,
    counts: [u32; BIN_COUNT],
}

impl HistogramWindow {
    pub fn new(anchor: NaiveDate) -> Self {
        Self {
            anchor,
            counts: [0; BIN_COUNT],
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn counts(&self) -> &[u32; BIN_COUNT] {
        &self.counts
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// True when `date` lies beyond this window.
    pub fn is_expired_by(&self, date: NaiveDate) -> bool {
        date > self.anchor + Duration::days(WINDOW_DAYS)
    }

    fn increment(&mut self, bin: usize) {
        self.counts[bin] += 1;
    }

    /// Close the window into a series named after its anchor date.
    pub fn into_series(self) -> Series {
        debug!("Window {}: total counts {}", self.anchor, self.total());
        let points = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, c)| Point {
                x: i as f64,
                y: f64::from(*c) * COUNT_SCALE,
            })
            .collect();
        Series::new(self.anchor.to_string(), points)
    }
}

#[derive(Debug, Default)]
pub struct HistogramAccumulator {
    policy: BinPolicy,
    open: Option<HistogramWindow>,
    closed: Vec<Series>,
}

impl HistogramAccumulator {
    pub fn new(policy: BinPolicy) -> Self {
        Self {
            policy,
            open: None,
            closed: Vec::new(),
        }
    }

    /// Count one session. Returns `OutOfRangeBin` (without touching any
    /// window) when the policy rejects its Qmax.
    pub fn record(&mut self, date: NaiveDate, q_max: f32) -> AppResult<()> {
        let bin = bin_index(q_max, self.policy)?;

        let expired = self.open.as_ref().is_some_and(|w| w.is_expired_by(date));
        if expired && let Some(done) = self.open.take() {
            self.closed.push(done.into_series());
        }

        self.open
            .get_or_insert_with(|| HistogramWindow::new(date))
            .increment(bin);
        Ok(())
    }

    /// Windows closed so far, oldest first.
    pub fn closed(&self) -> &[Series] {
        &self.closed
    }

    pub fn open_window(&self) -> Option<&HistogramWindow> {
        self.open.as_ref()
    }

    /// Emit every window, including the one still open.
    pub fn finish(mut self) -> Vec<Series> {
        if let Some(last) = self.open.take() {
            self.closed.push(last.into_series());
        }
        self.closed
    }
}
