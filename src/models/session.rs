use chrono::NaiveDate;
use serde::Serialize;

/// One (time, flow-rate) reading of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: f32, // seconds
    pub rate: f32, // mL/sec
}

/// Summary values read from a session header.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub date: Option<NaiveDate>,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub q_max: f32,
    pub t_peak: f32,
    pub t_end: f32,
    pub volume_scale: f32,
    pub volume_visual: f32,
}

/// A completed flow measurement.
///
/// Built once by the parser; afterwards only readable.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    label: String,
    summary: SessionSummary,
    rescale: f32,
    samples: Vec<Sample>,
}

impl Session {
    pub fn new(label: String, summary: SessionSummary, samples: Vec<Sample>) -> Self {
        let rescale = rescale_factor(summary.volume_scale, summary.volume_visual);
        Self {
            label,
            summary,
            rescale,
            samples,
        }
    }

    /// Series label, `<date>:<hh><mm><ss>` as written in the header.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.summary.date
    }

    pub fn hour(&self) -> u32 {
        self.summary.hour
    }

    pub fn minute(&self) -> u32 {
        self.summary.minute
    }

    pub fn second(&self) -> u32 {
        self.summary.second
    }

    pub fn q_max(&self) -> f32 {
        self.summary.q_max
    }

    pub fn t_peak(&self) -> f32 {
        self.summary.t_peak
    }

    pub fn t_end(&self) -> f32 {
        self.summary.t_end
    }

    pub fn volume_scale(&self) -> f32 {
        self.summary.volume_scale
    }

    pub fn volume_visual(&self) -> f32 {
        self.summary.volume_visual
    }

    /// Correction between scale and beaker volume. Not applied to the
    /// stored values.
    pub fn rescale(&self) -> f32 {
        self.rescale
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn date_str(&self) -> String {
        match self.summary.date {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => "----------".to_string(),
        }
    }

    pub fn time_str(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.summary.hour, self.summary.minute, self.summary.second
        )
    }
}

/// 1.0 when scale and visual volumes agree within 5 mL, otherwise visual / scale.
pub fn rescale_factor(volume_scale: f32, volume_visual: f32) -> f32 {
    if (volume_scale - volume_visual).abs() < 5.0 {
        1.0
    } else {
        volume_visual / volume_scale
    }
}

/// Up to five sessions read in one call; fewer than five means the input is exhausted.
#[derive(Debug, Default)]
pub struct SessionBatch {
    sessions: Vec<Session>,
}

impl SessionBatch {
    pub const SIZE: usize = 5;

    pub fn new(sessions: Vec<Session>) -> Self {
        debug_assert!(sessions.len() <= Self::SIZE);
        Self { sessions }
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_final(&self) -> bool {
        self.sessions.len() < Self::SIZE
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn into_sessions(self) -> Vec<Session> {
        self.sessions
    }
}
