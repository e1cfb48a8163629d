//! Packaging of sessions and histogram windows into chart groups.

use crate::models::{ChartGroup, Point, Sample, Series, Session, SessionBatch};

pub const FLOW_TITLE: &str = "Flow";
pub const HISTOGRAM_TITLE: &str = "Histogram";

/// Samples start 1.9 s before the 10 mL threshold that tPeak is measured from.
pub const PEAK_OFFSET_SECS: f32 = 1.9;

/// Rate series of one session.
pub fn rate_series(session: &Session) -> Series {
    let points = session
        .samples()
        .iter()
        .map(|s| Point {
            x: f64::from(s.time),
            y: f64::from(s.rate),
        })
        .collect();
    Series::new(session.label(), points)
}

/// Vertical line from the x axis up to the curve at the peak.
pub fn peak_marker(session: &Session, position: usize) -> Series {
    let x = session.t_peak() + PEAK_OFFSET_SECS;
    let height = rate_near(session.samples(), x).unwrap_or(0.0);

    Series::new(
        format!("-{position}"),
        vec![
            Point {
                x: f64::from(x),
                y: 0.0,
            },
            Point {
                x: f64::from(x),
                y: f64::from(height),
            },
        ],
    )
}

/// Rate of the sample closest in time to `t`.
fn rate_near(samples: &[Sample], t: f32) -> Option<f32> {
    samples
        .iter()
        .min_by(|a, b| (a.time - t).abs().total_cmp(&(b.time - t).abs()))
        .map(|s| s.rate)
}

/// One "Flow" chart per batch; `None` for an empty batch.
pub fn flow_chart(batch: &SessionBatch) -> Option<ChartGroup> {
    if batch.count() == 0 {
        return None;
    }

    let mut series = Vec::with_capacity(batch.count() * 2);
    for (n, session) in batch.sessions().iter().enumerate() {
        series.push(rate_series(session));
        series.push(peak_marker(session, n));
    }

    Some(ChartGroup::new(FLOW_TITLE, "Sec", "mL/Sec", series))
}

pub fn histogram_chart(windows: Vec<Series>) -> ChartGroup {
    ChartGroup::new(HISTOGRAM_TITLE, "mL/Sec", "Count", windows)
}
