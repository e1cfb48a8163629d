use crate::core::chart::{flow_chart, histogram_chart};
use crate::core::histogram::{BinPolicy, HistogramAccumulator};
use crate::core::parser::{Diagnostic, SessionReader};
use crate::errors::AppResult;
use crate::models::ChartGroup;
use log::{info, warn};
use std::io::Read;

/// Everything the `show` command needs after reading one dump.
#[derive(Debug)]
pub struct ViewReport {
    /// Flow charts first (one per batch), histogram chart last.
    pub charts: Vec<ChartGroup>,
    pub sessions: usize,
    /// Sessions left out of the histogram (no date or rejected Qmax).
    pub unbinned: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl ViewReport {
    pub fn histogram(&self) -> Option<&ChartGroup> {
        self.charts
            .last()
            .filter(|c| c.title == crate::core::chart::HISTOGRAM_TITLE)
    }
}

/// Read batches until a short one, building flow charts and feeding the
/// weekly histogram in file order.
pub fn build_charts<R: Read>(reader: &mut SessionReader<R>, policy: BinPolicy) -> AppResult<ViewReport> {
    let mut charts = Vec::new();
    let mut hist = HistogramAccumulator::new(policy);
    let mut sessions = 0;
    let mut unbinned = 0;

    loop {
        let batch = reader.next_batch()?;
        info!("Got {} sessions", batch.count());
        sessions += batch.count();

        for session in batch.sessions() {
            let Some(date) = session.date() else {
                warn!("Session {} has no date, left out of histogram", session.label());
                unbinned += 1;
                continue;
            };
            if let Err(e) = hist.record(date, session.q_max()) {
                warn!("Session {}: {e}", session.label());
                unbinned += 1;
            }
        }

        if let Some(chart) = flow_chart(&batch) {
            charts.push(chart);
        }

        if batch.is_final() {
            break;
        }
    }

    let windows = hist.finish();
    if !windows.is_empty() {
        charts.push(histogram_chart(windows));
    }

    Ok(ViewReport {
        charts,
        sessions,
        unbinned,
        diagnostics: reader.diagnostics().to_vec(),
    })
}
