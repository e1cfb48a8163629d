pub mod series;
pub mod session;

pub use series::{ChartGroup, Point, Series};
pub use session::{Sample, Session, SessionBatch, SessionSummary};
