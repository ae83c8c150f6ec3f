mod aggregator;
mod monitor;
mod stats;

pub use aggregator::{SessionAggregator, SessionState};
pub use monitor::SessionMonitor;
pub use stats::SessionStats;
