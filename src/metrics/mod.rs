// Metrics module
// Public interface for logging turn metrics

mod logger;
mod types;

pub use logger::MetricsLogger;
pub use types::TurnMetric;
