// Risk report synthesis and rendering
// Public interface for the report pipeline

mod render;
mod synthesizer;

pub use render::{ReportRenderer, TextRenderer};
pub use synthesizer::{synthesize, FactorSummary, Indicator, RiskLevel, RiskReport};
