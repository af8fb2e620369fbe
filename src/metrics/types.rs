// Metrics data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One chat turn's outcome, appended to the JSONL metrics log.
///
/// Only a hash of the query is kept; message text never reaches disk
/// through this path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnMetric {
    pub timestamp: DateTime<Utc>,
    pub query_hash: String,
    /// Response category, e.g. "crisis", "screening", "sentiment".
    pub response_kind: String,
    pub sentiment: String,
    pub emergency: bool,
    pub response_time_ms: u64,
}

impl TurnMetric {
    pub fn new(
        query_hash: String,
        response_kind: String,
        sentiment: String,
        emergency: bool,
        response_time_ms: u64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            query_hash,
            response_kind,
            sentiment,
            emergency,
            response_time_ms,
        }
    }
}
