// JSONL metrics logger

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use super::types::TurnMetric;

/// Appends one JSON line per chat turn to `metrics.jsonl` in the
/// configured directory.
pub struct MetricsLogger {
    log_path: PathBuf,
}

impl MetricsLogger {
    pub fn new(metrics_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&metrics_dir).with_context(|| {
            format!("Failed to create metrics directory: {}", metrics_dir.display())
        })?;

        Ok(Self {
            log_path: metrics_dir.join("metrics.jsonl"),
        })
    }

    /// Short stable hash of a query, so logs never carry message text.
    pub fn hash_query(query: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(query.as_bytes());
        let digest = hasher.finalize();
        hex_prefix(&digest, 16)
    }

    pub fn log(&self, metric: &TurnMetric) -> Result<()> {
        let line = serde_json::to_string(metric).context("Failed to serialize metric")?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| {
                format!("Failed to open metrics log: {}", self.log_path.display())
            })?;

        writeln!(file, "{line}").context("Failed to write metric")?;
        Ok(())
    }

    pub fn log_path(&self) -> &PathBuf {
        &self.log_path
    }
}

fn hex_prefix(bytes: &[u8], len: usize) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>()
        .chars()
        .take(len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hash_query_is_stable_and_short() {
        let a = MetricsLogger::hash_query("I feel stressed");
        let b = MetricsLogger::hash_query("I feel stressed");
        let c = MetricsLogger::hash_query("something else");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn test_log_appends_jsonl() {
        let dir = TempDir::new().unwrap();
        let logger = MetricsLogger::new(dir.path().to_path_buf()).unwrap();

        let metric = TurnMetric::new(
            MetricsLogger::hash_query("hello"),
            "sentiment".to_string(),
            "neutral".to_string(),
            false,
            3,
        );
        logger.log(&metric).unwrap();
        logger.log(&metric).unwrap();

        let contents = std::fs::read_to_string(logger.log_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: TurnMetric = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.response_kind, "sentiment");
        assert!(!parsed.emergency);
    }
}
