// Conversation history
//
// Append-only record of classified turns. Unlike a context window there is
// no trimming: the risk report needs the full conversation, and a session
// is reset only by discarding the whole engine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::sentiment::SentimentLabel;

/// Trauma indicator attached to a turn by the keyword matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraumaIndicator {
    TraumaDisclosure,
    PtsdSymptoms,
}

/// One classified user message. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub message: String,
    pub sentiment: SentimentLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trauma_indicator: Option<TraumaIndicator>,
}

/// Ordered, append-only sequence of turns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Count of turns carrying the given sentiment.
    pub fn count_sentiment(&self, label: SentimentLabel) -> usize {
        self.turns.iter().filter(|t| t.sentiment == label).count()
    }

    pub fn has_sentiment(&self, label: SentimentLabel) -> bool {
        self.turns.iter().any(|t| t.sentiment == label)
    }

    /// Count of turns with any trauma indicator.
    pub fn trauma_indicator_count(&self) -> usize {
        self.turns.iter().filter(|t| t.trauma_indicator.is_some()).count()
    }

    /// Save history to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize history")?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).context("Failed to create directory for history")?;
        }

        fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write history to {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Load history from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read history from {}", path.as_ref().display()))?;

        serde_json::from_str(&json).context("Failed to parse history JSON")
    }
}
