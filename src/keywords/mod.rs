// Keyword matchers
//
// Case-insensitive substring scanners over fixed phrase lists. Substring
// matching is intentional: "hurt myself" inside a longer sentence counts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A named set of phrases matched by substring containment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSet {
    pub tag: String,
    pub phrases: Vec<String>,
}

impl KeywordSet {
    pub fn new(tag: &str, phrases: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// True if any phrase occurs in the message (case-insensitive).
    pub fn matches(&self, message: &str) -> bool {
        self.first_match(message).is_some()
    }

    /// The first matching phrase, if any. Phrase order only affects which
    /// phrase gets reported, not whether the set matches.
    pub fn first_match(&self, message: &str) -> Option<&str> {
        let lower = message.to_lowercase();
        self.phrases
            .iter()
            .find(|p| lower.contains(&p.to_lowercase()))
            .map(|p| p.as_str())
    }
}

/// The three keyword vocabularies used by the response engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSets {
    pub crisis: KeywordSet,
    pub trauma: KeywordSet,
    pub ptsd: KeywordSet,
}

impl KeywordSets {
    /// Built-in vocabulary for the general support profile.
    pub fn support() -> Self {
        Self {
            crisis: KeywordSet::new(
                "crisis",
                &[
                    "suicide",
                    "kill myself",
                    "hurt myself",
                    "want to die",
                    "end my life",
                ],
            ),
            trauma: KeywordSet::new("trauma", &[]),
            ptsd: KeywordSet::new("ptsd", &[]),
        }
    }

    /// Built-in vocabulary for the trauma-informed profile, with a wider
    /// crisis list plus trauma-disclosure and PTSD-symptom sets.
    pub fn trauma_informed() -> Self {
        Self {
            crisis: KeywordSet::new(
                "crisis",
                &[
                    "suicide",
                    "kill myself",
                    "hurt myself",
                    "want to die",
                    "end my life",
                    "not safe",
                    "harm myself",
                ],
            ),
            trauma: KeywordSet::new(
                "trauma",
                &[
                    "assault",
                    "rape",
                    "abuse",
                    "attacked",
                    "violated",
                    "forced",
                    "unwanted touch",
                    "sexual violence",
                ],
            ),
            ptsd: KeywordSet::new(
                "ptsd",
                &[
                    "flashbacks",
                    "nightmares",
                    "triggered",
                    "panic attacks",
                    "hypervigilant",
                    "dissociate",
                    "numb",
                ],
            ),
        }
    }

    /// Load keyword sets from a JSON file, overriding the built-ins.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read keywords file: {}", path.display()))?;

        let sets: KeywordSets =
            serde_json::from_str(&contents).context("Failed to parse keywords JSON")?;

        Ok(sets)
    }

    /// Check the crisis set, logging the hit.
    pub fn detect_crisis(&self, message: &str) -> bool {
        if let Some(phrase) = self.crisis.first_match(message) {
            tracing::warn!("Crisis detected: keyword '{}'", phrase);
            return true;
        }
        false
    }
}
