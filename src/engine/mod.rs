// Response engine
//
// Sentiment-triggered reply selection with fixed priority: crisis keywords
// win over trauma disclosure, PTSD symptoms, pending screening questions
// and plain sentiment replies, in that order. Every call appends exactly
// one turn to the history, whichever branch produces the reply.

mod history;
mod profile;

pub use history::{ConversationHistory, ConversationTurn, TraumaIndicator};
pub use profile::{CannedReply, EngineConfig, EngineProfile, TraumaStage};

use serde::Serialize;

use crate::screening::{Factor, FactorState, FactorValue};
use crate::sentiment::SentimentLabel;

/// Outcome of one engine call. Each kind carries exactly the fields that
/// kind can have; the loose `{reply, sentiment, ...}` wire shape is derived
/// via [`ChatPayload`].
#[derive(Debug, Clone, PartialEq)]
pub enum BotResponse {
    Crisis {
        reply: String,
        resources: Vec<String>,
    },
    TraumaSupport {
        reply: String,
        resources: Vec<String>,
    },
    PtsdSupport {
        reply: String,
        suggestions: Vec<String>,
    },
    Screening {
        reply: String,
        kind: &'static str,
        factor: Factor,
    },
    Sentiment {
        reply: String,
        label: SentimentLabel,
        suggestions: Vec<String>,
    },
}

impl BotResponse {
    pub fn reply(&self) -> &str {
        match self {
            BotResponse::Crisis { reply, .. }
            | BotResponse::TraumaSupport { reply, .. }
            | BotResponse::PtsdSupport { reply, .. }
            | BotResponse::Screening { reply, .. }
            | BotResponse::Sentiment { reply, .. } => reply,
        }
    }

    /// The `sentiment` tag reported at the boundary.
    pub fn sentiment_tag(&self) -> &str {
        match self {
            BotResponse::Crisis { .. } => "crisis",
            BotResponse::TraumaSupport { .. } => "trauma_support",
            BotResponse::PtsdSupport { .. } => "ptsd_support",
            BotResponse::Screening { .. } => "assessment",
            BotResponse::Sentiment { label, .. } => label.as_str(),
        }
    }

    /// Short kind name used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BotResponse::Crisis { .. } => "crisis",
            BotResponse::TraumaSupport { .. } => "trauma_support",
            BotResponse::PtsdSupport { .. } => "ptsd_support",
            BotResponse::Screening { .. } => "screening",
            BotResponse::Sentiment { .. } => "sentiment",
        }
    }

    pub fn is_emergency(&self) -> bool {
        matches!(self, BotResponse::Crisis { .. })
    }

    pub fn suggestions(&self) -> &[String] {
        match self {
            BotResponse::PtsdSupport { suggestions, .. }
            | BotResponse::Sentiment { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    pub fn resources(&self) -> &[String] {
        match self {
            BotResponse::Crisis { resources, .. }
            | BotResponse::TraumaSupport { resources, .. } => resources,
            _ => &[],
        }
    }
}

/// Serializable boundary form of a [`BotResponse`]:
/// `{reply, sentiment, type?, suggestions?, resources?, emergency?, validation?}`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatPayload {
    pub reply: String,
    pub sentiment: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<bool>,
}

impl From<&BotResponse> for ChatPayload {
    fn from(response: &BotResponse) -> Self {
        let base = Self {
            reply: response.reply().to_string(),
            sentiment: response.sentiment_tag().to_string(),
            response_type: None,
            suggestions: None,
            resources: None,
            emergency: None,
            validation: None,
        };

        match response {
            BotResponse::Crisis { resources, .. } => Self {
                emergency: Some(true),
                resources: Some(resources.clone()),
                ..base
            },
            BotResponse::TraumaSupport { resources, .. } => Self {
                validation: Some(true),
                resources: Some(resources.clone()),
                ..base
            },
            BotResponse::PtsdSupport { suggestions, .. } => Self {
                suggestions: Some(suggestions.clone()),
                ..base
            },
            BotResponse::Screening { kind, .. } => Self {
                response_type: Some(kind.to_string()),
                ..base
            },
            BotResponse::Sentiment { suggestions, .. } => Self {
                suggestions: Some(suggestions.clone()),
                ..base
            },
        }
    }
}

/// The chat engine. Owns its conversation history and factor state
/// exclusively; [`SupportEngine::reset`] discards both while keeping the
/// configuration.
#[derive(Debug, Clone)]
pub struct SupportEngine {
    config: EngineConfig,
    history: ConversationHistory,
    factors: FactorState,
}

impl SupportEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            history: ConversationHistory::new(),
            factors: FactorState::new(),
        }
    }

    /// General support engine.
    pub fn support() -> Self {
        Self::new(EngineConfig::support())
    }

    /// Trauma-informed engine.
    pub fn trauma() -> Self {
        Self::new(EngineConfig::trauma())
    }

    pub fn profile(&self) -> EngineProfile {
        self.config.profile
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn factors(&self) -> &FactorState {
        &self.factors
    }

    /// External factor write (operator/UI); the engine never derives
    /// factor values from message text.
    pub fn set_factor(&mut self, factor: Factor, value: FactorValue) {
        self.factors.set(factor, value);
    }

    /// Restore a previously saved history (session resume).
    pub fn restore_history(&mut self, history: ConversationHistory) {
        self.history = history;
    }

    /// Discard the conversation and factor state, keeping the engine
    /// configuration (including any keyword overrides).
    pub fn reset(&mut self) {
        self.history = ConversationHistory::new();
        self.factors = FactorState::new();
    }

    /// Crisis resources for this profile, for display on demand.
    pub fn crisis_resources(&self) -> &'static [&'static str] {
        self.config.crisis_resources
    }

    /// Process one message. Appends exactly one turn and returns the
    /// selected response. Callers must reject empty input at the boundary.
    pub fn get_response(&mut self, message: &str) -> BotResponse {
        // The classifier runs on every message, crisis or not; a
        // keyword-triggered turn is recorded as crisis so the report can
        // derive the Critical tier from history alone.
        let classified = self.config.classifier.classify(message);
        let is_crisis = self.config.keywords.detect_crisis(message);
        let trauma_indicator = self.detect_trauma_indicator(message);

        self.history.push(ConversationTurn {
            message: message.to_string(),
            sentiment: if is_crisis {
                SentimentLabel::Crisis
            } else {
                classified
            },
            trauma_indicator,
        });

        // Priority 1: crisis keywords override everything.
        if is_crisis {
            return BotResponse::Crisis {
                reply: self.config.crisis_reply.to_string(),
                resources: to_strings(self.config.crisis_resources),
            };
        }

        // Priorities 2 and 3: trauma disclosure, then PTSD symptoms.
        if let Some(stage) = &self.config.trauma_stage {
            match trauma_indicator {
                Some(TraumaIndicator::TraumaDisclosure) => {
                    return BotResponse::TraumaSupport {
                        reply: stage.disclosure_reply.to_string(),
                        resources: to_strings(stage.disclosure_resources),
                    };
                }
                Some(TraumaIndicator::PtsdSymptoms) => {
                    return BotResponse::PtsdSupport {
                        reply: stage.ptsd.reply.to_string(),
                        suggestions: to_strings(stage.ptsd.suggestions),
                    };
                }
                None => {}
            }
        }

        // Priority 4: pending screening question.
        if let Some(rule) = self.config.screening.screen(message, &self.factors) {
            tracing::debug!(factor = %rule.factor, "Screening question selected");
            return BotResponse::Screening {
                reply: rule.question.to_string(),
                kind: self.config.profile.screening_kind(),
                factor: rule.factor,
            };
        }

        // Priority 5: canned reply for the classified sentiment.
        let canned = self.config.reply_for(classified);
        BotResponse::Sentiment {
            reply: canned.reply.to_string(),
            label: classified,
            suggestions: to_strings(canned.suggestions),
        }
    }

    fn detect_trauma_indicator(&self, message: &str) -> Option<TraumaIndicator> {
        if self.config.trauma_stage.is_none() {
            return None;
        }
        if self.config.keywords.trauma.matches(message) {
            return Some(TraumaIndicator::TraumaDisclosure);
        }
        if self.config.keywords.ptsd.matches(message) {
            return Some(TraumaIndicator::PtsdSymptoms);
        }
        None
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
