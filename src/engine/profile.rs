// Engine profiles
//
// The two chatbot variants share one engine; everything that differs
// between them lives in an EngineConfig value built here: classifier
// thresholds, keyword vocabularies, screening rules and canned replies.

use serde::{Deserialize, Serialize};

use crate::keywords::KeywordSets;
use crate::screening::ScreeningPlan;
use crate::sentiment::{SentimentClassifier, SentimentLabel};

/// Which variant of the engine a config represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineProfile {
    #[default]
    Support,
    Trauma,
}

impl EngineProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineProfile::Support => "support",
            EngineProfile::Trauma => "trauma",
        }
    }

    /// Response `type` tag for screening questions.
    pub fn screening_kind(&self) -> &'static str {
        match self {
            EngineProfile::Support => "health_screening",
            EngineProfile::Trauma => "trauma_screening",
        }
    }
}

impl std::fmt::Display for EngineProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canned reply with its suggestion list.
#[derive(Debug, Clone)]
pub struct CannedReply {
    pub reply: &'static str,
    pub suggestions: &'static [&'static str],
}

/// Replies for the trauma-disclosure and PTSD-symptom stages; only the
/// trauma profile carries these.
#[derive(Debug, Clone)]
pub struct TraumaStage {
    pub disclosure_reply: &'static str,
    pub disclosure_resources: &'static [&'static str],
    pub ptsd: CannedReply,
}

/// Full configuration for one engine variant.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub profile: EngineProfile,
    pub classifier: SentimentClassifier,
    pub keywords: KeywordSets,
    pub screening: ScreeningPlan,
    pub crisis_reply: &'static str,
    pub crisis_resources: &'static [&'static str],
    pub trauma_stage: Option<TraumaStage>,
    sentiment_replies: &'static [(SentimentLabel, CannedReply)],
    fallback_reply: CannedReply,
}

impl EngineConfig {
    /// General mental health support variant.
    pub fn support() -> Self {
        Self {
            profile: EngineProfile::Support,
            classifier: SentimentClassifier::support(),
            keywords: KeywordSets::support(),
            screening: ScreeningPlan::support(),
            crisis_reply: "I'm very concerned about you. Please reach out for immediate help.",
            crisis_resources: &[
                "911",
                "988 Suicide & Crisis Lifeline",
                "Crisis Text Line: Text HOME to 741741",
            ],
            trauma_stage: None,
            sentiment_replies: &[
                (
                    SentimentLabel::VeryNegative,
                    CannedReply {
                        reply: "I can sense you're going through a really difficult time. \
                            Your pain is real and valid. Would you like to talk about what's \
                            weighing on you most right now?",
                        suggestions: &[
                            "Deep breathing exercises",
                            "Call a trusted friend",
                            "Consider professional support",
                        ],
                    },
                ),
                (
                    SentimentLabel::Negative,
                    CannedReply {
                        reply: "I hear that things are tough for you right now. It takes \
                            strength to reach out. What's been the hardest part of your day?",
                        suggestions: &[
                            "Take a short walk",
                            "Practice mindfulness",
                            "Journal your thoughts",
                        ],
                    },
                ),
                (
                    SentimentLabel::Positive,
                    CannedReply {
                        reply: "I'm glad to hear some positivity in your message! It's \
                            wonderful when we can find moments of light. What's been going \
                            well for you?",
                        suggestions: &[
                            "Keep doing what's working",
                            "Share your positivity",
                            "Build on this momentum",
                        ],
                    },
                ),
            ],
            fallback_reply: CannedReply {
                reply: "Thank you for sharing with me. I'm here to listen and support you. \
                    What would be most helpful right now?",
                suggestions: &[
                    "Take things one step at a time",
                    "Focus on self-care",
                    "Reach out when you need support",
                ],
            },
        }
    }

    /// Trauma-informed variant with disclosure and PTSD-symptom stages.
    pub fn trauma() -> Self {
        Self {
            profile: EngineProfile::Trauma,
            classifier: SentimentClassifier::trauma(),
            keywords: KeywordSets::trauma_informed(),
            screening: ScreeningPlan::trauma(),
            crisis_reply: "I'm very concerned about your safety right now. Please reach out \
                for immediate help:\n\
                \u{2022} Call 911 if in immediate danger\n\
                \u{2022} National Suicide Prevention Lifeline: 988\n\
                \u{2022} Crisis Text Line: Text HOME to 741741\n\n\
                You matter, and there are people who want to help you.",
            crisis_resources: &["911", "988", "Crisis Text Line: 741741"],
            trauma_stage: Some(TraumaStage {
                disclosure_reply: "Thank you for trusting me with something so difficult to \
                    share. What happened to you was not your fault. You showed incredible \
                    strength by surviving and reaching out. I'm here to support you in \
                    whatever way feels helpful right now.",
                disclosure_resources: &["RAINN: 1-800-656-HOPE", "Crisis Text Line: 741741"],
                ptsd: CannedReply {
                    reply: "What you're experiencing sounds like trauma responses, which are \
                        normal reactions to abnormal experiences. These symptoms can be very \
                        distressing, but they can improve with proper support and treatment. \
                        Have you been able to connect with a trauma-informed therapist?",
                    suggestions: &[
                        "Grounding techniques",
                        "Deep breathing",
                        "Professional trauma therapy",
                    ],
                },
            }),
            sentiment_replies: &[
                (
                    SentimentLabel::SevereDistress,
                    CannedReply {
                        reply: "I can hear how much pain you're in right now. That level of \
                            distress is overwhelming, and you don't have to face it alone. \
                            Your feelings are valid, and healing is possible, even when it \
                            doesn't feel that way.",
                        suggestions: &[
                            "Contact RAINN: 1-800-656-HOPE",
                            "Reach out to a trusted person",
                            "Consider crisis support",
                        ],
                    },
                ),
                (
                    SentimentLabel::Distressed,
                    CannedReply {
                        reply: "I can sense you're struggling right now. Trauma can make \
                            everything feel more difficult, and that's understandable. \
                            You've already shown so much strength. What would feel most \
                            supportive right now?",
                        suggestions: &[
                            "Practice self-compassion",
                            "Use grounding techniques",
                            "Connect with support",
                        ],
                    },
                ),
                (
                    SentimentLabel::Positive,
                    CannedReply {
                        reply: "I'm glad to hear some hope or positivity in your words. \
                            Healing isn't linear, and these moments of light are important \
                            to acknowledge. You're doing important work in your recovery.",
                        suggestions: &[
                            "Celebrate small victories",
                            "Build on positive moments",
                            "Continue self-care practices",
                        ],
                    },
                ),
            ],
            fallback_reply: CannedReply {
                reply: "I'm here to listen and support you. Trauma recovery takes time, and \
                    every step forward matters, no matter how small. What's on your mind \
                    today?",
                suggestions: &[
                    "Take things at your own pace",
                    "Practice self-care",
                    "Remember you're not alone",
                ],
            },
        }
    }

    /// Canned reply for a classified sentiment, falling back to the
    /// neutral reply for labels without a dedicated one.
    pub fn reply_for(&self, label: SentimentLabel) -> &CannedReply {
        self.sentiment_replies
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, r)| r)
            .unwrap_or(&self.fallback_reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_reply_table() {
        let config = EngineConfig::support();

        let very_negative = config.reply_for(SentimentLabel::VeryNegative);
        assert!(very_negative.reply.contains("really difficult time"));

        let neutral = config.reply_for(SentimentLabel::Neutral);
        assert!(neutral.reply.contains("here to listen"));
    }

    #[test]
    fn test_trauma_reply_table() {
        let config = EngineConfig::trauma();

        let severe = config.reply_for(SentimentLabel::SevereDistress);
        assert!(severe.suggestions.contains(&"Contact RAINN: 1-800-656-HOPE"));

        // No dedicated negative reply in the trauma profile; falls back.
        let negative = config.reply_for(SentimentLabel::Negative);
        assert!(negative.reply.contains("Trauma recovery takes time"));
    }

    #[test]
    fn test_trauma_stage_only_in_trauma_profile() {
        assert!(EngineConfig::support().trauma_stage.is_none());
        let trauma = EngineConfig::trauma();
        let stage = trauma.trauma_stage.as_ref().unwrap();
        assert!(stage.disclosure_reply.contains("not your fault"));
        assert!(stage.ptsd.suggestions.contains(&"Grounding techniques"));
    }

    #[test]
    fn test_screening_kinds() {
        assert_eq!(EngineProfile::Support.screening_kind(), "health_screening");
        assert_eq!(EngineProfile::Trauma.screening_kind(), "trauma_screening");
    }
}
