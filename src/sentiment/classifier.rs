// Threshold classifier mapping polarity scores to discrete labels

use serde::{Deserialize, Serialize};

use super::lexicon::polarity;

/// Discrete sentiment assigned to a conversation turn.
///
/// `Crisis` is reserved for keyword-triggered turns; the polarity
/// classifier never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    SevereDistress,
    VeryNegative,
    Distressed,
    Negative,
    Neutral,
    Positive,
    Crisis,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::SevereDistress => "severe_distress",
            SentimentLabel::VeryNegative => "very_negative",
            SentimentLabel::Distressed => "distressed",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
            SentimentLabel::Crisis => "crisis",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered threshold ladder; first matching rung wins.
#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    below: &'static [(f64, SentimentLabel)],
    positive_cutoff: f64,
}

impl SentimentClassifier {
    /// Ladder for the general support profile.
    pub fn support() -> Self {
        Self {
            below: &[
                (-0.5, SentimentLabel::VeryNegative),
                (-0.1, SentimentLabel::Negative),
            ],
            positive_cutoff: 0.1,
        }
    }

    /// Ladder for the trauma-informed profile, with finer distress grades.
    pub fn trauma() -> Self {
        Self {
            below: &[
                (-0.6, SentimentLabel::SevereDistress),
                (-0.3, SentimentLabel::Distressed),
                (-0.1, SentimentLabel::Negative),
            ],
            positive_cutoff: 0.1,
        }
    }

    /// Classify a message. Pure function of the input text.
    pub fn classify(&self, message: &str) -> SentimentLabel {
        let score = polarity(message);

        for &(cutoff, label) in self.below {
            if score < cutoff {
                return label;
            }
        }

        if score > self.positive_cutoff {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_thresholds() {
        let clf = SentimentClassifier::support();

        assert_eq!(
            clf.classify("I feel hopeless and worthless, everything is terrible"),
            SentimentLabel::VeryNegative
        );
        assert_eq!(
            clf.classify("today was a hard and difficult day"),
            SentimentLabel::Negative
        );
        assert_eq!(clf.classify("studies are going well"), SentimentLabel::Positive);
        assert_eq!(clf.classify("the meeting is at noon"), SentimentLabel::Neutral);
    }

    #[test]
    fn test_trauma_thresholds() {
        let clf = SentimentClassifier::trauma();

        assert_eq!(
            clf.classify("I feel hopeless and worthless, everything is terrible"),
            SentimentLabel::SevereDistress
        );
        assert_eq!(clf.classify("I feel so sad"), SentimentLabel::Distressed);
        assert_eq!(
            clf.classify("today was a hard and difficult day"),
            SentimentLabel::Negative
        );
        assert_eq!(clf.classify("studies are going well"), SentimentLabel::Positive);
        assert_eq!(clf.classify("the meeting is at noon"), SentimentLabel::Neutral);
    }

    #[test]
    fn test_classifier_never_emits_crisis() {
        let clf = SentimentClassifier::support();
        // Even explicit crisis phrasing only yields a polarity label here;
        // crisis detection is the keyword matcher's job.
        assert_ne!(clf.classify("I want to end my life"), SentimentLabel::Crisis);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let clf = SentimentClassifier::trauma();
        let text = "I feel so sad and alone";
        assert_eq!(clf.classify(text), clf.classify(text));
    }

    #[test]
    fn test_label_serde_snake_case() {
        let json = serde_json::to_string(&SentimentLabel::VeryNegative).unwrap();
        assert_eq!(json, "\"very_negative\"");
        let back: SentimentLabel = serde_json::from_str("\"severe_distress\"").unwrap();
        assert_eq!(back, SentimentLabel::SevereDistress);
    }
}
