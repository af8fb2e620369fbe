// Report synthesizer
//
// Pure function of conversation history and factor state: derives a risk
// tier, tallies indicators, summarizes factors and picks the tiered
// recommendation list. Rendering and persistence are the sink's problem.

use serde::{Deserialize, Serialize};

use crate::engine::{ConversationHistory, EngineProfile};
use crate::screening::{Factor, FactorState};
use crate::sentiment::SentimentLabel;

/// Ordered severity tiers across both profiles. The support profile
/// produces Critical/High/Medium/Low, the trauma profile
/// Critical/High/Moderate/Stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Moderate,
    Low,
    Stable,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "Critical",
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Low => "Low",
            RiskLevel::Stable => "Stable",
        }
    }

    /// Human-readable explanation for the report body.
    pub fn explanation(&self) -> &'static str {
        match self {
            RiskLevel::Critical => {
                "Immediate intervention required. Crisis indicators detected suggesting \
                 potential self-harm risk."
            }
            RiskLevel::High => {
                "Significant mental health concerns present. Professional evaluation \
                 strongly recommended."
            }
            RiskLevel::Medium => {
                "Moderate risk factors identified. Monitoring and support recommended."
            }
            RiskLevel::Moderate => {
                "Ongoing trauma-related distress identified. Continued trauma-informed \
                 support recommended."
            }
            RiskLevel::Low => "Minimal risk indicators. Maintain current positive practices.",
            RiskLevel::Stable => {
                "No acute distress indicators. Continue current self-care practices."
            }
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named tally or status line in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub name: String,
    pub value: String,
}

impl Indicator {
    fn new(name: &str, value: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// One screening factor with its recorded value, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSummary {
    pub factor: Factor,
    pub name: String,
    /// None = not assessed.
    pub value: Option<String>,
}

/// Derived, read-only snapshot of a conversation's risk picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub profile: EngineProfile,
    pub risk_level: RiskLevel,
    /// Profile-flavored risk line, e.g.
    /// "Critical - Immediate Support Needed" for the trauma profile.
    pub headline: String,
    pub indicators: Vec<Indicator>,
    pub factors: Vec<FactorSummary>,
    pub recommendations: Vec<String>,
}

/// Factors reported per profile, in report order.
fn profile_factors(profile: EngineProfile) -> &'static [Factor] {
    match profile {
        EngineProfile::Support => &[
            Factor::SleepHours,
            Factor::MentalHealthHistory,
            Factor::BloodSugarIssues,
            Factor::RecentEvents,
        ],
        EngineProfile::Trauma => &[
            Factor::TraumaType,
            Factor::TimeSinceTrauma,
            Factor::SupportSystem,
            Factor::TherapyHistory,
            Factor::SafetyConcerns,
            Factor::PtsdSymptoms,
        ],
    }
}

/// Compile a risk report. Returns `None` on an empty history; callers
/// must check non-emptiness first.
pub fn synthesize(
    profile: EngineProfile,
    history: &ConversationHistory,
    factors: &FactorState,
) -> Option<RiskReport> {
    if history.is_empty() {
        return None;
    }

    let risk_level = match profile {
        EngineProfile::Support => derive_support_risk(history),
        EngineProfile::Trauma => derive_trauma_risk(history),
    };

    let report = RiskReport {
        profile,
        risk_level,
        headline: headline(profile, risk_level),
        indicators: indicators(profile, history, factors),
        factors: factor_summaries(profile, factors),
        recommendations: recommendations(profile, risk_level, factors),
    };

    tracing::info!(profile = %profile, risk = %risk_level, "Risk report synthesized");
    Some(report)
}

fn derive_support_risk(history: &ConversationHistory) -> RiskLevel {
    if history.has_sentiment(SentimentLabel::Crisis) {
        RiskLevel::Critical
    } else if history.has_sentiment(SentimentLabel::VeryNegative) {
        RiskLevel::High
    } else if history.has_sentiment(SentimentLabel::Negative) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn derive_trauma_risk(history: &ConversationHistory) -> RiskLevel {
    let trauma_count = history.trauma_indicator_count();

    if history.has_sentiment(SentimentLabel::Crisis) {
        RiskLevel::Critical
    } else if history.has_sentiment(SentimentLabel::SevereDistress) || trauma_count > 2 {
        RiskLevel::High
    } else if history.has_sentiment(SentimentLabel::Distressed) || trauma_count > 0 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Stable
    }
}

fn headline(profile: EngineProfile, risk: RiskLevel) -> String {
    match profile {
        EngineProfile::Support => risk.as_str().to_string(),
        EngineProfile::Trauma => {
            let suffix = match risk {
                RiskLevel::Critical => "Immediate Support Needed",
                RiskLevel::High => "Trauma-Informed Care Recommended",
                RiskLevel::Moderate => "Ongoing Support Beneficial",
                _ => "Continue Self-Care",
            };
            format!("{} - {}", risk.as_str(), suffix)
        }
    }
}

fn indicators(
    profile: EngineProfile,
    history: &ConversationHistory,
    factors: &FactorState,
) -> Vec<Indicator> {
    match profile {
        EngineProfile::Support => vec![
            Indicator::new("Total Messages", history.len()),
            Indicator::new(
                "Negative Sentiment",
                history.count_sentiment(SentimentLabel::Negative)
                    + history.count_sentiment(SentimentLabel::VeryNegative),
            ),
            Indicator::new(
                "Positive Sentiment",
                history.count_sentiment(SentimentLabel::Positive),
            ),
            Indicator::new(
                "Crisis Indicators",
                history.count_sentiment(SentimentLabel::Crisis),
            ),
        ],
        EngineProfile::Trauma => vec![
            Indicator::new("Total Messages", history.len()),
            Indicator::new("Trauma Disclosures", history.trauma_indicator_count()),
            Indicator::new(
                "Crisis Indicators",
                history.count_sentiment(SentimentLabel::Crisis),
            ),
            Indicator::new(
                "Severe Distress Episodes",
                history.count_sentiment(SentimentLabel::SevereDistress),
            ),
            Indicator::new(
                "Safety Concerns",
                if factors.is_set(Factor::SafetyConcerns) {
                    "Yes"
                } else {
                    "Not assessed"
                },
            ),
        ],
    }
}

fn factor_summaries(profile: EngineProfile, factors: &FactorState) -> Vec<FactorSummary> {
    profile_factors(profile)
        .iter()
        .map(|&factor| FactorSummary {
            factor,
            name: factor.display_name().to_string(),
            value: factors.get(factor).map(|v| v.to_string()),
        })
        .collect()
}

fn recommendations(
    profile: EngineProfile,
    risk: RiskLevel,
    factors: &FactorState,
) -> Vec<String> {
    let fixed: &[&str] = match (profile, risk) {
        (EngineProfile::Support, RiskLevel::Critical) => &[
            "Seek immediate professional help",
            "Contact crisis hotline: 988",
            "Go to nearest emergency room if in immediate danger",
        ],
        (EngineProfile::Support, RiskLevel::High) => &[
            "Schedule appointment with mental health professional within 1-2 weeks",
            "Contact primary care physician",
            "Activate support network",
        ],
        (EngineProfile::Support, RiskLevel::Medium) => &[
            "Consider counseling or therapy",
            "Monitor symptoms daily",
            "Practice stress-reduction techniques",
        ],
        (EngineProfile::Support, _) => &[
            "Continue positive practices",
            "Maintain healthy routines",
            "Stay connected with support system",
        ],
        (EngineProfile::Trauma, RiskLevel::Critical) => &[
            "Immediate crisis intervention required",
            "Contact RAINN: 1-800-656-HOPE",
            "Consider emergency services if in immediate danger",
            "Activate safety plan if available",
        ],
        (EngineProfile::Trauma, RiskLevel::High) => &[
            "Trauma-informed therapy strongly recommended",
            "Consider EMDR or trauma-focused CBT",
            "Establish safety planning",
            "Connect with sexual assault support center",
        ],
        (EngineProfile::Trauma, RiskLevel::Moderate) => &[
            "Continue trauma-informed support",
            "Practice grounding and self-care techniques",
            "Consider support groups for survivors",
            "Maintain connection with trusted support system",
        ],
        (EngineProfile::Trauma, _) => &[
            "Continue current coping strategies",
            "Maintain self-care practices",
            "Stay connected with support network",
            "Remember healing is not linear",
        ],
    };

    let mut recs: Vec<String> = fixed.iter().map(|s| s.to_string()).collect();

    // Conditional appends. Unset factors are "not assessed" and add nothing.
    if let Some(hours) = factors.get(Factor::SleepHours).and_then(|v| v.as_number()) {
        if hours < 6.0 {
            recs.push("Address sleep hygiene and consider sleep study".to_string());
        }
    }
    if factors
        .get(Factor::BloodSugarIssues)
        .is_some_and(|v| v.is_yes())
    {
        recs.push("Coordinate with primary care for glucose management".to_string());
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ConversationTurn, TraumaIndicator};
    use crate::screening::FactorValue;

    fn history_of(labels: &[SentimentLabel]) -> ConversationHistory {
        let mut history = ConversationHistory::new();
        for &sentiment in labels {
            history.push(ConversationTurn {
                message: "test".to_string(),
                sentiment,
                trauma_indicator: None,
            });
        }
        history
    }

    #[test]
    fn test_empty_history_yields_no_report() {
        let history = ConversationHistory::new();
        let factors = FactorState::new();
        assert!(synthesize(EngineProfile::Support, &history, &factors).is_none());
    }

    #[test]
    fn test_support_risk_ladder() {
        let factors = FactorState::new();
        let cases = [
            (vec![SentimentLabel::Crisis, SentimentLabel::Positive], RiskLevel::Critical),
            (vec![SentimentLabel::VeryNegative], RiskLevel::High),
            (
                vec![
                    SentimentLabel::Negative,
                    SentimentLabel::Positive,
                    SentimentLabel::Neutral,
                ],
                RiskLevel::Medium,
            ),
            (vec![SentimentLabel::Neutral, SentimentLabel::Positive], RiskLevel::Low),
        ];

        for (labels, expected) in cases {
            let report =
                synthesize(EngineProfile::Support, &history_of(&labels), &factors).unwrap();
            assert_eq!(report.risk_level, expected, "labels {labels:?}");
        }
    }

    #[test]
    fn test_medium_report_has_fixed_recommendations_only() {
        let history = history_of(&[
            SentimentLabel::Negative,
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
        ]);
        let report = synthesize(EngineProfile::Support, &history, &FactorState::new()).unwrap();

        assert_eq!(report.risk_level, RiskLevel::Medium);
        assert_eq!(
            report.recommendations,
            vec![
                "Consider counseling or therapy",
                "Monitor symptoms daily",
                "Practice stress-reduction techniques",
            ]
        );
    }

    #[test]
    fn test_conditional_recommendations() {
        let history = history_of(&[SentimentLabel::Neutral]);
        let mut factors = FactorState::new();
        factors.set(Factor::SleepHours, FactorValue::Number(4.0));
        factors.set(Factor::BloodSugarIssues, FactorValue::Text("yes".into()));

        let report = synthesize(EngineProfile::Support, &history, &factors).unwrap();
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("sleep hygiene")));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("glucose management")));
    }

    #[test]
    fn test_adequate_sleep_adds_nothing() {
        let history = history_of(&[SentimentLabel::Neutral]);
        let mut factors = FactorState::new();
        factors.set(Factor::SleepHours, FactorValue::Number(8.0));

        let report = synthesize(EngineProfile::Support, &history, &factors).unwrap();
        assert!(!report.recommendations.iter().any(|r| r.contains("sleep")));
    }

    #[test]
    fn test_trauma_risk_ladder() {
        let factors = FactorState::new();

        let report = synthesize(
            EngineProfile::Trauma,
            &history_of(&[SentimentLabel::SevereDistress]),
            &factors,
        )
        .unwrap();
        assert_eq!(report.risk_level, RiskLevel::High);
        assert_eq!(report.headline, "High - Trauma-Informed Care Recommended");

        let report = synthesize(
            EngineProfile::Trauma,
            &history_of(&[SentimentLabel::Distressed]),
            &factors,
        )
        .unwrap();
        assert_eq!(report.risk_level, RiskLevel::Moderate);

        let report = synthesize(
            EngineProfile::Trauma,
            &history_of(&[SentimentLabel::Neutral]),
            &factors,
        )
        .unwrap();
        assert_eq!(report.risk_level, RiskLevel::Stable);
    }

    #[test]
    fn test_trauma_indicator_counts_drive_risk() {
        let factors = FactorState::new();
        let mut history = ConversationHistory::new();
        for _ in 0..3 {
            history.push(ConversationTurn {
                message: "disclosure".to_string(),
                sentiment: SentimentLabel::Neutral,
                trauma_indicator: Some(TraumaIndicator::TraumaDisclosure),
            });
        }

        // Three indicators with no distress sentiment still escalate to High.
        let report = synthesize(EngineProfile::Trauma, &history, &factors).unwrap();
        assert_eq!(report.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_indicator_tallies() {
        let history = history_of(&[
            SentimentLabel::Negative,
            SentimentLabel::VeryNegative,
            SentimentLabel::Positive,
            SentimentLabel::Crisis,
        ]);
        let report = synthesize(EngineProfile::Support, &history, &FactorState::new()).unwrap();

        let get = |name: &str| {
            report
                .indicators
                .iter()
                .find(|i| i.name == name)
                .map(|i| i.value.clone())
                .unwrap()
        };
        assert_eq!(get("Total Messages"), "4");
        assert_eq!(get("Negative Sentiment"), "2");
        assert_eq!(get("Positive Sentiment"), "1");
        assert_eq!(get("Crisis Indicators"), "1");
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let history = history_of(&[SentimentLabel::Negative, SentimentLabel::Positive]);
        let mut factors = FactorState::new();
        factors.set(Factor::SleepHours, FactorValue::Number(5.0));

        let a = synthesize(EngineProfile::Support, &history, &factors).unwrap();
        let b = synthesize(EngineProfile::Support, &history, &factors).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unset_factors_reported_as_not_assessed() {
        let history = history_of(&[SentimentLabel::Neutral]);
        let report = synthesize(EngineProfile::Support, &history, &FactorState::new()).unwrap();

        assert_eq!(report.factors.len(), 4);
        assert!(report.factors.iter().all(|f| f.value.is_none()));
    }
}
