// Factor tracker and screening questions
//
// Each screening factor is asked about at most once: a rule fires only
// while its factor is still unset, and answers are recorded by an external
// write (REPL /set, HTTP factor endpoint), never parsed from free text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Screening factors across both profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    // Support profile
    SleepHours,
    MentalHealthHistory,
    BloodSugarIssues,
    RecentEvents,
    // Trauma profile
    TraumaType,
    TimeSinceTrauma,
    SupportSystem,
    TherapyHistory,
    SafetyConcerns,
    PtsdSymptoms,
}

impl Factor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::SleepHours => "sleep_hours",
            Factor::MentalHealthHistory => "mental_health_history",
            Factor::BloodSugarIssues => "blood_sugar_issues",
            Factor::RecentEvents => "recent_events",
            Factor::TraumaType => "trauma_type",
            Factor::TimeSinceTrauma => "time_since_trauma",
            Factor::SupportSystem => "support_system",
            Factor::TherapyHistory => "therapy_history",
            Factor::SafetyConcerns => "safety_concerns",
            Factor::PtsdSymptoms => "ptsd_symptoms",
        }
    }

    /// Human-readable name used in reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Factor::SleepHours => "Sleep Hours",
            Factor::MentalHealthHistory => "Mental Health History",
            Factor::BloodSugarIssues => "Blood Sugar Issues",
            Factor::RecentEvents => "Recent Life Events",
            Factor::TraumaType => "Trauma Type",
            Factor::TimeSinceTrauma => "Time Since Trauma",
            Factor::SupportSystem => "Support System",
            Factor::TherapyHistory => "Therapy History",
            Factor::SafetyConcerns => "Safety Concerns",
            Factor::PtsdSymptoms => "PTSD Symptoms",
        }
    }
}

impl FromStr for Factor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sleep_hours" => Ok(Factor::SleepHours),
            "mental_health_history" => Ok(Factor::MentalHealthHistory),
            "blood_sugar_issues" => Ok(Factor::BloodSugarIssues),
            "recent_events" => Ok(Factor::RecentEvents),
            "trauma_type" => Ok(Factor::TraumaType),
            "time_since_trauma" => Ok(Factor::TimeSinceTrauma),
            "support_system" => Ok(Factor::SupportSystem),
            "therapy_history" => Ok(Factor::TherapyHistory),
            "safety_concerns" => Ok(Factor::SafetyConcerns),
            "ptsd_symptoms" => Ok(Factor::PtsdSymptoms),
            other => Err(format!("unknown factor: {other}")),
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded factor answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactorValue {
    Number(f64),
    Text(String),
}

impl FactorValue {
    /// Parse an operator-supplied value: numeric if it parses, text otherwise.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) => FactorValue::Number(n),
            Err(_) => FactorValue::Text(raw.trim().to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FactorValue::Number(n) => Some(*n),
            FactorValue::Text(_) => None,
        }
    }

    /// True for affirmative text answers ("yes", case-insensitive).
    pub fn is_yes(&self) -> bool {
        matches!(self, FactorValue::Text(t) if t.eq_ignore_ascii_case("yes"))
    }
}

impl std::fmt::Display for FactorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactorValue::Number(n) => write!(f, "{n}"),
            FactorValue::Text(t) => f.write_str(t),
        }
    }
}

/// Answered screening factors. Absent key = not yet screened.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactorState {
    values: BTreeMap<Factor, FactorValue>,
}

impl FactorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, factor: Factor) -> Option<&FactorValue> {
        self.values.get(&factor)
    }

    pub fn is_set(&self, factor: Factor) -> bool {
        self.values.contains_key(&factor)
    }

    /// Record a factor answer, returning any previous value.
    pub fn set(&mut self, factor: Factor, value: FactorValue) -> Option<FactorValue> {
        tracing::debug!(factor = %factor, value = %value, "Factor recorded");
        self.values.insert(factor, value)
    }

    pub fn answered(&self) -> impl Iterator<Item = (Factor, &FactorValue)> {
        self.values.iter().map(|(f, v)| (*f, v))
    }

    pub fn answered_count(&self) -> usize {
        self.values.len()
    }
}

/// One screening rule: trigger words that make a factor's scripted
/// question eligible.
#[derive(Debug, Clone)]
pub struct ScreeningRule {
    pub factor: Factor,
    pub triggers: &'static [&'static str],
    pub question: &'static str,
}

/// Ordered screening rules; at most one question fires per message.
#[derive(Debug, Clone)]
pub struct ScreeningPlan {
    rules: Vec<ScreeningRule>,
}

impl ScreeningPlan {
    /// Rules for the general support profile, in evaluation order.
    pub fn support() -> Self {
        Self {
            rules: vec![
                ScreeningRule {
                    factor: Factor::RecentEvents,
                    triggers: &[
                        "stressed",
                        "overwhelmed",
                        "difficult",
                        "hard time",
                        "struggling",
                        "upset",
                        "worried",
                        "anxious",
                    ],
                    question: "It sounds like you're going through something challenging. \
                        Can you tell me about any recent changes or stressful events in your \
                        life? This could include work, relationships, family, health, or \
                        financial situations.",
                },
                ScreeningRule {
                    factor: Factor::SleepHours,
                    triggers: &["sleep", "tired", "exhausted", "insomnia"],
                    question: "I notice you mentioned sleep. How many hours of sleep do you \
                        typically get per night?",
                },
                ScreeningRule {
                    factor: Factor::MentalHealthHistory,
                    triggers: &["depression", "anxiety", "therapy", "medication", "psychiatrist"],
                    question: "It sounds like you may have experience with mental health \
                        support. Do you have any diagnosed mental health conditions?",
                },
                ScreeningRule {
                    factor: Factor::BloodSugarIssues,
                    triggers: &["sugar", "diabetes", "glucose", "dizzy", "shaky"],
                    question: "I'm wondering about your physical health. Do you have any \
                        issues with blood sugar or diabetes?",
                },
            ],
        }
    }

    /// Rules for the trauma-informed profile. Safety always comes first;
    /// trauma_type, time_since_trauma and ptsd_symptoms are tracked but
    /// have no scripted question.
    pub fn trauma() -> Self {
        Self {
            rules: vec![
                ScreeningRule {
                    factor: Factor::SafetyConcerns,
                    triggers: &["unsafe", "danger", "threat", "scared", "afraid"],
                    question: "Your safety is my primary concern. Are you currently in a \
                        safe place? Do you feel safe right now?",
                },
                ScreeningRule {
                    factor: Factor::SupportSystem,
                    triggers: &["alone", "isolated", "no one", "lonely"],
                    question: "Having support is crucial for healing. Do you have trusted \
                        people in your life you can talk to - friends, family, or \
                        professionals?",
                },
                ScreeningRule {
                    factor: Factor::TherapyHistory,
                    triggers: &["therapy", "counselor", "treatment", "help"],
                    question: "Professional support can be very helpful. Have you worked \
                        with a trauma-informed therapist or counselor before?",
                },
            ],
        }
    }

    /// First rule whose trigger appears in the message while the factor is
    /// still unanswered.
    pub fn screen(&self, message: &str, state: &FactorState) -> Option<&ScreeningRule> {
        let lower = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| !state.is_set(rule.factor) && rule.triggers.iter().any(|t| lower.contains(t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screening_fires_on_trigger() {
        let plan = ScreeningPlan::support();
        let state = FactorState::new();

        let rule = plan.screen("I have been so tired lately", &state).unwrap();
        assert_eq!(rule.factor, Factor::SleepHours);
        assert!(rule.question.contains("hours of sleep"));
    }

    #[test]
    fn test_screening_fires_at_most_once_per_factor() {
        let plan = ScreeningPlan::support();
        let mut state = FactorState::new();

        assert!(plan.screen("I can't sleep at night", &state).is_some());
        state.set(Factor::SleepHours, FactorValue::Number(5.0));
        assert!(plan.screen("I can't sleep at night", &state).is_none());
    }

    #[test]
    fn test_rule_order_short_circuits() {
        let plan = ScreeningPlan::support();
        let mut state = FactorState::new();

        // Both recent_events ("stressed") and sleep ("tired") trigger;
        // the earlier rule wins.
        let rule = plan.screen("I'm stressed and tired", &state).unwrap();
        assert_eq!(rule.factor, Factor::RecentEvents);

        // Once recent_events is answered, the same message falls through
        // to the sleep rule.
        state.set(Factor::RecentEvents, FactorValue::Text("work stress".into()));
        let rule = plan.screen("I'm stressed and tired", &state).unwrap();
        assert_eq!(rule.factor, Factor::SleepHours);
    }

    #[test]
    fn test_trauma_plan_safety_first() {
        let plan = ScreeningPlan::trauma();
        let state = FactorState::new();

        let rule = plan.screen("I feel scared and alone", &state).unwrap();
        assert_eq!(rule.factor, Factor::SafetyConcerns);
    }

    #[test]
    fn test_no_trigger_no_question() {
        let plan = ScreeningPlan::support();
        assert!(plan.screen("studies are going well", &FactorState::new()).is_none());
    }

    #[test]
    fn test_factor_value_parse() {
        assert_eq!(FactorValue::parse("5"), FactorValue::Number(5.0));
        assert_eq!(FactorValue::parse("yes"), FactorValue::Text("yes".into()));
        assert!(FactorValue::parse("YES").is_yes());
        assert!(!FactorValue::parse("no").is_yes());
    }

    #[test]
    fn test_factor_round_trip() {
        for factor in [
            Factor::SleepHours,
            Factor::RecentEvents,
            Factor::SafetyConcerns,
            Factor::PtsdSymptoms,
        ] {
            assert_eq!(factor.as_str().parse::<Factor>().unwrap(), factor);
        }
    }
}
