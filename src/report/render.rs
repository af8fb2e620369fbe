// Report rendering
//
// The synthesizer hands a structured RiskReport to a renderer; layout and
// persistence live behind this seam so a PDF or HTML sink can be swapped
// in without touching synthesis.

use crate::engine::EngineProfile;
use crate::screening::Factor;

use super::synthesizer::{FactorSummary, RiskLevel, RiskReport};

/// Document sink capability: turn a structured report into a document.
pub trait ReportRenderer {
    fn render(&self, report: &RiskReport) -> String;
}

/// Plain-text renderer used by the CLI.
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &RiskReport) -> String {
        let mut doc = String::new();
        let title = match report.profile {
            EngineProfile::Support => "Mental Health Support Report",
            EngineProfile::Trauma => "Trauma Support Report",
        };

        section(&mut doc, title);
        doc.push_str(&format!("Risk Level: {}\n", report.headline));

        section(&mut doc, "Risk Assessment Explanation");
        doc.push_str(report.risk_level.explanation());
        doc.push('\n');

        section(&mut doc, "Assessment Factors");
        for factor in &report.factors {
            let value = factor.value.as_deref().unwrap_or("Not assessed");
            match factor_impact(factor) {
                Some(impact) => {
                    doc.push_str(&format!("- {}: {} - {}\n", factor.name, value, impact))
                }
                None => doc.push_str(&format!("- {}: {}\n", factor.name, value)),
            }
        }

        section(&mut doc, "Key Indicators");
        for indicator in &report.indicators {
            doc.push_str(&format!("- {}: {}\n", indicator.name, indicator.value));
        }

        section(&mut doc, "Support Recommendations");
        for rec in &report.recommendations {
            doc.push_str(&format!("- {rec}\n"));
        }

        let notes = clinical_notes(report);
        if !notes.is_empty() {
            section(&mut doc, "Clinical Considerations");
            for note in notes {
                doc.push_str(&format!("- {note}\n"));
            }
        }

        if report.profile == EngineProfile::Trauma {
            section(&mut doc, "Specialized Resources");
            for resource in [
                "RAINN National Sexual Assault Hotline: 1-800-656-HOPE (4673)",
                "Crisis Text Line: Text HOME to 741741",
                "National Suicide Prevention Lifeline: 988",
                "National Domestic Violence Hotline: 1-800-799-7233",
            ] {
                doc.push_str(&format!("- {resource}\n"));
            }
        }

        doc.push('\n');
        doc.push_str(match report.profile {
            EngineProfile::Support => {
                "This report is for support purposes only and is not a medical diagnosis."
            }
            EngineProfile::Trauma => {
                "This report provides trauma-informed support resources and is not a \
                 medical diagnosis. Professional trauma therapy is recommended for \
                 comprehensive care."
            }
        });
        doc.push('\n');

        doc
    }
}

fn section(doc: &mut String, heading: &str) {
    if !doc.is_empty() {
        doc.push('\n');
    }
    doc.push_str(heading);
    doc.push('\n');
    doc.push_str(&"=".repeat(heading.len()));
    doc.push('\n');
}

/// Medical-impact line for an assessed support-profile factor.
fn factor_impact(summary: &FactorSummary) -> Option<&'static str> {
    let value = summary.value.as_deref()?;

    match summary.factor {
        Factor::SleepHours => {
            let hours: f64 = value.parse().ok()?;
            Some(if hours < 6.0 {
                "Sleep deprivation can significantly impact mood regulation and cognitive \
                 function."
            } else if hours > 9.0 {
                "Excessive sleep may indicate depression or other underlying conditions."
            } else {
                "Adequate sleep supports mental health stability."
            })
        }
        Factor::MentalHealthHistory => Some(if value.eq_ignore_ascii_case("yes") {
            "Previous mental health conditions increase risk of recurrence."
        } else {
            "No documented history reduces baseline risk factors."
        }),
        Factor::BloodSugarIssues => Some(if value.eq_ignore_ascii_case("yes") {
            "Blood sugar fluctuations can affect mood, anxiety, and cognitive function."
        } else {
            "Stable blood sugar supports consistent mental health."
        }),
        Factor::RecentEvents => Some(recent_event_impact(value)),
        _ => None,
    }
}

fn recent_event_impact(value: &str) -> &'static str {
    let lower = value.to_lowercase();
    if lower.contains("work") {
        "Work-related stress can significantly impact mental health and requires coping \
         strategies."
    } else if lower.contains("relationship") {
        "Relationship problems are major stressors that can trigger depression and anxiety."
    } else if lower.contains("financial") {
        "Financial stress is strongly linked to increased mental health risks."
    } else if lower.contains("health") {
        "Physical health problems can compound mental health challenges."
    } else if lower.contains("family") {
        "Family conflicts or changes can be significant emotional stressors."
    } else if lower.contains("loss") || lower.contains("grief") {
        "Recent loss or grief requires specialized support and monitoring."
    } else if lower == "none" {
        "No recent major stressors identified."
    } else {
        "Significant life transitions can temporarily increase mental health vulnerability."
    }
}

/// Tier- and factor-driven clinical notes appended below the
/// recommendations.
fn clinical_notes(report: &RiskReport) -> Vec<&'static str> {
    let mut notes = Vec::new();

    match report.risk_level {
        RiskLevel::Critical => notes.extend([
            "Immediate psychiatric evaluation recommended",
            "Consider safety planning and crisis intervention",
            "Monitor for suicidal ideation or self-harm behaviors",
        ]),
        RiskLevel::High => notes.extend([
            "Professional mental health assessment advised within 1-2 weeks",
            "Consider medication evaluation if not currently treated",
            "Implement regular check-ins and support system activation",
        ]),
        RiskLevel::Medium | RiskLevel::Moderate => notes.extend([
            "Monitor symptoms and functioning over next 2-4 weeks",
            "Consider counseling or therapy if symptoms persist",
            "Encourage healthy coping strategies and lifestyle modifications",
        ]),
        RiskLevel::Low | RiskLevel::Stable => {}
    }

    let factor_value = |f: Factor| {
        report
            .factors
            .iter()
            .find(|s| s.factor == f)
            .and_then(|s| s.value.as_deref())
    };

    if let Some(hours) = factor_value(Factor::SleepHours).and_then(|v| v.parse::<f64>().ok()) {
        if hours < 6.0 {
            notes.push(
                "Address sleep hygiene and consider sleep study if chronic insomnia persists",
            );
        }
    }

    if factor_value(Factor::BloodSugarIssues).is_some_and(|v| v.eq_ignore_ascii_case("yes")) {
        notes.push("Coordinate with primary care physician for diabetes/glucose management");
    }

    if let Some(events) = factor_value(Factor::RecentEvents) {
        let lower = events.to_lowercase();
        if lower != "none" {
            notes.push(
                "Address recent life stressors through targeted counseling or stress \
                 management techniques",
            );
            if lower.contains("loss") || lower.contains("grief") {
                notes.push("Consider grief counseling or bereavement support groups");
            }
            if lower.contains("work") {
                notes.push(
                    "Evaluate work-life balance and consider workplace accommodations if needed",
                );
            }
        }
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ConversationHistory, ConversationTurn};
    use crate::report::synthesize;
    use crate::screening::{FactorState, FactorValue};
    use crate::sentiment::SentimentLabel;

    fn sample_report() -> RiskReport {
        let mut history = ConversationHistory::new();
        history.push(ConversationTurn {
            message: "I feel hopeless and worthless, everything is terrible".to_string(),
            sentiment: SentimentLabel::VeryNegative,
            trauma_indicator: None,
        });
        let mut factors = FactorState::new();
        factors.set(Factor::SleepHours, FactorValue::Number(4.0));
        factors.set(Factor::RecentEvents, FactorValue::Text("work stress".into()));

        synthesize(EngineProfile::Support, &history, &factors).unwrap()
    }

    #[test]
    fn test_render_contains_required_sections() {
        let doc = TextRenderer::new().render(&sample_report());

        assert!(doc.contains("Mental Health Support Report"));
        assert!(doc.contains("Risk Level: High"));
        assert!(doc.contains("Risk Assessment Explanation"));
        assert!(doc.contains("Key Indicators"));
        assert!(doc.contains("Support Recommendations"));
        assert!(doc.contains("not a medical diagnosis"));
    }

    #[test]
    fn test_render_factor_impacts() {
        let doc = TextRenderer::new().render(&sample_report());

        assert!(doc.contains("Sleep deprivation"));
        assert!(doc.contains("Work-related stress"));
        assert!(doc.contains("Mental Health History: Not assessed"));
    }

    #[test]
    fn test_render_clinical_notes() {
        let doc = TextRenderer::new().render(&sample_report());

        assert!(doc.contains("Clinical Considerations"));
        assert!(doc.contains("sleep study if chronic insomnia persists"));
        assert!(doc.contains("work-life balance"));
    }

    #[test]
    fn test_trauma_report_lists_specialized_resources() {
        let mut history = ConversationHistory::new();
        history.push(ConversationTurn {
            message: "I feel so sad".to_string(),
            sentiment: SentimentLabel::Distressed,
            trauma_indicator: None,
        });
        let report =
            synthesize(EngineProfile::Trauma, &history, &FactorState::new()).unwrap();

        let doc = TextRenderer::new().render(&report);
        assert!(doc.contains("Trauma Support Report"));
        assert!(doc.contains("RAINN National Sexual Assault Hotline"));
        assert!(doc.contains("Professional trauma therapy is recommended"));
    }

    #[test]
    fn test_low_risk_has_no_clinical_tier_notes() {
        let mut history = ConversationHistory::new();
        history.push(ConversationTurn {
            message: "hello".to_string(),
            sentiment: SentimentLabel::Neutral,
            trauma_indicator: None,
        });
        let report =
            synthesize(EngineProfile::Support, &history, &FactorState::new()).unwrap();

        let doc = TextRenderer::new().render(&report);
        assert!(!doc.contains("Clinical Considerations"));
    }
}
