//! Psychological safety score calculator.
//!
//! Scores a conversation against Carl Rogers' three core conditions:
//! self-congruence, unconditional positive regard, and empathic
//! understanding. Only the latest user response is analyzed in full;
//! earlier responses feed an engagement trend.

use super::analysis::{analyze_response, Expression, ResponseAnalysis, Sentiment};
use crate::domain::conversation::Message;
use crate::domain::foundation::UnitScore;
use crate::domain::thresholds::{safety, trend, weights, SafetyLevel};
use serde::Serialize;

/// Relative weight of each Rogers condition in the overall score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub self_congruence: f64,
    pub unconditional_positive_regard: f64,
    pub empathic_understanding: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            self_congruence: weights::SELF_CONGRUENCE,
            unconditional_positive_regard: weights::UNCONDITIONAL_POSITIVE_REGARD,
            empathic_understanding: weights::EMPATHIC_UNDERSTANDING,
        }
    }
}

/// Perceived authenticity of the counselor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelfCongruence {
    pub authenticity: UnitScore,
    pub transparency: UnitScore,
    pub limitations_acknowledged: bool,
}

/// Perceived acceptance of the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositiveRegard {
    pub acceptance: UnitScore,
    pub non_judgmental: bool,
    pub validation_present: bool,
}

/// Perceived understanding of the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmpathicUnderstanding {
    pub understanding: UnitScore,
    pub reflection: UnitScore,
    pub clarification_needed: bool,
}

/// Detailed sub-signals behind each component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RogersConditions {
    pub self_congruence: SelfCongruence,
    pub positive_regard: PositiveRegard,
    pub empathic_understanding: EmpathicUnderstanding,
}

impl RogersConditions {
    fn neutral() -> Self {
        Self {
            self_congruence: SelfCongruence {
                authenticity: UnitScore::NEUTRAL,
                transparency: UnitScore::NEUTRAL,
                limitations_acknowledged: true,
            },
            positive_regard: PositiveRegard {
                acceptance: UnitScore::NEUTRAL,
                non_judgmental: true,
                validation_present: true,
            },
            empathic_understanding: EmpathicUnderstanding {
                understanding: UnitScore::NEUTRAL,
                reflection: UnitScore::NEUTRAL,
                clarification_needed: false,
            },
        }
    }
}

/// The three component scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SafetyScoreComponents {
    pub self_congruence: UnitScore,
    pub unconditional_positive_regard: UnitScore,
    pub empathic_understanding: UnitScore,
}

impl SafetyScoreComponents {
    fn from_conditions(c: &RogersConditions) -> Self {
        let sc = &c.self_congruence;
        let pr = &c.positive_regard;
        let eu = &c.empathic_understanding;

        Self {
            self_congruence: UnitScore::new(
                sc.authenticity.weighted(0.4)
                    + sc.transparency.weighted(0.3)
                    + bonus(sc.limitations_acknowledged, 0.3),
            ),
            unconditional_positive_regard: UnitScore::new(
                pr.acceptance.weighted(0.5)
                    + bonus(pr.non_judgmental, 0.25)
                    + bonus(pr.validation_present, 0.25),
            ),
            empathic_understanding: UnitScore::new(
                eu.understanding.weighted(0.4)
                    + eu.reflection.weighted(0.4)
                    + bonus(!eu.clarification_needed, 0.2),
            ),
        }
    }
}

fn bonus(flag: bool, amount: f64) -> f64 {
    if flag {
        amount
    } else {
        0.0
    }
}

/// Psychological safety of a conversation at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyScore {
    pub overall: UnitScore,
    pub components: SafetyScoreComponents,
    pub conditions: RogersConditions,
    /// Engagement trend that adjusted `overall`.
    pub trend: UnitScore,
    pub level: SafetyLevel,
    pub recommendations: Vec<String>,
    pub recovery_needed: bool,
}

impl SafetyScore {
    /// Score used before the user has said anything.
    pub fn neutral() -> Self {
        Self {
            overall: UnitScore::NEUTRAL,
            components: SafetyScoreComponents {
                self_congruence: UnitScore::NEUTRAL,
                unconditional_positive_regard: UnitScore::NEUTRAL,
                empathic_understanding: UnitScore::NEUTRAL,
            },
            conditions: RogersConditions::neutral(),
            trend: UnitScore::NEUTRAL,
            level: SafetyLevel::from_score(UnitScore::NEUTRAL.value()),
            recommendations: vec![
                "Start with warm empathy".to_string(),
                "Use choice questions generously".to_string(),
                "State clearly that the conversation is private".to_string(),
            ],
            recovery_needed: false,
        }
    }
}

/// A safety score together with the analysis it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyAssessment {
    pub score: SafetyScore,
    /// Analysis of the latest user response, absent when there is none.
    pub analysis: Option<ResponseAnalysis>,
}

/// Computes safety scores from conversation history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyScoreCalculator {
    weights: ScoringWeights,
    recovery_threshold: f64,
}

impl Default for SafetyScoreCalculator {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            recovery_threshold: safety::LOW,
        }
    }
}

impl SafetyScoreCalculator {
    /// Creates a calculator with custom weights and recovery threshold.
    pub fn new(weights: ScoringWeights, recovery_threshold: f64) -> Self {
        Self {
            weights,
            recovery_threshold,
        }
    }

    /// Scores a conversation.
    ///
    /// `history` holds analyses of earlier user responses, oldest first.
    /// When absent or empty, the trend is derived from the earlier user
    /// messages in `messages`.
    pub fn calculate(&self, messages: &[Message], history: Option<&[ResponseAnalysis]>) -> SafetyScore {
        self.assess(messages, history).score
    }

    /// Scores a conversation and returns the latest response analysis too.
    pub fn assess(&self, messages: &[Message], history: Option<&[ResponseAnalysis]>) -> SafetyAssessment {
        let user_messages: Vec<&Message> = messages.iter().filter(|m| m.is_user()).collect();

        let Some((latest, earlier)) = user_messages.split_last() else {
            return SafetyAssessment {
                score: SafetyScore::neutral(),
                analysis: None,
            };
        };

        let analysis = analyze_response(latest.content());

        let prior: Vec<f64> = match history {
            Some(h) if !h.is_empty() => h.iter().map(|a| a.engagement.value()).collect(),
            _ => earlier
                .iter()
                .rev()
                .take(trend::WINDOW)
                .rev()
                .map(|m| analyze_response(m.content()).engagement.value())
                .collect(),
        };
        let trend = trend_score(&prior, analysis.engagement.value());

        let conditions = assess_conditions(&analysis, trend);
        let components = SafetyScoreComponents::from_conditions(&conditions);
        let overall = UnitScore::new(
            components.self_congruence.weighted(self.weights.self_congruence)
                + components
                    .unconditional_positive_regard
                    .weighted(self.weights.unconditional_positive_regard)
                + components
                    .empathic_understanding
                    .weighted(self.weights.empathic_understanding)
                + trend::WEIGHT * (trend.value() - 0.5),
        );
        let recommendations = recommendations(&conditions, overall.value(), &analysis);
        let recovery_needed = overall.value() < self.recovery_threshold;

        tracing::debug!(
            overall = overall.value(),
            trend = trend.value(),
            engagement = analysis.engagement.value(),
            recovery_needed,
            "Calculated safety score"
        );

        SafetyAssessment {
            score: SafetyScore {
                overall,
                components,
                conditions,
                trend,
                level: SafetyLevel::from_score(overall.value()),
                recommendations,
                recovery_needed,
            },
            analysis: Some(analysis),
        }
    }
}

/// Recency-weighted trend of engagement. `prior` is oldest first.
fn trend_score(prior: &[f64], current: f64) -> UnitScore {
    let start = prior.len().saturating_sub(trend::WINDOW);
    let recent = &prior[start..];
    if recent.is_empty() {
        return UnitScore::new(trend::FIRST_TURN);
    }

    let (weighted, total) = recent
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sum, total), (i, value)| {
            let weight = (i + 1) as f64;
            (sum + value * weight, total + weight)
        });
    let previous = weighted / total;

    UnitScore::new(0.5 + 0.5 * (current - previous))
}

fn assess_conditions(analysis: &ResponseAnalysis, trend: UnitScore) -> RogersConditions {
    let engagement = analysis.engagement.value();
    let positives = analysis.positive_markers.len();
    let negatives = analysis.negative_markers.len();

    RogersConditions {
        self_congruence: SelfCongruence {
            authenticity: UnitScore::new((engagement + 0.1).min(0.9)),
            transparency: UnitScore::new(if analysis.word_count > 15 { 0.8 } else { 0.6 }),
            limitations_acknowledged: true,
        },
        positive_regard: PositiveRegard {
            acceptance: acceptance_level(analysis),
            non_judgmental: negatives < 2,
            validation_present: positives > 0 || analysis.sentiment == Sentiment::Positive,
        },
        empathic_understanding: EmpathicUnderstanding {
            understanding: UnitScore::new((engagement + 0.15).min(0.95)),
            reflection: reflection_accuracy(analysis, trend),
            clarification_needed: analysis.word_count < 10
                || analysis.expression == Expression::Resistant,
        },
    }
}

fn acceptance_level(analysis: &ResponseAnalysis) -> UnitScore {
    let mut score = 0.5;

    if analysis.expression == Expression::Open {
        score += 0.3;
    }
    if !analysis.positive_markers.is_empty() {
        score += 0.2;
    }
    if analysis.sentiment == Sentiment::Positive {
        score += 0.2;
    }

    if analysis.expression == Expression::Resistant {
        score -= 0.4;
    }
    if analysis.sentiment == Sentiment::Negative {
        score -= 0.2;
    }
    if analysis.negative_markers.len() > 2 {
        score -= 0.2;
    }

    UnitScore::new(score)
}

fn reflection_accuracy(analysis: &ResponseAnalysis, trend: UnitScore) -> UnitScore {
    let mut score = 0.6;

    if analysis.word_count > 20 {
        score += 0.1;
    }
    if !analysis.topics.is_empty() {
        score += 0.1;
    }
    if analysis.sentiment != Sentiment::Negative {
        score += 0.1;
    }
    score += (trend.value() - 0.5) * 0.2;

    UnitScore::new(score.clamp(0.3, 0.95))
}

fn recommendations(conditions: &RogersConditions, overall: f64, analysis: &ResponseAnalysis) -> Vec<String> {
    let mut out = Vec::new();

    if conditions.self_congruence.authenticity.value() < 0.6 {
        out.push("Use warmer, more sincere phrasing");
    }
    if conditions.positive_regard.acceptance.value() < 0.6 {
        out.push("Avoid judgmental wording and show acceptance");
    }
    if !conditions.positive_regard.validation_present {
        out.push("Acknowledge the user's feelings more actively");
    }
    if conditions.empathic_understanding.understanding.value() < 0.7 {
        out.push("Reflect feelings more deeply and check understanding");
    }
    if conditions.empathic_understanding.clarification_needed {
        out.push("Ask clarifying questions gently");
    }
    if overall < 0.5 {
        out.push("Prefer choice questions to reduce the pressure to answer");
        out.push("Add warm, empathetic messages");
    }
    if analysis.expression == Expression::Resistant {
        out.push("Slow down and reaffirm privacy");
    }

    out.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Role;
    use crate::domain::foundation::Timestamp;
    use proptest::prelude::*;

    const OPEN_REPLY: &str = "Honestly, thank you. I feel that talking about my work stress \
        actually helps, and I am glad I can share this with you today because it makes sense now.";

    fn conversation(turns: &[(Role, &str)]) -> Vec<Message> {
        turns
            .iter()
            .enumerate()
            .map(|(i, (role, text))| {
                Message::at(*role, *text, Timestamp::from_unix_secs(1_700_000_000 + i as i64)).unwrap()
            })
            .collect()
    }

    fn calc() -> SafetyScoreCalculator {
        SafetyScoreCalculator::default()
    }

    mod neutral_start {
        use super::*;

        #[test]
        fn empty_conversation_is_neutral() {
            let score = calc().calculate(&[], None);
            assert_eq!(score.overall, UnitScore::NEUTRAL);
            assert_eq!(score.components.self_congruence, UnitScore::NEUTRAL);
            assert_eq!(score.components.unconditional_positive_regard, UnitScore::NEUTRAL);
            assert_eq!(score.components.empathic_understanding, UnitScore::NEUTRAL);
            assert_eq!(score.level, SafetyLevel::Medium);
            assert!(!score.recovery_needed);
            assert!(!score.recommendations.is_empty());
        }

        #[test]
        fn assistant_only_conversation_is_neutral() {
            let messages = conversation(&[(Role::Assistant, "Welcome. How are you today?")]);
            let assessment = calc().assess(&messages, None);
            assert_eq!(assessment.score, SafetyScore::neutral());
            assert!(assessment.analysis.is_none());
        }
    }

    mod scoring {
        use super::*;

        #[test]
        fn resistant_reply_needs_recovery() {
            let messages = conversation(&[
                (Role::Assistant, "What brings you here?"),
                (Role::User, "whatever"),
            ]);
            let score = calc().calculate(&messages, None);

            assert!((score.overall.value() - 0.3573).abs() < 1e-9);
            assert!(score.recovery_needed);
            assert_eq!(score.level, SafetyLevel::Low);
            assert!(score
                .recommendations
                .contains(&"Slow down and reaffirm privacy".to_string()));
        }

        #[test]
        fn open_reply_scores_excellent() {
            let messages = conversation(&[
                (Role::Assistant, "What brings you here?"),
                (Role::User, OPEN_REPLY),
            ]);
            let score = calc().calculate(&messages, None);

            assert!((score.components.self_congruence.value() - 0.9).abs() < 1e-9);
            assert!((score.components.unconditional_positive_regard.value() - 1.0).abs() < 1e-9);
            assert!((score.overall.value() - 0.9818).abs() < 1e-9);
            assert_eq!(score.level, SafetyLevel::Excellent);
            assert!(!score.recovery_needed);
        }

        #[test]
        fn first_turn_uses_fixed_trend() {
            let messages = conversation(&[(Role::User, "It was fine")]);
            let score = calc().calculate(&messages, None);
            assert!((score.trend.value() - trend::FIRST_TURN).abs() < 1e-9);
        }

        #[test]
        fn recovery_tracks_threshold() {
            let lenient = SafetyScoreCalculator::new(ScoringWeights::default(), 0.2);
            let messages = conversation(&[(Role::User, "whatever")]);
            assert!(!lenient.calculate(&messages, None).recovery_needed);
        }
    }

    mod trend_adjustment {
        use super::*;

        #[test]
        fn improving_engagement_raises_score() {
            let first_turn = calc().calculate(&conversation(&[(Role::User, OPEN_REPLY)]), None);
            let improving = calc().calculate(
                &conversation(&[
                    (Role::User, "whatever"),
                    (Role::Assistant, "That's okay. Shall we pick something easy?"),
                    (Role::User, OPEN_REPLY),
                ]),
                None,
            );

            assert!(improving.trend > first_turn.trend);
            assert!(improving.overall > first_turn.overall);
        }

        #[test]
        fn caller_history_is_recency_weighted_over_last_three() {
            let history: Vec<ResponseAnalysis> = [0.2, 0.4, 0.6, 0.8]
                .iter()
                .map(|e| {
                    let mut a = analyze_response("placeholder");
                    a.engagement = UnitScore::new(*e);
                    a
                })
                .collect();
            let messages = conversation(&[(Role::User, "whatever")]);

            let score = calc().calculate(&messages, Some(history.as_slice()));

            // previous = (0.4 + 2 * 0.6 + 3 * 0.8) / 6; current engagement = 0.
            let expected = 0.5 - 0.5 * (4.0 / 6.0);
            assert!((score.trend.value() - expected).abs() < 1e-9);
        }

        #[test]
        fn caller_history_takes_precedence_over_messages() {
            let mut strong = analyze_response("placeholder");
            strong.engagement = UnitScore::ONE;
            let messages = conversation(&[
                (Role::User, "whatever"),
                (Role::User, "whatever"),
            ]);

            let derived = calc().calculate(&messages, None);
            let supplied = calc().calculate(&messages, Some(std::slice::from_ref(&strong)));

            assert!(supplied.trend < derived.trend);
        }

        #[test]
        fn weighted_mean_handles_short_windows() {
            // One prior turn: previous == that engagement.
            let trend = trend_score(&[0.4], 0.6);
            assert!((trend.value() - 0.6).abs() < 1e-9);
        }
    }

    proptest! {
        #[test]
        fn overall_stays_in_unit_interval(text in "\\PC{0,200}") {
            let messages = match Message::user(text) {
                Ok(m) => vec![m],
                Err(_) => vec![],
            };
            let score = SafetyScoreCalculator::default().calculate(&messages, None);
            prop_assert!((0.0..=1.0).contains(&score.overall.value()));
            prop_assert_eq!(score.recovery_needed, score.overall.value() < safety::LOW);
        }

        #[test]
        fn components_stay_in_unit_interval(text in "[a-zぁ-ん ]{1,120}") {
            let messages = match Message::user(text) {
                Ok(m) => vec![m],
                Err(_) => vec![],
            };
            let score = SafetyScoreCalculator::default().calculate(&messages, None);
            for c in [
                score.components.self_congruence,
                score.components.unconditional_positive_regard,
                score.components.empathic_understanding,
            ] {
                prop_assert!((0.0..=1.0).contains(&c.value()));
            }
        }
    }
}
