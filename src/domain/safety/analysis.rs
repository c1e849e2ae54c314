//! Signal extraction from a single user response.
//!
//! Markers and patterns cover Japanese and English. Matching is done on a
//! lowercased copy of the text; Japanese markers match as substrings and
//! English markers respect word boundaries.

use crate::domain::foundation::UnitScore;
use crate::domain::thresholds::engagement;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How openly the user is expressing themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    Open,
    Guarded,
    Resistant,
}

/// Overall tone of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Life areas a response touches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Work,
    Family,
    Relationships,
    Anxiety,
    Future,
    Health,
    Money,
    Study,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Family => "family",
            Self::Relationships => "relationships",
            Self::Anxiety => "anxiety",
            Self::Future => "future",
            Self::Health => "health",
            Self::Money => "money",
            Self::Study => "study",
        }
    }
}

/// Safety-relevant signals read from one user response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseAnalysis {
    pub word_count: usize,
    /// Distinct positive markers found, in table order.
    pub positive_markers: Vec<String>,
    /// Distinct negative markers found, in table order.
    pub negative_markers: Vec<String>,
    pub resistance: bool,
    pub engagement_pattern: bool,
    pub expression: Expression,
    pub sentiment: Sentiment,
    pub engagement: UnitScore,
    pub topics: Vec<Topic>,
}

struct Marker {
    label: &'static str,
    pattern: Regex,
}

fn markers(japanese: &[&'static str], english: &[&'static str]) -> Vec<Marker> {
    let japanese = japanese.iter().map(|&label| Marker {
        label,
        pattern: Regex::new(&regex::escape(label)).expect("valid literal marker"),
    });
    let english = english.iter().map(|&label| Marker {
        label,
        pattern: Regex::new(&format!(r"\b{}\b", regex::escape(label)))
            .expect("valid word marker"),
    });
    japanese.chain(english).collect()
}

static POSITIVE_MARKERS: Lazy<Vec<Marker>> = Lazy::new(|| {
    markers(
        &[
            "感謝", "ありがとう", "うれしい", "良い", "安心", "理解", "共感", "そうです", "はい",
            "助かる", "納得", "安らぐ", "落ち着く",
        ],
        &[
            "thanks", "thank you", "glad", "happy", "relieved", "helpful", "makes sense",
            "agree", "yes", "good", "understood", "calm",
        ],
    )
});

static NEGATIVE_MARKERS: Lazy<Vec<Marker>> = Lazy::new(|| {
    markers(
        &[
            "いやだ", "つらい", "無理", "嫌", "不安", "わからない", "違う", "ちがう", "怖い",
            "困る", "混乱", "ストレス", "プレッシャー",
        ],
        &[
            "hate", "painful", "can't", "impossible", "anxious", "worried", "don't know",
            "scared", "afraid", "confused", "stressed", "pressure", "wrong",
        ],
    )
});

static RESISTANCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"そんなこと|そういうこと.*ない",
        r"答えたくない|言いたくない",
        r"関係ない|どうでもいい",
        r"やめて|もういい",
        r"\b(don't|do not) want to (answer|talk|say)\b",
        r"\b(doesn't|does not) matter\b|\bwhatever\b",
        r"\bstop asking\b|\bnever ?mind\b|\bleave me alone\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid resistance pattern"))
    .collect()
});

static ENGAGEMENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"実は|本当は|正直",
        r"思うのですが|感じるのですが",
        r"具体的には|例えば",
        r"もう少し|詳しく",
        r"\b(actually|honestly|to be honest)\b",
        r"\bi (think|feel) that\b",
        r"\b(for example|for instance|specifically)\b",
        r"\b(in more detail|a bit more|tell you more)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid engagement pattern"))
    .collect()
});

static TOPIC_PATTERNS: Lazy<Vec<(Topic, Regex)>> = Lazy::new(|| {
    [
        (Topic::Work, r"仕事|職場|会社|働く|\b(work|job|boss|office|career)\b"),
        (Topic::Family, r"家族|親|子供|夫|妻|\b(family|parents?|mother|father|child(ren)?|husband|wife)\b"),
        (Topic::Relationships, r"恋愛|パートナー|恋人|結婚|\b(partner|boyfriend|girlfriend|dating|marriage|relationship)\b"),
        (Topic::Anxiety, r"不安|心配|悩み|ストレス|\b(anxious|anxiety|worr(y|ied)|stress(ed)?)\b"),
        (Topic::Future, r"将来|未来|目標|夢|\b(future|goals?|dreams?)\b"),
        (Topic::Health, r"健康|体調|病気|\b(health|sick|illness|sleep)\b"),
        (Topic::Money, r"お金|経済|金銭|\b(money|debt|salary|finances?)\b"),
        (Topic::Study, r"学校|勉強|試験|\b(school|study|studying|exams?)\b"),
    ]
    .into_iter()
    .map(|(topic, p)| (topic, Regex::new(p).expect("valid topic pattern")))
    .collect()
});

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'   // hiragana, katakana
        | '\u{3400}'..='\u{4DBF}' // CJK extension A
        | '\u{4E00}'..='\u{9FFF}' // CJK unified ideographs
        | '\u{FF66}'..='\u{FF9F}' // halfwidth katakana
    )
}

/// Counts words. Two CJK characters count as one word, rounded up.
pub fn word_count(text: &str) -> usize {
    let cjk = text.chars().filter(|c| is_cjk(*c)).count();
    let spaced: String = text
        .chars()
        .map(|c| if is_cjk(c) { ' ' } else { c })
        .collect();
    let latin = spaced
        .split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count();
    latin + cjk.div_ceil(2)
}

fn found(markers: &[Marker], text: &str) -> Vec<String> {
    markers
        .iter()
        .filter(|m| m.pattern.is_match(text))
        .map(|m| m.label.to_string())
        .collect()
}

fn engagement_level(words: usize, positives: usize, pattern: bool, resistance: bool) -> UnitScore {
    let mut score = (words as f64 / engagement::WORD_COUNT_DIVISOR).min(engagement::WORD_COUNT_WEIGHT);
    score += (positives as f64 * engagement::POSITIVE_MARKER_STEP)
        .min(engagement::POSITIVE_LANGUAGE_WEIGHT);
    if pattern {
        score += engagement::ENGAGEMENT_PATTERN_BONUS;
    }
    if resistance {
        score += engagement::RESISTANCE_PENALTY;
    }
    if words > engagement::DETAILED_RESPONSE_THRESHOLD {
        score += engagement::DETAILED_RESPONSE_BONUS;
    }
    UnitScore::new(score)
}

fn expression_of(words: usize, pos: usize, neg: usize, resistance: bool, pattern: bool) -> Expression {
    if resistance || (neg > pos && words < 10) {
        Expression::Resistant
    } else if pattern || (words > 20 && pos > 0) {
        Expression::Open
    } else {
        Expression::Guarded
    }
}

fn sentiment_of(pos: usize, neg: usize, resistance: bool) -> Sentiment {
    if resistance || neg > pos + 1 {
        Sentiment::Negative
    } else if pos > neg {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    }
}

/// Reads the safety signals out of one user response.
pub fn analyze_response(text: &str) -> ResponseAnalysis {
    let normalized = text.trim().to_lowercase();
    let words = word_count(&normalized);

    let positive_markers = found(&POSITIVE_MARKERS, &normalized);
    let negative_markers = found(&NEGATIVE_MARKERS, &normalized);
    let resistance = RESISTANCE_PATTERNS.iter().any(|p| p.is_match(&normalized));
    let engagement_pattern = ENGAGEMENT_PATTERNS.iter().any(|p| p.is_match(&normalized));
    let topics = TOPIC_PATTERNS
        .iter()
        .filter(|(_, p)| p.is_match(&normalized))
        .map(|(topic, _)| *topic)
        .collect();

    let pos = positive_markers.len();
    let neg = negative_markers.len();

    ResponseAnalysis {
        word_count: words,
        expression: expression_of(words, pos, neg, resistance, engagement_pattern),
        sentiment: sentiment_of(pos, neg, resistance),
        engagement: engagement_level(words, pos, engagement_pattern, resistance),
        positive_markers,
        negative_markers,
        resistance,
        engagement_pattern,
        topics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod counting {
        use super::*;

        #[test]
        fn counts_whitespace_separated_words() {
            assert_eq!(word_count("I have been feeling tired lately"), 6);
        }

        #[test]
        fn counts_two_cjk_characters_as_one_word() {
            assert_eq!(word_count("仕事がつらい"), 3);
            assert_eq!(word_count("不安"), 1);
            assert_eq!(word_count("あ"), 1);
        }

        #[test]
        fn mixed_text_adds_both_counts() {
            assert_eq!(word_count("work 仕事"), 2);
        }

        #[test]
        fn empty_and_punctuation_only_count_zero() {
            assert_eq!(word_count(""), 0);
            assert_eq!(word_count("... !!"), 0);
        }
    }

    mod markers {
        use super::*;

        #[test]
        fn finds_japanese_markers_as_substrings() {
            let a = analyze_response("ありがとう、安心しました");
            assert_eq!(a.positive_markers, vec!["ありがとう", "安心"]);
        }

        #[test]
        fn english_markers_respect_word_boundaries() {
            let a = analyze_response("I said goodbye yesterday");
            assert!(a.positive_markers.is_empty());

            let a = analyze_response("Yes, that was good");
            assert_eq!(a.positive_markers, vec!["yes", "good"]);
        }

        #[test]
        fn detects_resistance() {
            assert!(analyze_response("答えたくないです").resistance);
            assert!(analyze_response("I don't want to talk about it").resistance);
            assert!(!analyze_response("I want to talk about it").resistance);
        }

        #[test]
        fn detects_engagement_patterns() {
            assert!(analyze_response("実は最近眠れなくて").engagement_pattern);
            assert!(analyze_response("Honestly it has been rough").engagement_pattern);
        }

        #[test]
        fn extracts_topics() {
            let a = analyze_response("My boss keeps piling on work and my family worries");
            assert_eq!(a.topics, vec![Topic::Work, Topic::Family]);
        }
    }

    mod classification {
        use super::*;

        #[test]
        fn resistance_is_resistant_and_negative() {
            let a = analyze_response("whatever");
            assert_eq!(a.expression, Expression::Resistant);
            assert_eq!(a.sentiment, Sentiment::Negative);
        }

        #[test]
        fn short_negative_reply_is_resistant() {
            let a = analyze_response("I'm scared");
            assert_eq!(a.expression, Expression::Resistant);
            // One negative, no positives: not enough for a negative sentiment.
            assert_eq!(a.sentiment, Sentiment::Neutral);
        }

        #[test]
        fn engagement_pattern_is_open() {
            let a = analyze_response("Honestly I have been thinking about it");
            assert_eq!(a.expression, Expression::Open);
        }

        #[test]
        fn plain_short_reply_is_guarded() {
            let a = analyze_response("It was fine");
            assert_eq!(a.expression, Expression::Guarded);
            assert_eq!(a.sentiment, Sentiment::Neutral);
        }

        #[test]
        fn more_positives_is_positive() {
            let a = analyze_response("Thanks, that makes sense");
            assert_eq!(a.sentiment, Sentiment::Positive);
        }

        #[test]
        fn two_more_negatives_than_positives_is_negative() {
            let a = analyze_response("I'm anxious and scared");
            assert_eq!(a.sentiment, Sentiment::Negative);
        }
    }

    mod engagement_score {
        use super::*;

        #[test]
        fn empty_text_has_zero_engagement() {
            assert_eq!(analyze_response("").engagement, UnitScore::ZERO);
        }

        #[test]
        fn word_count_contribution_is_capped() {
            let long = "word ".repeat(100);
            let a = analyze_response(&long);
            // 0.4 cap + 0.1 detailed bonus.
            assert!((a.engagement.value() - 0.5).abs() < 1e-9);
        }

        #[test]
        fn resistance_penalty_never_goes_below_zero() {
            let a = analyze_response("whatever");
            assert_eq!(a.engagement, UnitScore::ZERO);
        }

        #[test]
        fn pattern_and_positive_markers_add_up() {
            // 5 words -> 0.1, "thanks" -> 0.1, "honestly" -> 0.2
            let a = analyze_response("Honestly thanks for asking me");
            assert!((a.engagement.value() - 0.4).abs() < 1e-9);
        }
    }
}
