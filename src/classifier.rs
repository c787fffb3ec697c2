//! Deterministic keyword classification with an inference fallback.
//!
//! The keyword decision logic is an ordered list of rules; the first rule
//! whose predicate holds decides the outcome. Only when no keyword matched
//! at all does classification fall through to the external inference
//! service.

use std::sync::Arc;

use tracing::debug;

use crate::inference::{AiFallbackAdapter, InferenceClient};
use crate::keywords::{KeywordIndex, KeywordMatches, KeywordSource};
use crate::models::{ClassificationResult, Sentiment};

/// Confidence assigned when matches carry a single polarity.
///
/// Fixed by design, independent of match count.
pub const KEYWORD_CONFIDENCE: f64 = 0.95;
/// Confidence assigned when positive and negative keywords both matched.
pub const MIXED_CONFIDENCE: f64 = 0.65;

/// One ordered keyword decision rule.
pub struct KeywordRule {
    /// Rule name, for logs and tests
    pub name: &'static str,
    /// Whether the rule decides this set of matches
    pub applies: fn(&KeywordMatches) -> bool,
    /// The classification the rule produces
    pub outcome: fn(&KeywordMatches) -> ClassificationResult,
}

/// The keyword rule set, evaluated in order; first applicable rule wins.
/// A match set no rule claims falls through to the inference service.
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        name: "mixed-polarity",
        applies: has_both_polarities,
        outcome: mixed_outcome,
    },
    KeywordRule {
        name: "positive-only",
        applies: has_only_positive,
        outcome: favourable_outcome,
    },
    KeywordRule {
        name: "negative-only",
        applies: has_only_negative,
        outcome: unfavourable_outcome,
    },
];

fn has_both_polarities(matches: &KeywordMatches) -> bool {
    !matches.positive.is_empty() && !matches.negative.is_empty()
}

fn has_only_positive(matches: &KeywordMatches) -> bool {
    !matches.positive.is_empty() && matches.negative.is_empty()
}

fn has_only_negative(matches: &KeywordMatches) -> bool {
    matches.positive.is_empty() && !matches.negative.is_empty()
}

fn mixed_outcome(matches: &KeywordMatches) -> ClassificationResult {
    keyword_result(
        Sentiment::Neutral,
        MIXED_CONFIDENCE,
        format!(
            "Both positive and negative keywords found in database: {}",
            matches.all_keywords().join(", ")
        ),
        matches,
    )
}

fn favourable_outcome(matches: &KeywordMatches) -> ClassificationResult {
    keyword_result(
        Sentiment::Favourable,
        KEYWORD_CONFIDENCE,
        format!(
            "Positive keywords found in database: {}",
            matches.positive.join(", ")
        ),
        matches,
    )
}

fn unfavourable_outcome(matches: &KeywordMatches) -> ClassificationResult {
    keyword_result(
        Sentiment::Unfavourable,
        KEYWORD_CONFIDENCE,
        format!(
            "Negative keywords found in database: {}",
            matches.negative.join(", ")
        ),
        matches,
    )
}

fn keyword_result(
    sentiment: Sentiment,
    confidence: f64,
    reason: String,
    matches: &KeywordMatches,
) -> ClassificationResult {
    ClassificationResult {
        sentiment,
        confidence,
        reason,
        matched_keywords: matches.all_keywords(),
        benchmarks: matches.benchmarks.clone(),
        sub_benchmarks: matches.sub_benchmarks.clone(),
    }
}

/// Classifies comment texts against the keyword corpus, delegating to the
/// inference service when nothing matches.
pub struct SentimentClassifier {
    keywords: Arc<dyn KeywordSource>,
    fallback: AiFallbackAdapter,
}

impl SentimentClassifier {
    /// Build a classifier over a keyword source and an inference client.
    #[must_use]
    pub fn new(keywords: Arc<dyn KeywordSource>, inference: Arc<dyn InferenceClient>) -> Self {
        Self {
            keywords,
            fallback: AiFallbackAdapter::new(inference),
        }
    }

    /// Classify one comment text against a fresh corpus snapshot.
    ///
    /// Total: every non-empty text resolves to exactly one sentiment.
    pub async fn classify(&self, comment_text: &str) -> ClassificationResult {
        let index = KeywordIndex::load(self.keywords.as_ref()).await;
        self.classify_with_index(&index, comment_text).await
    }

    /// Classify against an already-loaded corpus snapshot.
    pub async fn classify_with_index(
        &self,
        index: &KeywordIndex,
        comment_text: &str,
    ) -> ClassificationResult {
        let matches = index.lookup(comment_text);

        for rule in KEYWORD_RULES {
            if (rule.applies)(&matches) {
                debug!(rule = rule.name, "keyword rule decided classification");
                return (rule.outcome)(&matches);
            }
        }

        self.fallback.classify(comment_text).await
    }
}
