//! Data models for feedback handling and storage
//!
//! This module contains all data structures used throughout the application,
//! including submissions, classified feedback records, the keyword corpus,
//! and the derived aggregation views.

use std::fmt;

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Whether a keyword signals positive or negative sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Keyword signals positive sentiment
    Positive,
    /// Keyword signals negative sentiment
    Negative,
}

impl Polarity {
    /// The string form stored in the keyword corpus
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }

    /// Parse a stored polarity, defaulting to positive on unrecognized input.
    ///
    /// Mirrors the corpus administration rule: anything that is not exactly
    /// "negative" is treated as positive.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("negative") {
            Self::Negative
        } else {
            Self::Positive
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three-way classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    /// Positive feedback
    Favourable,
    /// Negative feedback
    Unfavourable,
    /// Mixed or indeterminate feedback
    Neutral,
}

impl Sentiment {
    /// The string form stored with each feedback record
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Favourable => "Favourable",
            Self::Unfavourable => "Unfavourable",
            Self::Neutral => "Neutral",
        }
    }

    /// Parse a stored sentiment label; `None` for unrecognized labels.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Favourable" => Some(Self::Favourable),
            "Unfavourable" => Some(Self::Unfavourable),
            "Neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the keyword corpus
///
/// Keywords are stored lower-cased and trimmed; the constructor normalizes.
/// The corpus is read-only to the classifier and mutated only through the
/// administration helpers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntry {
    /// The keyword text, lower-cased and trimmed
    pub keyword: String,
    /// Sentiment polarity of the keyword
    pub polarity: Polarity,
    /// Service quality benchmark the keyword is tagged to
    pub benchmark: Option<String>,
    /// Finer-grained category nested under the benchmark
    pub sub_benchmark: Option<String>,
}

impl KeywordEntry {
    /// Create a new entry, normalizing the keyword text
    #[must_use]
    pub fn new(keyword: &str, polarity: Polarity) -> Self {
        Self {
            keyword: keyword.trim().to_lowercase(),
            polarity,
            benchmark: None,
            sub_benchmark: None,
        }
    }

    /// Attach benchmark tags to the entry
    #[must_use]
    pub fn with_benchmarks(
        mut self,
        benchmark: Option<String>,
        sub_benchmark: Option<String>,
    ) -> Self {
        self.benchmark = benchmark;
        self.sub_benchmark = sub_benchmark;
        self
    }
}

/// Outcome of classifying one comment text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The assigned sentiment label
    pub sentiment: Sentiment,
    /// Confidence in the label, in [0, 1]
    pub confidence: f64,
    /// Human-readable explanation of how the label was chosen
    pub reason: String,
    /// Keywords that matched, positives listed before negatives
    pub matched_keywords: Vec<String>,
    /// Benchmark tags of the matched keywords, first-occurrence order
    pub benchmarks: Vec<String>,
    /// Sub-benchmark tags of the matched keywords, first-occurrence order
    pub sub_benchmarks: Vec<String>,
}

/// A feedback submission as received from the guest
///
/// `rating` is optional here so an absent field is representable; validation
/// requires it to be present and within 1-5 before classification starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    /// Name of the guest leaving feedback
    pub guest_name: String,
    /// Opaque reference to the outlet the feedback is about
    pub outlet_id: String,
    /// Star rating, 1-5
    pub rating: Option<i32>,
    /// Free-text comment
    pub comment_text: String,
    /// Guest contact phone number
    pub phone: String,
    /// Guest contact email address
    pub email: String,
    /// Guest postal address
    pub address: Option<String>,
}

/// A persisted feedback record
///
/// Created once at submission and immutable afterward; there is no
/// re-classification on edit. Rows written by earlier revisions of the
/// system may lack a rating, timestamp, or carry a sentiment label this
/// revision does not recognize, so those fields are optional on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Store-assigned primary key
    pub id: i64,
    /// Name of the guest leaving feedback
    pub guest_name: String,
    /// Opaque reference to the outlet the feedback is about
    pub outlet_id: String,
    /// Star rating, 1-5 when present and well-formed
    pub rating: Option<i32>,
    /// Free-text comment
    pub comment_text: String,
    /// Guest contact phone number
    pub phone: String,
    /// Guest contact email address
    pub email: String,
    /// Guest postal address
    pub address: Option<String>,
    /// Assigned sentiment label; `None` when the stored label is unrecognized
    pub sentiment: Option<Sentiment>,
    /// Confidence in the label, in [0, 1]
    pub sentiment_confidence: f64,
    /// Explanation recorded at classification time
    pub sentiment_reason: String,
    /// Keywords that matched at classification time
    pub matched_keywords: Vec<String>,
    /// Benchmark tags recorded at classification time
    pub benchmarks: Vec<String>,
    /// Sub-benchmark tags recorded at classification time
    pub sub_benchmarks: Vec<String>,
    /// Store-assigned submission timestamp
    pub created_at: Option<NaiveDateTime>,
}

/// One row of the keyword corpus as stored, including administration fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRecord {
    /// Store-assigned primary key
    pub id: i64,
    /// The keyword text, lower-cased and trimmed
    pub keyword: String,
    /// Sentiment polarity of the keyword
    pub polarity: Polarity,
    /// Service quality benchmark the keyword is tagged to
    pub benchmark: Option<String>,
    /// Finer-grained category nested under the benchmark
    pub sub_benchmark: Option<String>,
    /// Store-assigned creation timestamp
    pub created_at: Option<NaiveDateTime>,
}

/// Rating distribution over a set of feedback records
///
/// Derived per request, never persisted. Ratings outside 1-5 and records
/// without a rating are excluded from every bucket and from the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Number of records counted into a bucket
    pub total: u64,
    /// Count of 5-star ratings
    #[serde(rename = "Excellent")]
    pub excellent: u64,
    /// Count of 4-star ratings
    #[serde(rename = "Good")]
    pub good: u64,
    /// Count of 3-star ratings
    #[serde(rename = "Fair")]
    pub fair: u64,
    /// Count of 1- and 2-star ratings
    #[serde(rename = "Poor")]
    pub poor: u64,
    /// Bucket shares formatted to two decimals; "0" when total is 0
    pub percentages: RatingPercentages,
}

/// Bucket shares of a [`RatingSummary`], as preformatted strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingPercentages {
    /// Share of 5-star ratings
    #[serde(rename = "Excellent")]
    pub excellent: String,
    /// Share of 4-star ratings
    #[serde(rename = "Good")]
    pub good: String,
    /// Share of 3-star ratings
    #[serde(rename = "Fair")]
    pub fair: String,
    /// Share of 1- and 2-star ratings
    #[serde(rename = "Poor")]
    pub poor: String,
}

/// Sentiment counts within one month bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendCounts {
    /// Favourable records in the month
    #[serde(rename = "Favourable")]
    pub favourable: u64,
    /// Unfavourable records in the month
    #[serde(rename = "Unfavourable")]
    pub unfavourable: u64,
    /// Neutral records in the month
    #[serde(rename = "Neutral")]
    pub neutral: u64,
}

/// One month bucket of the sentiment trend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendBucket {
    /// Month label, e.g. "Jan 2024"
    pub month: String,
    /// Sentiment counts for the month
    pub counts: TrendCounts,
}

/// Month-bucketed sentiment trend
///
/// Derived per request, never persisted. Buckets keep first-occurrence
/// insertion order, not chronological order; callers needing chronological
/// order must sort the labels themselves. Serializes as a label-to-counts
/// mapping in bucket order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentTrend {
    /// Month buckets in first-occurrence order
    pub buckets: Vec<TrendBucket>,
}

impl SentimentTrend {
    /// Look up the counts for a month label
    #[must_use]
    pub fn get(&self, month: &str) -> Option<&TrendCounts> {
        self.buckets
            .iter()
            .find(|bucket| bucket.month == month)
            .map(|bucket| &bucket.counts)
    }

    /// Month labels in bucket order
    pub fn months(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|bucket| bucket.month.as_str())
    }

    /// Number of month buckets
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// True when no record contributed a bucket
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Counts for a month label, appending a fresh bucket on first sight
    pub(crate) fn counts_mut(&mut self, month: &str) -> &mut TrendCounts {
        if let Some(position) = self.buckets.iter().position(|bucket| bucket.month == month) {
            &mut self.buckets[position].counts
        } else {
            self.buckets.push(TrendBucket {
                month: month.to_string(),
                counts: TrendCounts::default(),
            });
            let last = self.buckets.len() - 1;
            &mut self.buckets[last].counts
        }
    }
}

impl Serialize for SentimentTrend {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(&bucket.month, &bucket.counts)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_entry_normalizes() {
        let entry = KeywordEntry::new("  SLOW Service ", Polarity::Negative);
        assert_eq!(entry.keyword, "slow service");
        assert_eq!(entry.polarity, Polarity::Negative);
        assert!(entry.benchmark.is_none());
    }

    #[test]
    fn test_sentiment_parse_round_trip() {
        for sentiment in [
            Sentiment::Favourable,
            Sentiment::Unfavourable,
            Sentiment::Neutral,
        ] {
            assert_eq!(Sentiment::parse(sentiment.as_str()), Some(sentiment));
        }
        assert_eq!(Sentiment::parse("Mixed"), None);
        assert_eq!(Sentiment::parse(""), None);
    }

    #[test]
    fn test_polarity_parse_lenient_defaults_to_positive() {
        assert_eq!(Polarity::parse_lenient("negative"), Polarity::Negative);
        assert_eq!(Polarity::parse_lenient("NEGATIVE"), Polarity::Negative);
        assert_eq!(Polarity::parse_lenient("positive"), Polarity::Positive);
        assert_eq!(Polarity::parse_lenient("sideways"), Polarity::Positive);
    }

    #[test]
    fn test_trend_serializes_as_ordered_map() {
        let mut trend = SentimentTrend::default();
        trend.counts_mut("Feb 2024").neutral += 1;
        trend.counts_mut("Jan 2024").favourable += 1;

        let json = serde_json::to_string(&trend).expect("trend serializes");
        let feb = json.find("Feb 2024").expect("Feb bucket present");
        let jan = json.find("Jan 2024").expect("Jan bucket present");
        assert!(feb < jan, "buckets keep insertion order: {json}");
    }
}
