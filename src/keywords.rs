//! Keyword corpus loading and lookup.
//!
//! The corpus is small enough to hold in memory, so every classification
//! loads a fresh snapshot; taxonomy edits take effect on the very next
//! submission.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::{KeywordEntry, Polarity};

/// Read access to the externally administered keyword corpus.
///
/// Implementations return the full corpus in one call; there is no
/// pagination.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeywordSource: Send + Sync {
    /// Load all keyword entries.
    async fn load_keywords(&self) -> anyhow::Result<Vec<KeywordEntry>>;
}

/// Keywords matched against one comment text, split by polarity.
#[derive(Debug, Clone, Default)]
pub struct KeywordMatches {
    /// Matched keywords with positive polarity
    pub positive: Vec<String>,
    /// Matched keywords with negative polarity
    pub negative: Vec<String>,
    /// Benchmark tags of all matched keywords, first-occurrence order
    pub benchmarks: Vec<String>,
    /// Sub-benchmark tags of all matched keywords, first-occurrence order
    pub sub_benchmarks: Vec<String>,
}

impl KeywordMatches {
    /// True when no keyword matched at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }

    /// All matched keywords, positives before negatives.
    #[must_use]
    pub fn all_keywords(&self) -> Vec<String> {
        self.positive
            .iter()
            .chain(self.negative.iter())
            .cloned()
            .collect()
    }
}

/// An in-memory snapshot of the keyword corpus.
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    entries: Vec<KeywordEntry>,
}

impl KeywordIndex {
    /// Load a fresh snapshot from the source.
    ///
    /// An unreachable source yields an empty index rather than an error;
    /// availability wins over completeness, and classification then rides
    /// the inference fallback path.
    pub async fn load(source: &dyn KeywordSource) -> Self {
        match source.load_keywords().await {
            Ok(entries) => {
                debug!(keyword_count = entries.len(), "loaded keyword corpus");
                Self { entries }
            }
            Err(error) => {
                warn!(error = %error, "keyword source unreachable, continuing with empty corpus");
                Self::default()
            }
        }
    }

    /// Build an index from already-loaded entries.
    #[must_use]
    pub fn from_entries(entries: Vec<KeywordEntry>) -> Self {
        Self { entries }
    }

    /// Number of entries in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the snapshot holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match the corpus against a comment text.
    ///
    /// Matching is case-insensitive substring containment, no tokenization
    /// or stemming. Benchmark tags are unioned across matches, keeping
    /// first-occurrence order.
    #[must_use]
    pub fn lookup(&self, text: &str) -> KeywordMatches {
        let text = text.to_lowercase();
        let mut matches = KeywordMatches::default();

        for entry in &self.entries {
            // An empty keyword is contained in every text; skip it.
            if entry.keyword.is_empty() || !text.contains(&entry.keyword) {
                continue;
            }

            match entry.polarity {
                Polarity::Positive => matches.positive.push(entry.keyword.clone()),
                Polarity::Negative => matches.negative.push(entry.keyword.clone()),
            }

            if let Some(benchmark) = &entry.benchmark {
                push_unique(&mut matches.benchmarks, benchmark);
            }
            if let Some(sub_benchmark) = &entry.sub_benchmark {
                push_unique(&mut matches.sub_benchmarks, sub_benchmark);
            }
        }

        matches
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}
