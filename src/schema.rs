//! Database schema definitions
//!
//! This module provides constants for table and column names used with
//! rusqlite, so queries are assembled from one authoritative set of names.

/// Feedback comments table schema
pub mod comments {
    /// Table name
    pub const TABLE: &str = "comments";
    /// Primary key column
    pub const ID: &str = "id";
    /// Guest name column
    pub const GUEST_NAME: &str = "guest_name";
    /// Opaque outlet reference column
    pub const OUTLET_ID: &str = "outlet_id";
    /// Star rating column
    pub const RATING: &str = "rating";
    /// Comment text column
    pub const COMMENT_TEXT: &str = "comment_text";
    /// Guest phone number column
    pub const PHONE: &str = "phone";
    /// Guest email address column
    pub const EMAIL: &str = "email";
    /// Guest postal address column
    pub const ADDRESS: &str = "address";
    /// Sentiment label column
    pub const SENTIMENT: &str = "sentiment";
    /// Classification confidence column
    pub const SENTIMENT_CONFIDENCE: &str = "sentiment_confidence";
    /// Classification reason column
    pub const SENTIMENT_REASON: &str = "sentiment_reason";
    /// Matched keywords JSON column
    pub const MATCHED_KEYWORDS: &str = "matched_keywords";
    /// Benchmark tags JSON column
    pub const BENCHMARKS: &str = "benchmarks";
    /// Sub-benchmark tags JSON column
    pub const SUB_BENCHMARKS: &str = "sub_benchmarks";
    /// Submission timestamp column
    pub const CREATED_AT: &str = "created_at";
}

/// Keyword corpus table schema
pub mod keywords {
    /// Table name
    pub const TABLE: &str = "keywords";
    /// Primary key column
    pub const ID: &str = "id";
    /// Keyword text column
    pub const KEYWORD: &str = "keyword";
    /// Polarity column
    pub const POLARITY: &str = "polarity";
    /// Benchmark tag column
    pub const BENCHMARK_NAME: &str = "benchmark_name";
    /// Sub-benchmark tag column
    pub const SUB_BENCHMARK_NAME: &str = "sub_benchmark_name";
    /// Creation timestamp column
    pub const CREATED_AT: &str = "created_at";
}
