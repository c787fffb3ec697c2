//! Guest Feedback - Sentiment Classification and Aggregation
//!
//! A Rust library for collecting guest feedback comments, classifying each
//! as Favourable, Unfavourable, or Neutral against a business-defined
//! keyword corpus, and aggregating stored feedback into rating
//! distributions and month-bucketed sentiment trends.
//!
//! # Features
//!
//! - Deterministic keyword classification with ordered decision rules
//! - Probabilistic fallback through an external 3-label sentiment service
//! - Safe degradation when either upstream is unavailable
//! - Rating-distribution summaries and sentiment trend views
//! - SQLite-backed feedback store and keyword corpus

/// Aggregation of stored feedback into derived views
pub mod aggregation;
/// Keyword classification rules and the classifier
pub mod classifier;
/// Configuration management
pub mod config;
/// Database operations and connection pooling
pub mod db;
/// Error types
pub mod error;
/// Inference service client and fallback adapter
pub mod inference;
/// Keyword corpus loading and lookup
pub mod keywords;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Repository pattern for data access
pub mod repository;
/// Database schema definitions
pub mod schema;
/// Submission handling service
pub mod service;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use aggregation::AggregationEngine;
pub use classifier::SentimentClassifier;
pub use db::Database;
pub use error::{FeedbackError, Result};
pub use models::{ClassificationResult, FeedbackRecord, NewFeedback, Sentiment};
pub use service::FeedbackService;
