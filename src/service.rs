use std::sync::Arc;

use tracing::{info, warn};

use crate::classifier::SentimentClassifier;
use crate::error::{FeedbackError, Result};
use crate::inference::InferenceClient;
use crate::keywords::KeywordSource;
use crate::logging::OperationTimer;
use crate::metrics::FeedbackMetrics;
use crate::models::{FeedbackRecord, NewFeedback};
use crate::repository::FeedbackStore;
use crate::validation::InputValidator;

/// Builds feedback records: validates a submission, classifies the comment,
/// and requests a single insert from the store.
pub struct FeedbackService {
    classifier: SentimentClassifier,
    store: Arc<dyn FeedbackStore>,
    metrics: FeedbackMetrics,
}

impl FeedbackService {
    /// Build a service over its three collaborators.
    #[must_use]
    pub fn new(
        keywords: Arc<dyn KeywordSource>,
        inference: Arc<dyn InferenceClient>,
        store: Arc<dyn FeedbackStore>,
    ) -> Self {
        Self {
            classifier: SentimentClassifier::new(keywords, inference),
            store,
            metrics: FeedbackMetrics::default(),
        }
    }

    /// Submit one piece of feedback.
    ///
    /// Validation runs first; an incomplete submission is rejected before the
    /// keyword source or the inference service is touched. Once validation
    /// has passed the pipeline cannot fail short of a persistence failure.
    pub async fn submit(&self, submission: NewFeedback) -> Result<FeedbackRecord> {
        let timer = OperationTimer::new("submit_feedback");

        if let Err(error) = InputValidator::validate_submission(&submission) {
            self.metrics.record_validation_failure();
            warn!(error = %error, "rejected feedback submission");
            return Err(error);
        }

        let classification = self.classifier.classify(&submission.comment_text).await;
        let keyword_path = !classification.matched_keywords.is_empty();
        self.metrics
            .record_classification(classification.sentiment.as_str(), keyword_path);
        self.metrics.record_confidence(classification.confidence);
        info!(
            sentiment = %classification.sentiment,
            confidence = classification.confidence,
            keyword_path,
            "feedback classified"
        );

        let insert_started = std::time::Instant::now();
        let record = self
            .store
            .insert_feedback(submission, classification)
            .await
            .map_err(|e| {
                self.metrics.record_persistence_failure();
                FeedbackError::Persistence(e.to_string())
            })?;
        self.metrics
            .record_store_operation("insert", insert_started.elapsed());

        self.metrics.record_submission();
        timer.finish();
        Ok(record)
    }

    /// Delete a stored record on explicit external request.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        self.store
            .delete_feedback(id)
            .await
            .map_err(|e| FeedbackError::Persistence(e.to_string()))
    }

    /// List stored records newest first, optionally for one outlet.
    pub async fn recent(
        &self,
        outlet_id: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<FeedbackRecord>> {
        self.store
            .fetch_recent(outlet_id, limit)
            .await
            .map_err(|e| FeedbackError::Persistence(e.to_string()))
    }
}
