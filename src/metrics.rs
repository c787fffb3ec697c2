use std::time::Duration;

use metrics::{counter, histogram};

/// Metric names used across the engine.
///
/// The macros are no-ops until the embedding application installs a
/// recorder, so the library records unconditionally.
pub struct FeedbackMetrics {
    /// Classifications performed, labeled by sentiment and path
    pub classifications_total: &'static str,
    /// Classifications that fell through to the inference service
    pub inference_fallbacks_total: &'static str,
    /// Confidence of each classification
    pub classification_confidence: &'static str,

    /// Successfully persisted submissions
    pub submissions_total: &'static str,
    /// Submissions rejected before classification
    pub validation_failures_total: &'static str,
    /// Classified submissions the store failed to persist
    pub persistence_failures_total: &'static str,

    /// Store operation durations
    pub store_operation_duration: &'static str,
}

impl Default for FeedbackMetrics {
    fn default() -> Self {
        Self {
            classifications_total: "guest_feedback_classifications_total",
            inference_fallbacks_total: "guest_feedback_inference_fallbacks_total",
            classification_confidence: "guest_feedback_classification_confidence",

            submissions_total: "guest_feedback_submissions_total",
            validation_failures_total: "guest_feedback_validation_failures_total",
            persistence_failures_total: "guest_feedback_persistence_failures_total",

            store_operation_duration: "guest_feedback_store_operation_duration_seconds",
        }
    }
}

impl FeedbackMetrics {
    /// Record one classification outcome
    pub fn record_classification(&self, sentiment: &str, keyword_path: bool) {
        let source = if keyword_path { "keywords" } else { "inference" };
        counter!(
            self.classifications_total,
            "sentiment" => sentiment.to_string(),
            "source" => source
        )
        .increment(1);

        if !keyword_path {
            counter!(self.inference_fallbacks_total).increment(1);
        }
    }

    /// Record the confidence assigned to a classification
    pub fn record_confidence(&self, confidence: f64) {
        histogram!(self.classification_confidence).record(confidence);
    }

    /// Record one persisted submission
    pub fn record_submission(&self) {
        counter!(self.submissions_total).increment(1);
    }

    /// Record a submission rejected by validation
    pub fn record_validation_failure(&self) {
        counter!(self.validation_failures_total).increment(1);
    }

    /// Record a persistence failure for a classified submission
    pub fn record_persistence_failure(&self) {
        counter!(self.persistence_failures_total).increment(1);
    }

    /// Record the duration of one store operation
    pub fn record_store_operation(&self, operation: &str, duration: Duration) {
        histogram!(
            self.store_operation_duration,
            "operation" => operation.to_string()
        )
        .record(duration.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed() {
        let metrics = FeedbackMetrics::default();
        assert!(metrics
            .classifications_total
            .starts_with("guest_feedback_"));
        assert!(metrics.submissions_total.starts_with("guest_feedback_"));
    }

    #[test]
    fn test_recording_without_recorder_is_a_noop() {
        let metrics = FeedbackMetrics::default();
        metrics.record_classification("Favourable", true);
        metrics.record_classification("Neutral", false);
        metrics.record_confidence(0.95);
        metrics.record_submission();
        metrics.record_validation_failure();
        metrics.record_persistence_failure();
        metrics.record_store_operation("insert", Duration::from_millis(3));
    }
}
