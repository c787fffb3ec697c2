//! Tests of the submission pipeline: validation, classification, and
//! persistence, including the guarantee that incomplete submissions never
//! touch an upstream collaborator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use guest_feedback_rust::aggregation::AggregationEngine;
use guest_feedback_rust::inference::{InferenceClient, InferenceResponse, LabelScore};
use guest_feedback_rust::keywords::KeywordSource;
use guest_feedback_rust::models::{
    ClassificationResult, FeedbackRecord, KeywordEntry, NewFeedback, Polarity, Sentiment,
};
use guest_feedback_rust::repository::FeedbackStore;
use guest_feedback_rust::service::FeedbackService;
use guest_feedback_rust::FeedbackError;

#[derive(Default)]
struct CountingKeywordSource {
    entries: Vec<KeywordEntry>,
    calls: AtomicUsize,
}

impl CountingKeywordSource {
    fn with_entries(entries: Vec<KeywordEntry>) -> Self {
        Self {
            entries,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeywordSource for CountingKeywordSource {
    async fn load_keywords(&self) -> anyhow::Result<Vec<KeywordEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.clone())
    }
}

#[derive(Default)]
struct CountingInferenceClient {
    entries: Vec<LabelScore>,
    calls: AtomicUsize,
}

impl CountingInferenceClient {
    fn with_entries(entries: Vec<LabelScore>) -> Self {
        Self {
            entries,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceClient for CountingInferenceClient {
    async fn score(&self, _text: &str) -> anyhow::Result<InferenceResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(InferenceResponse::Flat(self.entries.clone()))
    }
}

/// In-memory stand-in for the durable store.
#[derive(Default)]
struct MemoryStore {
    records: Mutex<Vec<FeedbackRecord>>,
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn insert_feedback(
        &self,
        submission: NewFeedback,
        classification: ClassificationResult,
    ) -> anyhow::Result<FeedbackRecord> {
        let mut records = self.records.lock().expect("store lock");
        let record = FeedbackRecord {
            id: records.len() as i64 + 1,
            guest_name: submission.guest_name,
            outlet_id: submission.outlet_id,
            rating: submission.rating,
            comment_text: submission.comment_text,
            phone: submission.phone,
            email: submission.email,
            address: submission.address,
            sentiment: Some(classification.sentiment),
            sentiment_confidence: classification.confidence,
            sentiment_reason: classification.reason,
            matched_keywords: classification.matched_keywords,
            benchmarks: classification.benchmarks,
            sub_benchmarks: classification.sub_benchmarks,
            created_at: Some(Utc::now().naive_utc()),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn fetch_all(&self) -> anyhow::Result<Vec<FeedbackRecord>> {
        Ok(self.records.lock().expect("store lock").clone())
    }

    async fn fetch_by_outlet(&self, outlet_id: &str) -> anyhow::Result<Vec<FeedbackRecord>> {
        Ok(self
            .records
            .lock()
            .expect("store lock")
            .iter()
            .filter(|record| record.outlet_id == outlet_id)
            .cloned()
            .collect())
    }

    async fn fetch_recent(
        &self,
        outlet_id: Option<&str>,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<FeedbackRecord>> {
        let mut records = match outlet_id {
            Some(outlet) => self.fetch_by_outlet(outlet).await?,
            None => self.fetch_all().await?,
        };
        records.reverse();
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    async fn delete_feedback(&self, id: i64) -> anyhow::Result<bool> {
        let mut records = self.records.lock().expect("store lock");
        let before = records.len();
        records.retain(|record| record.id != id);
        Ok(records.len() < before)
    }
}

fn submission() -> NewFeedback {
    NewFeedback {
        guest_name: "Priya Nair".to_string(),
        outlet_id: "outlet-05".to_string(),
        rating: Some(5),
        comment_text: "Spotless room and friendly staff".to_string(),
        phone: "+919876543210".to_string(),
        email: "priya@example.com".to_string(),
        address: Some("4 Marine Drive".to_string()),
    }
}

fn corpus() -> Vec<KeywordEntry> {
    vec![
        KeywordEntry::new("spotless", Polarity::Positive)
            .with_benchmarks(Some("Cleanliness & Hygiene".to_string()), None),
        KeywordEntry::new("friendly", Polarity::Positive)
            .with_benchmarks(Some("Staff Courtesy".to_string()), None),
        KeywordEntry::new("broken", Polarity::Negative)
            .with_benchmarks(Some("Maintenance".to_string()), None),
    ]
}

#[tokio::test]
async fn test_submit_persists_keyword_classification() {
    let keywords = Arc::new(CountingKeywordSource::with_entries(corpus()));
    let inference = Arc::new(CountingInferenceClient::default());
    let store = Arc::new(MemoryStore::default());
    let service = FeedbackService::new(
        Arc::clone(&keywords) as Arc<dyn KeywordSource>,
        Arc::clone(&inference) as Arc<dyn InferenceClient>,
        Arc::clone(&store) as Arc<dyn FeedbackStore>,
    );

    let record = service.submit(submission()).await.expect("submit succeeds");

    assert_eq!(record.id, 1);
    assert_eq!(record.sentiment, Some(Sentiment::Favourable));
    assert!((record.sentiment_confidence - 0.95).abs() < f64::EPSILON);
    assert_eq!(record.matched_keywords, vec!["spotless", "friendly"]);
    assert_eq!(
        record.benchmarks,
        vec!["Cleanliness & Hygiene", "Staff Courtesy"]
    );
    assert_eq!(keywords.calls(), 1);
    assert_eq!(inference.calls(), 0);

    let stored = store.fetch_all().await.expect("fetch succeeds");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].comment_text, "Spotless room and friendly staff");
}

#[tokio::test]
async fn test_incomplete_submission_performs_no_external_work() {
    let keywords = Arc::new(CountingKeywordSource::with_entries(corpus()));
    let inference = Arc::new(CountingInferenceClient::default());
    let store = Arc::new(MemoryStore::default());
    let service = FeedbackService::new(
        Arc::clone(&keywords) as Arc<dyn KeywordSource>,
        Arc::clone(&inference) as Arc<dyn InferenceClient>,
        Arc::clone(&store) as Arc<dyn FeedbackStore>,
    );

    let mut incomplete = submission();
    incomplete.email = String::new();
    let error = service
        .submit(incomplete)
        .await
        .expect_err("missing email is rejected");

    assert!(matches!(error, FeedbackError::Validation(_)));
    assert_eq!(keywords.calls(), 0, "keyword source must not be consulted");
    assert_eq!(inference.calls(), 0, "inference must not be consulted");
    assert!(store.fetch_all().await.expect("fetch succeeds").is_empty());
}

#[tokio::test]
async fn test_submit_without_keyword_match_consults_inference_once() {
    let keywords = Arc::new(CountingKeywordSource::with_entries(corpus()));
    let inference = Arc::new(CountingInferenceClient::with_entries(vec![
        LabelScore {
            label: "LABEL_0".to_string(),
            score: 0.881,
        },
        LabelScore {
            label: "LABEL_1".to_string(),
            score: 0.1,
        },
    ]));
    let store = Arc::new(MemoryStore::default());
    let service = FeedbackService::new(
        Arc::clone(&keywords) as Arc<dyn KeywordSource>,
        Arc::clone(&inference) as Arc<dyn InferenceClient>,
        Arc::clone(&store) as Arc<dyn FeedbackStore>,
    );

    let mut plain = submission();
    plain.comment_text = "The evening went by without anything of note".to_string();
    let record = service.submit(plain).await.expect("submit succeeds");

    assert_eq!(record.sentiment, Some(Sentiment::Unfavourable));
    assert!((record.sentiment_confidence - 0.88).abs() < f64::EPSILON);
    assert!(record.benchmarks.is_empty());
    assert_eq!(inference.calls(), 1);
}

#[tokio::test]
async fn test_submissions_feed_the_aggregation_views() {
    let keywords = Arc::new(CountingKeywordSource::with_entries(corpus()));
    let inference = Arc::new(CountingInferenceClient::default());
    let store = Arc::new(MemoryStore::default());
    let service = FeedbackService::new(
        Arc::clone(&keywords) as Arc<dyn KeywordSource>,
        Arc::clone(&inference) as Arc<dyn InferenceClient>,
        Arc::clone(&store) as Arc<dyn FeedbackStore>,
    );

    for (rating, comment) in [
        (5, "Spotless lobby"),
        (4, "friendly concierge"),
        (1, "broken shower"),
    ] {
        let mut feedback = submission();
        feedback.rating = Some(rating);
        feedback.comment_text = comment.to_string();
        service.submit(feedback).await.expect("submit succeeds");
    }

    let engine = AggregationEngine::new(Arc::clone(&store) as Arc<dyn FeedbackStore>);

    let summary = engine
        .rating_summary(Some("outlet-05"))
        .await
        .expect("summary succeeds");
    assert_eq!(summary.total, 3);
    assert_eq!(summary.excellent, 1);
    assert_eq!(summary.good, 1);
    assert_eq!(summary.poor, 1);

    let trend = engine.sentiment_trend().await.expect("trend succeeds");
    assert_eq!(trend.len(), 1, "all records share the current month");
    let bucket = &trend.buckets[0];
    assert_eq!(bucket.counts.favourable, 2);
    assert_eq!(bucket.counts.unfavourable, 1);
}

#[tokio::test]
async fn test_recent_and_delete_round_trip() {
    let keywords = Arc::new(CountingKeywordSource::with_entries(corpus()));
    let inference = Arc::new(CountingInferenceClient::default());
    let store = Arc::new(MemoryStore::default());
    let service = FeedbackService::new(
        Arc::clone(&keywords) as Arc<dyn KeywordSource>,
        Arc::clone(&inference) as Arc<dyn InferenceClient>,
        Arc::clone(&store) as Arc<dyn FeedbackStore>,
    );

    for comment in ["Spotless pool", "friendly porter"] {
        let mut feedback = submission();
        feedback.comment_text = comment.to_string();
        service.submit(feedback).await.expect("submit succeeds");
    }

    let recent = service.recent(None, Some(1)).await.expect("recent succeeds");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].comment_text, "friendly porter");

    assert!(service.delete(recent[0].id).await.expect("delete succeeds"));
    assert!(!service.delete(recent[0].id).await.expect("delete succeeds"));
}
