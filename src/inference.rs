//! Fallback classification through an external sentiment inference service.
//!
//! The service is an opaque 3-label scored oracle. It is consulted only when
//! no keyword matched, with the full comment text as a single request; no
//! batching, no retry, no truncation. Whatever goes wrong here is absorbed
//! into a fixed Neutral result and never surfaces as a submission error.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::InferenceConfig;
use crate::models::{ClassificationResult, Sentiment};

/// Label the service uses for positive sentiment
pub const LABEL_FAVOURABLE: &str = "LABEL_2";
/// Label the service uses for negative sentiment
pub const LABEL_UNFAVOURABLE: &str = "LABEL_0";

/// Confidence recorded when the service yields nothing usable
pub const FALLBACK_CONFIDENCE: f64 = 0.5;
/// Reason recorded when the service yields nothing usable
pub const FALLBACK_REASON: &str = "inference unavailable, defaulted to neutral.";

/// One scored label returned by the inference service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelScore {
    /// Label code, e.g. "LABEL_2"
    pub label: String,
    /// Model score for the label
    pub score: f64,
}

/// Raw response shape of the inference service.
///
/// The service returns either a flat list of scored labels or the same list
/// nested one level deep. Both shapes are accepted here, once, so call sites
/// never deal with the ambiguity.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InferenceResponse {
    /// A flat list of scored labels
    Flat(Vec<LabelScore>),
    /// The same list nested one level deep
    Nested(Vec<Vec<LabelScore>>),
}

impl InferenceResponse {
    /// Unwrap to the flat list of entries, taking the first inner list of a
    /// nested response.
    #[must_use]
    pub fn into_entries(self) -> Vec<LabelScore> {
        match self {
            Self::Flat(entries) => entries,
            Self::Nested(mut outer) => {
                if outer.is_empty() {
                    Vec::new()
                } else {
                    outer.swap_remove(0)
                }
            }
        }
    }
}

/// A client able to score a text against the 3-label sentiment model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Request scores for one text.
    async fn score(&self, text: &str) -> anyhow::Result<InferenceResponse>;
}

/// HTTP client for a hosted inference endpoint.
///
/// Sends `{"inputs": text}` with optional bearer-token auth, matching the
/// hosted Hugging Face inference API.
pub struct HttpInferenceClient {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HttpInferenceClient {
    /// Build a client from configuration.
    pub fn new(config: &InferenceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build inference HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn score(&self, text: &str) -> anyhow::Result<InferenceResponse> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "inputs": text }));

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("inference request failed")?
            .error_for_status()
            .context("inference service returned an error status")?;

        response
            .json::<InferenceResponse>()
            .await
            .context("failed to decode inference response")
    }
}

/// Adapter that turns raw inference output into a [`ClassificationResult`].
pub struct AiFallbackAdapter {
    client: Arc<dyn InferenceClient>,
}

impl AiFallbackAdapter {
    /// Wrap an inference client.
    #[must_use]
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }

    /// Classify a comment text through the inference service.
    ///
    /// A failed request or an empty/malformed response degrades to the fixed
    /// Neutral result; this method cannot fail.
    pub async fn classify(&self, comment_text: &str) -> ClassificationResult {
        let entries = match self.client.score(comment_text).await {
            Ok(response) => response.into_entries(),
            Err(error) => {
                warn!(error = %error, "sentiment inference unavailable");
                Vec::new()
            }
        };

        Self::select(&entries)
    }

    /// Pick the top-scored entry and map it to a classification.
    ///
    /// Ties keep the first-seen entry. Unrecognized labels map to Neutral.
    #[must_use]
    pub fn select(entries: &[LabelScore]) -> ClassificationResult {
        let Some(top) = entries.iter().reduce(|best, candidate| {
            if candidate.score > best.score {
                candidate
            } else {
                best
            }
        }) else {
            return Self::unavailable();
        };

        let sentiment = match top.label.as_str() {
            LABEL_FAVOURABLE => Sentiment::Favourable,
            LABEL_UNFAVOURABLE => Sentiment::Unfavourable,
            _ => Sentiment::Neutral,
        };
        let confidence = (top.score * 100.0).round() / 100.0;
        debug!(label = %top.label, confidence, "inference classified comment");

        ClassificationResult {
            sentiment,
            confidence,
            reason: format!("No keywords found. AI classified the comment as {sentiment}."),
            matched_keywords: Vec::new(),
            benchmarks: Vec::new(),
            sub_benchmarks: Vec::new(),
        }
    }

    /// The fixed result used when the service yields nothing usable.
    #[must_use]
    pub fn unavailable() -> ClassificationResult {
        ClassificationResult {
            sentiment: Sentiment::Neutral,
            confidence: FALLBACK_CONFIDENCE,
            reason: FALLBACK_REASON.to_string(),
            matched_keywords: Vec::new(),
            benchmarks: Vec::new(),
            sub_benchmarks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, score: f64) -> LabelScore {
        LabelScore {
            label: label.to_string(),
            score,
        }
    }

    #[test]
    fn test_flat_response_unwraps() {
        let response: InferenceResponse =
            serde_json::from_str(r#"[{"label":"LABEL_2","score":0.9}]"#).expect("flat parses");
        assert_eq!(response.into_entries().len(), 1);
    }

    #[test]
    fn test_nested_response_unwraps_first_list() {
        let response: InferenceResponse = serde_json::from_str(
            r#"[[{"label":"LABEL_0","score":0.7},{"label":"LABEL_1","score":0.2}]]"#,
        )
        .expect("nested parses");
        let entries = response.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "LABEL_0");
    }

    #[test]
    fn test_select_picks_strictly_greatest_score() {
        let result = AiFallbackAdapter::select(&[
            entry("LABEL_1", 0.10),
            entry("LABEL_2", 0.85),
            entry("LABEL_0", 0.05),
        ]);
        assert_eq!(result.sentiment, Sentiment::Favourable);
        assert!((result.confidence - 0.85).abs() < f64::EPSILON);
        assert_eq!(
            result.reason,
            "No keywords found. AI classified the comment as Favourable."
        );
        assert!(result.benchmarks.is_empty());
    }

    #[test]
    fn test_select_tie_keeps_first_entry() {
        let result = AiFallbackAdapter::select(&[entry("LABEL_0", 0.5), entry("LABEL_2", 0.5)]);
        assert_eq!(result.sentiment, Sentiment::Unfavourable);
    }

    #[test]
    fn test_select_rounds_confidence_to_two_decimals() {
        let result = AiFallbackAdapter::select(&[entry("LABEL_2", 0.876_543)]);
        assert!((result.confidence - 0.88).abs() < f64::EPSILON);
    }

    #[test]
    fn test_select_unrecognized_label_is_neutral() {
        let result = AiFallbackAdapter::select(&[entry("LABEL_7", 0.99)]);
        assert_eq!(result.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_select_empty_defaults_to_neutral() {
        let result = AiFallbackAdapter::select(&[]);
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!((result.confidence - FALLBACK_CONFIDENCE).abs() < f64::EPSILON);
        assert_eq!(result.reason, FALLBACK_REASON);
    }

    #[tokio::test]
    async fn test_classify_absorbs_client_failure() {
        let mut client = MockInferenceClient::new();
        client
            .expect_score()
            .returning(|_| Err(anyhow::anyhow!("timed out")));

        let adapter = AiFallbackAdapter::new(Arc::new(client));
        let result = adapter.classify("no keywords here").await;
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.reason, FALLBACK_REASON);
    }
}
