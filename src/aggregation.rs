//! Aggregation of stored feedback into derived views.
//!
//! Both views are computed fresh per request from a point-in-time snapshot
//! of the store; nothing here mutates data or caches across calls.

use std::sync::Arc;

use crate::error::{FeedbackError, Result};
use crate::models::{
    FeedbackRecord, RatingPercentages, RatingSummary, Sentiment, SentimentTrend,
};
use crate::repository::FeedbackStore;

/// Format of trend month labels: short English month name + 4-digit year.
///
/// chrono's `%b` is always English, so labels are reproducible regardless of
/// the host locale.
pub const MONTH_LABEL_FORMAT: &str = "%b %Y";

/// Computes rating-distribution summaries and sentiment trends.
pub struct AggregationEngine {
    store: Arc<dyn FeedbackStore>,
}

impl AggregationEngine {
    /// Build an engine over a feedback store.
    #[must_use]
    pub fn new(store: Arc<dyn FeedbackStore>) -> Self {
        Self { store }
    }

    /// Rating distribution over stored records, optionally for one outlet.
    pub async fn rating_summary(&self, outlet_id: Option<&str>) -> Result<RatingSummary> {
        let records = match outlet_id {
            Some(outlet) => self.store.fetch_by_outlet(outlet).await,
            None => self.store.fetch_all().await,
        }
        .map_err(|e| FeedbackError::Persistence(e.to_string()))?;

        Ok(summarize_ratings(&records))
    }

    /// Month-bucketed sentiment trend over all stored records.
    pub async fn sentiment_trend(&self) -> Result<SentimentTrend> {
        let records = self
            .store
            .fetch_all()
            .await
            .map_err(|e| FeedbackError::Persistence(e.to_string()))?;

        Ok(trend_by_month(&records))
    }
}

/// Bucket records by rating: 5 Excellent, 4 Good, 3 Fair, 1-2 Poor.
///
/// Any other or missing rating is excluded from every bucket and from the
/// total.
#[must_use]
pub fn summarize_ratings(records: &[FeedbackRecord]) -> RatingSummary {
    let mut excellent = 0u64;
    let mut good = 0u64;
    let mut fair = 0u64;
    let mut poor = 0u64;

    for record in records {
        match record.rating {
            Some(5) => excellent += 1,
            Some(4) => good += 1,
            Some(3) => fair += 1,
            Some(1 | 2) => poor += 1,
            _ => {}
        }
    }

    let total = excellent + good + fair + poor;

    RatingSummary {
        total,
        excellent,
        good,
        fair,
        poor,
        percentages: RatingPercentages {
            excellent: percentage(excellent, total),
            good: percentage(good, total),
            fair: percentage(fair, total),
            poor: percentage(poor, total),
        },
    }
}

/// Bucket records by submission month, counting sentiments per bucket.
///
/// Records missing a timestamp or carrying an unrecognized sentiment are
/// skipped entirely. Buckets keep first-occurrence order.
#[must_use]
pub fn trend_by_month(records: &[FeedbackRecord]) -> SentimentTrend {
    let mut trend = SentimentTrend::default();

    for record in records {
        let (Some(created_at), Some(sentiment)) = (record.created_at, record.sentiment) else {
            continue;
        };

        let month = created_at.format(MONTH_LABEL_FORMAT).to_string();
        let counts = trend.counts_mut(&month);
        match sentiment {
            Sentiment::Favourable => counts.favourable += 1,
            Sentiment::Unfavourable => counts.unfavourable += 1,
            Sentiment::Neutral => counts.neutral += 1,
        }
    }

    trend
}

// Bucket share as a 2-decimal string; "0" when nothing was counted, so
// callers never divide by zero.
#[allow(clippy::cast_precision_loss)]
fn percentage(count: u64, total: u64) -> String {
    if total == 0 {
        "0".to_string()
    } else {
        format!("{:.2}", (count as f64 / total as f64) * 100.0)
    }
}
