use async_trait::async_trait;

use crate::models::{ClassificationResult, FeedbackRecord, NewFeedback};

/// Read/write access to the durable feedback store.
///
/// The storage engine itself is a collaborator behind this seam; the engine
/// only ever asks for single inserts, snapshot reads, and explicit deletes.
/// Records are immutable once written, so there is no update operation.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Insert one classified submission and return the persisted record,
    /// including the store-assigned id and timestamp.
    async fn insert_feedback(
        &self,
        submission: NewFeedback,
        classification: ClassificationResult,
    ) -> anyhow::Result<FeedbackRecord>;

    /// Fetch a point-in-time snapshot of all records, in insertion order.
    async fn fetch_all(&self) -> anyhow::Result<Vec<FeedbackRecord>>;

    /// Fetch the snapshot restricted to one outlet reference.
    async fn fetch_by_outlet(&self, outlet_id: &str) -> anyhow::Result<Vec<FeedbackRecord>>;

    /// Fetch records newest first, optionally restricted to one outlet.
    async fn fetch_recent(
        &self,
        outlet_id: Option<&str>,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<FeedbackRecord>>;

    /// Delete one record by id; true when a row was removed.
    async fn delete_feedback(&self, id: i64) -> anyhow::Result<bool>;
}
