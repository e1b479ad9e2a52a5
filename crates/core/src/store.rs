//! Document-store collaborator contract for interview documents.

use async_trait::async_trait;

use crate::interview::{Interview, InterviewUpdate, NewInterview};
use crate::types::InterviewId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Interview document {0} does not exist")]
    NotFound(InterviewId),

    #[error("Document store error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Persistence operations the authoring flow and read views depend on.
///
/// Timestamps are assigned by the store at write time, never by callers.
#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Create a document and return its generated key. Sets `created_at`.
    async fn create(&self, input: NewInterview) -> Result<InterviewId, StoreError>;

    /// Apply a partial update to the document at `key`. Sets `updated_at`.
    async fn update(&self, key: &str, update: InterviewUpdate) -> Result<(), StoreError>;

    /// Read the document at `key`.
    async fn get(&self, key: &str) -> Result<Option<Interview>, StoreError>;

    /// All documents owned by `user_id`, newest first.
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Interview>, StoreError>;

    /// Cheap liveness check.
    async fn health_check(&self) -> Result<(), StoreError>;
}
