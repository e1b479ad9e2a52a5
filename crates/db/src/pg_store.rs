//! [`InterviewStore`] backed by PostgreSQL.

use async_trait::async_trait;
use mockview_core::interview::{Interview, InterviewUpdate, NewInterview};
use mockview_core::store::{InterviewStore, StoreError};
use mockview_core::types::InterviewId;

use crate::repositories::InterviewRepo;
use crate::DbPool;

#[derive(Clone)]
pub struct PgInterviewStore {
    pool: DbPool,
}

impl PgInterviewStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(Box::new(err))
}

#[async_trait]
impl InterviewStore for PgInterviewStore {
    async fn create(&self, input: NewInterview) -> Result<InterviewId, StoreError> {
        let key = InterviewRepo::create(&self.pool, &input)
            .await
            .map_err(backend)?;
        tracing::debug!(doc_key = %key, user_id = %input.user_id, "Interview document created");
        Ok(key)
    }

    async fn update(&self, key: &str, update: InterviewUpdate) -> Result<(), StoreError> {
        let found = InterviewRepo::update(&self.pool, key, &update)
            .await
            .map_err(backend)?;
        if !found {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Interview>, StoreError> {
        let row = InterviewRepo::find_by_key(&self.pool, key)
            .await
            .map_err(backend)?;
        Ok(row.map(Interview::from))
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Interview>, StoreError> {
        let rows = InterviewRepo::list_by_owner(&self.pool, user_id)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(Interview::from).collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await.map_err(backend)
    }
}
