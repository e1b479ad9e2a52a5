//! [`InterviewStore`] held in process memory.
//!
//! Keys are random UUIDs and timestamps come from the store's clock, so the
//! store behaves like the database from the caller's side. Contents are lost
//! on restart.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use mockview_core::interview::{Interview, InterviewUpdate, NewInterview};
use mockview_core::store::{InterviewStore, StoreError};
use mockview_core::types::InterviewId;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    doc: Interview,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    docs: HashMap<InterviewId, Entry>,
}

#[derive(Debug, Default)]
pub struct MemoryInterviewStore {
    inner: RwLock<Inner>,
}

impl MemoryInterviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .docs
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl InterviewStore for MemoryInterviewStore {
    async fn create(&self, input: NewInterview) -> Result<InterviewId, StoreError> {
        let key = Uuid::new_v4().to_string();
        let doc = Interview {
            id: None,
            position: input.form.position,
            description: input.form.description,
            experience: input.form.experience,
            tech_stack: input.form.tech_stack,
            questions: Some(input.questions),
            user_id: input.user_id,
            created_at: Utc::now(),
            updated_at: None,
        };

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.docs.insert(key.clone(), Entry { seq, doc });
        Ok(key)
    }

    async fn update(&self, key: &str, update: InterviewUpdate) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let entry = inner
            .docs
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        let doc = &mut entry.doc;

        if let Some(id) = update.id {
            doc.id = Some(id);
        }
        if let Some(form) = update.form {
            doc.position = form.position;
            doc.description = form.description;
            doc.experience = form.experience;
            doc.tech_stack = form.tech_stack;
        }
        if let Some(questions) = update.questions {
            doc.questions = Some(questions);
        }
        doc.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Interview>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.docs.get(key).map(|e| e.doc.clone()))
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Interview>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<&Entry> = inner
            .docs
            .values()
            .filter(|e| e.doc.user_id == user_id)
            .collect();
        entries.sort_by(|a, b| {
            b.doc
                .created_at
                .cmp(&a.doc.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(entries.into_iter().map(|e| e.doc.clone()).collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
