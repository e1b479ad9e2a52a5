//! Interview record and the write DTOs the document store accepts.
//!
//! The wire shape uses camelCase keys (`techStack`, `userId`, `createdAt`)
//! so stored documents and API payloads read the same.

use serde::{Deserialize, Serialize};

use crate::form::InterviewForm;
use crate::types::{InterviewId, Timestamp, UserId};

/// Name used for interview documents in errors and logs.
pub const ENTITY_INTERVIEW: &str = "Interview";

/// One generated interview question with its model answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// A persisted interview document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    /// Identifier written back onto the document after creation. `None` only
    /// between the create and the write-back update.
    pub id: Option<InterviewId>,
    pub position: String,
    pub description: String,
    pub experience: f64,
    pub tech_stack: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionAnswer>>,
    /// Owner, set once at creation.
    pub user_id: UserId,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl Interview {
    /// Whether `user_id` owns this document.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Fields for a brand-new document. The store assigns the key and
/// `created_at`.
#[derive(Debug, Clone)]
pub struct NewInterview {
    pub user_id: UserId,
    pub form: InterviewForm,
    pub questions: Vec<QuestionAnswer>,
}

/// Partial field set for an update. `None` leaves the stored value alone;
/// the store always stamps `updated_at`.
#[derive(Debug, Clone, Default)]
pub struct InterviewUpdate {
    pub id: Option<InterviewId>,
    pub form: Option<InterviewForm>,
    pub questions: Option<Vec<QuestionAnswer>>,
}

impl InterviewUpdate {
    /// Write the store key back onto the document as its `id` field.
    pub fn assign_id(id: impl Into<InterviewId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Overwrite every form field and the generated questions.
    pub fn overwrite(form: InterviewForm, questions: Vec<QuestionAnswer>) -> Self {
        Self {
            id: None,
            form: Some(form),
            questions: Some(questions),
        }
    }
}
