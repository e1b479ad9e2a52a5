//! Row model for the `interviews` table.

use mockview_core::interview::{Interview, QuestionAnswer};
use mockview_core::types::Timestamp;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `interviews` table.
#[derive(Debug, Clone, FromRow)]
pub struct InterviewRow {
    pub doc_key: String,
    pub id: Option<String>,
    pub user_id: String,
    pub position: String,
    pub description: String,
    pub experience: f64,
    pub tech_stack: String,
    pub questions: Option<Json<Vec<QuestionAnswer>>>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl From<InterviewRow> for Interview {
    fn from(row: InterviewRow) -> Self {
        Self {
            id: row.id,
            position: row.position,
            description: row.description,
            experience: row.experience,
            tech_stack: row.tech_stack,
            questions: row.questions.map(|q| q.0),
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
