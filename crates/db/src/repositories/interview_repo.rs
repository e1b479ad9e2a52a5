//! Repository for the `interviews` table.

use mockview_core::interview::{InterviewUpdate, NewInterview};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::interview::InterviewRow;

/// Column list for `interviews` queries.
const COLUMNS: &str = "\
    doc_key, id, user_id, position, description, experience, \
    tech_stack, questions, created_at, updated_at";

/// Provides the document operations for interviews.
pub struct InterviewRepo;

impl InterviewRepo {
    /// Insert a new document, returning its generated key.
    ///
    /// `created_at` comes from the database clock.
    pub async fn create(pool: &PgPool, input: &NewInterview) -> Result<String, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "INSERT INTO interviews \
                (user_id, position, description, experience, tech_stack, questions) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING doc_key",
        )
        .bind(&input.user_id)
        .bind(&input.form.position)
        .bind(&input.form.description)
        .bind(input.form.experience)
        .bind(&input.form.tech_stack)
        .bind(Json(&input.questions))
        .fetch_one(pool)
        .await
    }

    /// Apply a partial update. Fields left `None` keep their stored value;
    /// `updated_at` is always set to `NOW()`. Returns `false` if no document
    /// has the given key.
    pub async fn update(
        pool: &PgPool,
        key: &str,
        update: &InterviewUpdate,
    ) -> Result<bool, sqlx::Error> {
        let form = update.form.as_ref();
        let result = sqlx::query(
            "UPDATE interviews SET \
                id = COALESCE($2, id), \
                position = COALESCE($3, position), \
                description = COALESCE($4, description), \
                experience = COALESCE($5, experience), \
                tech_stack = COALESCE($6, tech_stack), \
                questions = COALESCE($7, questions), \
                updated_at = NOW() \
             WHERE doc_key = $1",
        )
        .bind(key)
        .bind(update.id.as_deref())
        .bind(form.map(|f| f.position.as_str()))
        .bind(form.map(|f| f.description.as_str()))
        .bind(form.map(|f| f.experience))
        .bind(form.map(|f| f.tech_stack.as_str()))
        .bind(update.questions.as_ref().map(Json))
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Find a document by key.
    pub async fn find_by_key(pool: &PgPool, key: &str) -> Result<Option<InterviewRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM interviews WHERE doc_key = $1");
        sqlx::query_as::<_, InterviewRow>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// List a user's documents, newest first.
    pub async fn list_by_owner(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<InterviewRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM interviews WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, InterviewRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
