//! Interview authoring flow: validate, generate questions, upsert.
//!
//! [`Authoring`] runs one submit for a form instance identified by a
//! [`FormKey`]. At most one submit per key is outstanding; a concurrent
//! submit for the same key is rejected with [`AuthoringError::Busy`] before
//! any AI or store call is made. The in-flight marker is an RAII guard, so it
//! is released on success, failure, and cancellation alike.
//!
//! The AI call always precedes the write. Create and update are not
//! compensated on partial failure; the store's own write semantics apply.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::form::{
    FormSession, FormState, InterviewForm, Notice, SubmitRejection, NOTICE_CREATED,
    NOTICE_UPDATED,
};
use crate::generator::{GenerateError, TextGenerator};
use crate::interview::{Interview, InterviewUpdate, NewInterview, QuestionAnswer};
use crate::prompt::{build_question_prompt, DEFAULT_QUESTION_COUNT};
use crate::sanitizer::{sanitize_questions, SanitizeError};
use crate::store::{InterviewStore, StoreError};
use crate::types::{FieldErrors, InterviewId, UserId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Underlying cause of a failed submit.
#[derive(Debug, thiserror::Error)]
pub enum SubmitFailure {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Sanitize(#[from] SanitizeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthoringError {
    #[error("Form input is invalid")]
    Invalid(FieldErrors),

    #[error("A submission for this form is already in progress")]
    Busy,

    #[error("Submission failed: {0}")]
    SubmitFailed(#[source] SubmitFailure),
}

// ---------------------------------------------------------------------------
// In-flight tracking
// ---------------------------------------------------------------------------

/// Identity of a form instance: its owner plus the edited record, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormKey {
    pub owner: UserId,
    pub target: Option<InterviewId>,
}

impl FormKey {
    pub fn new(owner: &str, target: Option<&str>) -> Self {
        Self {
            owner: owner.to_string(),
            target: target.map(str::to_string),
        }
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(id) => write!(f, "{}/{}", self.owner, id),
            None => write!(f, "{}/new", self.owner),
        }
    }
}

/// Form sessions that are currently submitting, by form key.
#[derive(Debug, Default)]
struct InFlight(Mutex<HashMap<FormKey, FormSession>>);

impl InFlight {
    /// Start a submit for `key`: reject when that form's session is locked,
    /// otherwise validate `values` and register a submitting session.
    fn begin(
        self: &Arc<Self>,
        key: FormKey,
        values: InterviewForm,
    ) -> Result<SubmitGuard, SubmitRejection> {
        let mut sessions = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if sessions.get(&key).is_some_and(FormSession::is_locked) {
            return Err(SubmitRejection::Busy);
        }

        let mut session = FormSession::with_values(values, key.target.clone());
        session.begin_submit()?;
        sessions.insert(key.clone(), session);

        Ok(SubmitGuard {
            registry: Arc::clone(self),
            key,
        })
    }

    fn is_locked(&self, key: &FormKey) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .is_some_and(FormSession::is_locked)
    }
}

/// Holds a form's session in the submitting state until dropped.
struct SubmitGuard {
    registry: Arc<InFlight>,
    key: FormKey,
}

impl SubmitGuard {
    /// Settle the tracked session and report its final state.
    fn settle(&self, success: bool) -> FormState {
        let mut sessions = self
            .registry
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match sessions.get_mut(&self.key) {
            Some(session) => {
                session.settle(success);
                session.state()
            }
            None => FormState::Settled { success },
        }
    }
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.registry
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

// ---------------------------------------------------------------------------
// Authoring
// ---------------------------------------------------------------------------

/// Result of a successful submit.
#[derive(Debug, Clone)]
pub struct Submission {
    /// The document as stored after the write.
    pub interview: Interview,
    pub notice: Notice,
    /// `true` for the create branch.
    pub created: bool,
}

pub struct Authoring {
    store: Arc<dyn InterviewStore>,
    generator: Arc<dyn TextGenerator>,
    question_count: u32,
    in_flight: Arc<InFlight>,
}

impl Authoring {
    pub fn new(store: Arc<dyn InterviewStore>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            store,
            generator,
            question_count: DEFAULT_QUESTION_COUNT,
            in_flight: Arc::default(),
        }
    }

    /// Override how many questions each generation asks for.
    pub fn with_question_count(mut self, count: u32) -> Self {
        self.question_count = count;
        self
    }

    /// Whether a submit for `key` is currently running.
    pub fn is_in_flight(&self, key: &FormKey) -> bool {
        self.in_flight.is_locked(key)
    }

    /// Submit `input` for `owner`.
    ///
    /// With `existing = None` a new document is created and its key written
    /// back as `id`. With `existing = Some(key)` the document at `key` is
    /// overwritten. Ownership of `key` is the caller's concern.
    pub async fn submit(
        &self,
        owner: &str,
        existing: Option<&str>,
        input: InterviewForm,
    ) -> Result<Submission, AuthoringError> {
        let key = FormKey::new(owner, existing);

        let guard = self
            .in_flight
            .begin(key.clone(), input.clone())
            .map_err(|rejection| match rejection {
                SubmitRejection::Invalid(errors) => AuthoringError::Invalid(errors),
                SubmitRejection::Busy => {
                    tracing::warn!(form = %key, "Submission rejected, another is in flight");
                    AuthoringError::Busy
                }
            })?;

        let result = self.run(owner, existing, &input).await;
        let state = guard.settle(result.is_ok());

        match &result {
            Ok(submission) => tracing::info!(
                form = %key,
                interview_id = ?submission.interview.id,
                created = submission.created,
                state = ?state,
                "Interview submission completed",
            ),
            Err(e) => tracing::error!(
                form = %key,
                error = %e,
                state = ?state,
                "Interview submission failed",
            ),
        }

        result.map_err(AuthoringError::SubmitFailed)
    }

    /// Prompt the generator and sanitize its reply into question pairs.
    pub async fn generate_questions(
        &self,
        form: &InterviewForm,
    ) -> Result<Vec<QuestionAnswer>, SubmitFailure> {
        let prompt = build_question_prompt(form, self.question_count);
        let reply = self.generator.generate(&prompt).await?;
        let questions = sanitize_questions(&reply)?;
        tracing::debug!(count = questions.len(), "Generated interview questions");
        Ok(questions)
    }

    async fn run(
        &self,
        owner: &str,
        existing: Option<&str>,
        form: &InterviewForm,
    ) -> Result<Submission, SubmitFailure> {
        let questions = self.generate_questions(form).await?;

        let (key, notice, created) = match existing {
            Some(key) => {
                self.store
                    .update(key, InterviewUpdate::overwrite(form.clone(), questions))
                    .await?;
                (key.to_string(), NOTICE_UPDATED, false)
            }
            None => {
                let key = self
                    .store
                    .create(NewInterview {
                        user_id: owner.to_string(),
                        form: form.clone(),
                        questions,
                    })
                    .await?;
                self.store
                    .update(&key, InterviewUpdate::assign_id(key.clone()))
                    .await?;
                (key, NOTICE_CREATED, true)
            }
        };

        let interview = self
            .store
            .get(&key)
            .await?
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;

        Ok(Submission {
            interview,
            notice,
            created,
        })
    }
}
