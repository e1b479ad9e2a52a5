//! Handlers for interview documents and the authoring flow.
//!
//! All endpoints require authentication. Users only see and edit their own
//! interviews. Create and update run the full authoring flow: validate,
//! generate questions, write.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use mockview_core::error::CoreError;
use mockview_core::form::{FormField, FormSession, InterviewForm, Notice};
use mockview_core::interview::{Interview, ENTITY_INTERVIEW};

use crate::analytics::{self, AnalyticsEvent, EVENT_INTERVIEW_CREATED, EVENT_INTERVIEW_UPDATED};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Payload returned after a successful create or update.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub interview: Interview,
    pub notice: Notice,
}

/// Form values plus the labels a client needs to render the form.
#[derive(Debug, Serialize)]
pub struct FormView {
    pub title: String,
    pub action: &'static str,
    pub values: InterviewForm,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
}

impl From<&FormSession> for FormView {
    fn from(session: &FormSession) -> Self {
        Self {
            title: session.title().to_string(),
            action: session.action_label(),
            values: session.values().clone(),
            fields: FormField::ALL
                .into_iter()
                .map(|f| FieldView {
                    name: f.wire_name(),
                    label: f.label(),
                })
                .collect(),
        }
    }
}

/// Read the form out of a JSON body.
///
/// A body that is not JSON is a bad request. Missing or mistyped fields are
/// field-level validation errors like any other schema failure.
fn read_form(payload: Result<Json<Value>, JsonRejection>) -> AppResult<InterviewForm> {
    let Json(body) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    InterviewForm::from_json(&body)
        .map_err(|fields| AppError::Core(CoreError::InvalidFields(fields)))
}

/// Load an interview and check the caller owns it.
async fn load_owned(state: &AppState, id: &str, user: &AuthUser) -> AppResult<Interview> {
    let interview = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: ENTITY_INTERVIEW,
                id: id.to_string(),
            })
        })?;

    if !interview.is_owned_by(&user.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only access your own interviews".into(),
        )));
    }

    Ok(interview)
}

// ---------------------------------------------------------------------------
// GET /interviews
// ---------------------------------------------------------------------------

/// List the caller's interviews, newest first.
pub async fn list_interviews(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let interviews = state.store.list_by_owner(&auth.user_id).await?;
    Ok(Json(DataResponse { data: interviews }))
}

// ---------------------------------------------------------------------------
// GET /interviews/:id
// ---------------------------------------------------------------------------

/// Get a single interview by identifier.
pub async fn get_interview(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let interview = load_owned(&state, &id, &auth).await?;
    Ok(Json(DataResponse { data: interview }))
}

// ---------------------------------------------------------------------------
// POST /interviews
// ---------------------------------------------------------------------------

/// Create an interview: generate questions, then create the document and
/// write its identifier back onto it.
pub async fn create_interview(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let input = read_form(payload)?;
    let submission = state.authoring.submit(&auth.user_id, None, input).await?;

    analytics::track(
        state.analytics.as_ref(),
        AnalyticsEvent::new(
            EVENT_INTERVIEW_CREATED,
            &auth.user_id,
            submission.interview.id.as_deref(),
        ),
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmissionResponse {
                interview: submission.interview,
                notice: submission.notice,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// PUT /interviews/:id
// ---------------------------------------------------------------------------

/// Overwrite an interview's fields and regenerate its questions.
pub async fn update_interview(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    load_owned(&state, &id, &auth).await?;
    let input = read_form(payload)?;

    let submission = state
        .authoring
        .submit(&auth.user_id, Some(&id), input)
        .await?;

    analytics::track(
        state.analytics.as_ref(),
        AnalyticsEvent::new(EVENT_INTERVIEW_UPDATED, &auth.user_id, Some(&id)),
    );

    Ok(Json(DataResponse {
        data: SubmissionResponse {
            interview: submission.interview,
            notice: submission.notice,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /interviews/new/form, GET /interviews/:id/form
// ---------------------------------------------------------------------------

/// Empty form for a new interview.
pub async fn new_form(_auth: AuthUser) -> AppResult<impl IntoResponse> {
    let session = FormSession::new(None);
    Ok(Json(DataResponse {
        data: FormView::from(&session),
    }))
}

/// Form pre-populated from an existing interview.
pub async fn edit_form(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let interview = load_owned(&state, &id, &auth).await?;
    let session = FormSession::new(Some(&interview));
    Ok(Json(DataResponse {
        data: FormView::from(&session),
    }))
}
