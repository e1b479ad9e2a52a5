//! Interview form schema and the per-instance form controller.
//!
//! [`InterviewForm`] carries the four user-editable fields and their
//! validation rules. [`FormSession`] tracks one form instance: field values,
//! per-field errors, the edited record's identity, and the submit lifecycle
//! (idle -> validating -> submitting -> settled).

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::interview::Interview;
use crate::types::{FieldErrors, InterviewId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of the position field, in characters.
pub const MAX_POSITION_LENGTH: u64 = 100;

/// Minimum length of the job description, in characters.
pub const MIN_DESCRIPTION_LENGTH: u64 = 10;

pub const MSG_POSITION_REQUIRED: &str = "Position is required";
pub const MSG_POSITION_TOO_LONG: &str = "Position must be 100 characters or less";
pub const MSG_DESCRIPTION_REQUIRED: &str = "Description is required";
pub const MSG_EXPERIENCE_INVALID: &str = "Experience cannot be empty or negative";
pub const MSG_TECH_STACK_REQUIRED: &str = "Tech stack must be at least a character";

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// User-supplied interview fields.
///
/// Request bodies are read through [`InterviewForm::from_json`], so wrong
/// types and missing fields surface as field errors.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InterviewForm {
    #[validate(custom(function = "check_position"))]
    pub position: String,

    #[validate(custom(function = "check_description"))]
    pub description: String,

    #[validate(custom(function = "check_experience"))]
    pub experience: f64,

    #[validate(custom(function = "check_tech_stack"))]
    pub tech_stack: String,
}

impl Default for InterviewForm {
    fn default() -> Self {
        Self {
            position: String::new(),
            description: String::new(),
            experience: 0.0,
            tech_stack: String::new(),
        }
    }
}

impl From<&Interview> for InterviewForm {
    fn from(record: &Interview) -> Self {
        Self {
            position: record.position.clone(),
            description: record.description.clone(),
            experience: record.experience,
            tech_stack: record.tech_stack.clone(),
        }
    }
}

impl InterviewForm {
    /// Validate every field, returning wire-named field errors on failure.
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(|e| collect_field_errors(&e))
    }

    /// Build a form from an untyped request body.
    ///
    /// Absent text fields read as empty. Experience accepts a JSON number or
    /// numeric text, like a number input. Mistyped or missing values are
    /// reported together with the schema errors of the other fields.
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let form = Self {
            position: text_field(body, FormField::Position, &mut errors),
            description: text_field(body, FormField::Description, &mut errors),
            experience: experience_field(body, &mut errors),
            tech_stack: text_field(body, FormField::TechStack, &mut errors),
        };

        if let Err(schema) = form.check() {
            for (field, messages) in schema {
                errors.entry(field).or_insert(messages);
            }
        }

        if errors.is_empty() {
            Ok(form)
        } else {
            Err(errors)
        }
    }

    /// Messages for a single field; empty when the field is valid.
    pub fn messages_for(&self, field: FormField) -> Vec<String> {
        match self.check() {
            Ok(()) => Vec::new(),
            Err(mut errors) => errors.remove(field.wire_name()).unwrap_or_default(),
        }
    }
}

fn check_position(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count() as u64;
    if len == 0 {
        return Err(field_error("position", MSG_POSITION_REQUIRED));
    }
    if len > MAX_POSITION_LENGTH {
        return Err(field_error("position", MSG_POSITION_TOO_LONG));
    }
    Ok(())
}

fn check_description(value: &str) -> Result<(), ValidationError> {
    if (value.chars().count() as u64) < MIN_DESCRIPTION_LENGTH {
        return Err(field_error("description", MSG_DESCRIPTION_REQUIRED));
    }
    Ok(())
}

fn check_experience(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(field_error("experience", MSG_EXPERIENCE_INVALID));
    }
    Ok(())
}

fn check_tech_stack(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(field_error("techStack", MSG_TECH_STACK_REQUIRED));
    }
    Ok(())
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Parse experience the way a numeric input coerces text: blank is zero,
/// anything else must be a finite number.
pub fn parse_experience(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn text_field(body: &Value, field: FormField, errors: &mut FieldErrors) -> String {
    match body.get(field.wire_name()) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(_) => {
            errors.insert(
                field.wire_name().to_string(),
                vec![field.required_message().to_string()],
            );
            String::new()
        }
    }
}

fn experience_field(body: &Value, errors: &mut FieldErrors) -> f64 {
    let parsed = match body.get(FormField::Experience.wire_name()) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_experience(s),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        errors.insert(
            FormField::Experience.wire_name().to_string(),
            vec![MSG_EXPERIENCE_INVALID.to_string()],
        );
        0.0
    })
}

/// Map `validator` errors (keyed by Rust field name) to wire field names.
fn collect_field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (name, errs) in errors.field_errors() {
        let name: &str = &name;
        let key = FormField::from_attr_name(name)
            .map(|f| f.wire_name().to_string())
            .unwrap_or_else(|| name.to_string());
        let messages = errs
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect::<Vec<_>>();
        out.entry(key).or_default().extend(messages);
    }
    out
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// The editable form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Position,
    Description,
    Experience,
    TechStack,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Position,
        FormField::Description,
        FormField::Experience,
        FormField::TechStack,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            FormField::Position => "position",
            FormField::Description => "description",
            FormField::Experience => "experience",
            FormField::TechStack => "techStack",
        }
    }

    fn attr_name(self) -> &'static str {
        match self {
            FormField::TechStack => "tech_stack",
            other => other.wire_name(),
        }
    }

    fn from_attr_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.attr_name() == name)
    }

    /// Message shown when the field is absent or of the wrong type.
    pub fn required_message(self) -> &'static str {
        match self {
            FormField::Position => MSG_POSITION_REQUIRED,
            FormField::Description => MSG_DESCRIPTION_REQUIRED,
            FormField::Experience => MSG_EXPERIENCE_INVALID,
            FormField::TechStack => MSG_TECH_STACK_REQUIRED,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            FormField::Position => "Job Role / Job Position",
            FormField::Description => "Job Description",
            FormField::Experience => "Years of Experience",
            FormField::TechStack => "Tech Stacks",
        }
    }
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// Confirmation shown after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
}

pub const NOTICE_CREATED: Notice = Notice {
    title: "Created..!",
    description: "New Mock Interview created...",
};

pub const NOTICE_UPDATED: Notice = Notice {
    title: "Updated..!",
    description: "Changes saved successfully...",
};

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Submit lifecycle of one form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
    Settled { success: bool },
}

/// Controller for one interview form instance.
#[derive(Debug, Clone)]
pub struct FormSession {
    editing: Option<InterviewId>,
    values: InterviewForm,
    errors: FieldErrors,
    state: FormState,
}

impl FormSession {
    /// Empty form for a new interview, or one pre-populated from `initial`.
    pub fn new(initial: Option<&Interview>) -> Self {
        Self {
            editing: initial.and_then(|r| r.id.clone()),
            values: initial.map(InterviewForm::from).unwrap_or_default(),
            errors: FieldErrors::new(),
            state: FormState::Idle,
        }
    }

    /// Session over already-collected values (e.g. a request body).
    pub fn with_values(values: InterviewForm, editing: Option<InterviewId>) -> Self {
        Self {
            editing,
            values,
            errors: FieldErrors::new(),
            state: FormState::Idle,
        }
    }

    pub fn values(&self) -> &InterviewForm {
        &self.values
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Inputs and the submit action are disabled while a submit is running.
    pub fn is_locked(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn is_valid(&self) -> bool {
        self.values.check().is_ok()
    }

    /// Heading: the edited position, or the create prompt.
    pub fn title(&self) -> &str {
        if self.editing.is_some() {
            &self.values.position
        } else {
            "Create a new mock interview"
        }
    }

    /// Label of the submit action.
    pub fn action_label(&self) -> &'static str {
        if self.editing.is_some() {
            "Save Changes"
        } else {
            "Create"
        }
    }

    /// Set one field from raw input text and re-validate just that field.
    pub fn set_field(&mut self, field: FormField, raw: &str) -> Result<(), CoreError> {
        if self.is_locked() {
            return Err(CoreError::Conflict(
                "Form is locked while a submission is in progress".into(),
            ));
        }

        match field {
            FormField::Position => self.values.position = raw.to_string(),
            FormField::Description => self.values.description = raw.to_string(),
            FormField::TechStack => self.values.tech_stack = raw.to_string(),
            FormField::Experience => match parse_experience(raw) {
                Some(v) => self.values.experience = v,
                None => {
                    self.errors.insert(
                        field.wire_name().to_string(),
                        vec![MSG_EXPERIENCE_INVALID.to_string()],
                    );
                    return Ok(());
                }
            },
        }

        let messages = self.values.messages_for(field);
        if messages.is_empty() {
            self.errors.remove(field.wire_name());
        } else {
            self.errors.insert(field.wire_name().to_string(), messages);
        }
        Ok(())
    }

    /// Reset every field to `record`'s values when the edited record changes.
    ///
    /// Returns `true` when a reset happened.
    pub fn reset_for(&mut self, record: &Interview) -> bool {
        if self.editing.is_some() && self.editing == record.id {
            return false;
        }
        self.editing = record.id.clone();
        self.values = InterviewForm::from(record);
        self.errors.clear();
        self.state = FormState::Idle;
        true
    }

    /// Move to `submitting` if the form is valid and not already submitting.
    ///
    /// On invalid input the session returns to `idle` holding the field
    /// errors, which are also returned.
    pub fn begin_submit(&mut self) -> Result<(), SubmitRejection> {
        if self.is_locked() {
            return Err(SubmitRejection::Busy);
        }
        self.state = FormState::Validating;
        match self.values.check() {
            Ok(()) => {
                self.errors.clear();
                self.state = FormState::Submitting;
                Ok(())
            }
            Err(errors) => {
                self.errors = errors.clone();
                self.state = FormState::Idle;
                Err(SubmitRejection::Invalid(errors))
            }
        }
    }

    /// Record the outcome of the running submit.
    pub fn settle(&mut self, success: bool) {
        self.state = FormState::Settled { success };
    }
}

/// Why a submit could not start.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitRejection {
    Invalid(FieldErrors),
    Busy,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn valid_form() -> InterviewForm {
        InterviewForm {
            position: "Backend Engineer".into(),
            description: "Build APIs for payments".into(),
            experience: 3.0,
            tech_stack: "Go".into(),
        }
    }

    fn record(id: &str, position: &str) -> Interview {
        Interview {
            id: Some(id.into()),
            position: position.into(),
            description: "Design distributed systems".into(),
            experience: 5.0,
            tech_stack: "Rust, Postgres".into(),
            questions: None,
            user_id: "user_1".into(),
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    // -- schema --

    #[test]
    fn valid_form_passes() {
        assert!(valid_form().check().is_ok());
    }

    #[test]
    fn empty_position_reports_required() {
        let form = InterviewForm {
            position: String::new(),
            ..valid_form()
        };
        let errors = form.check().unwrap_err();
        assert_eq!(errors["position"], vec![MSG_POSITION_REQUIRED.to_string()]);
    }

    #[test]
    fn position_boundary_is_100_characters() {
        let exact = InterviewForm {
            position: "é".repeat(100),
            ..valid_form()
        };
        assert!(exact.check().is_ok());

        let over = InterviewForm {
            position: "x".repeat(101),
            ..valid_form()
        };
        let errors = over.check().unwrap_err();
        assert_eq!(errors["position"], vec![MSG_POSITION_TOO_LONG.to_string()]);
    }

    #[test]
    fn short_description_rejected() {
        let form = InterviewForm {
            description: "too short".into(),
            ..valid_form()
        };
        let errors = form.check().unwrap_err();
        assert_eq!(
            errors["description"],
            vec![MSG_DESCRIPTION_REQUIRED.to_string()]
        );
    }

    #[test]
    fn negative_experience_rejected() {
        let form = InterviewForm {
            experience: -1.0,
            ..valid_form()
        };
        let errors = form.check().unwrap_err();
        assert_eq!(errors["experience"], vec![MSG_EXPERIENCE_INVALID.to_string()]);
    }

    #[test]
    fn tech_stack_error_uses_wire_name() {
        let form = InterviewForm {
            tech_stack: String::new(),
            ..valid_form()
        };
        let errors = form.check().unwrap_err();
        assert!(errors.contains_key("techStack"));
        assert!(!errors.contains_key("tech_stack"));
    }

    #[test]
    fn experience_accepts_numeric_text() {
        let form = InterviewForm::from_json(&json!({
            "position": "Backend Engineer",
            "description": "Build APIs for payments",
            "experience": "4",
            "techStack": "Go",
        }))
        .unwrap();
        assert_eq!(form.experience, 4.0);
    }

    #[test]
    fn body_with_non_numeric_experience_reports_field_error() {
        let errors = InterviewForm::from_json(&json!({
            "position": "Backend Engineer",
            "description": "Build APIs for payments",
            "experience": "five",
            "techStack": "Go",
        }))
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["experience"], vec![MSG_EXPERIENCE_INVALID.to_string()]);
    }

    #[test]
    fn body_missing_fields_reports_each_field() {
        let errors = InterviewForm::from_json(&json!({
            "position": "Backend Engineer",
            "description": "Build APIs for payments",
        }))
        .unwrap_err();
        assert_eq!(errors["experience"], vec![MSG_EXPERIENCE_INVALID.to_string()]);
        assert_eq!(errors["techStack"], vec![MSG_TECH_STACK_REQUIRED.to_string()]);
        assert!(!errors.contains_key("position"));
    }

    #[test]
    fn body_with_mistyped_text_field_reports_required() {
        let errors = InterviewForm::from_json(&json!({
            "position": 42,
            "description": "Build APIs for payments",
            "experience": 2,
            "techStack": "Go",
        }))
        .unwrap_err();
        assert_eq!(errors["position"], vec![MSG_POSITION_REQUIRED.to_string()]);
    }

    #[test]
    fn non_object_body_reports_every_field() {
        let errors = InterviewForm::from_json(&json!([1, 2])).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn blank_experience_coerces_to_zero() {
        assert_eq!(parse_experience("  "), Some(0.0));
        assert_eq!(parse_experience("2.5"), Some(2.5));
        assert_eq!(parse_experience("NaN"), None);
    }

    // -- session --

    #[test]
    fn new_session_has_create_defaults() {
        let session = FormSession::new(None);
        assert_eq!(session.values(), &InterviewForm::default());
        assert_eq!(session.title(), "Create a new mock interview");
        assert_eq!(session.action_label(), "Create");
        assert_eq!(session.state(), FormState::Idle);
    }

    #[test]
    fn session_prepopulates_from_record() {
        let rec = record("doc_1", "Platform Engineer");
        let session = FormSession::new(Some(&rec));
        assert_eq!(session.values().position, "Platform Engineer");
        assert_eq!(session.title(), "Platform Engineer");
        assert_eq!(session.action_label(), "Save Changes");
    }

    #[test]
    fn set_field_validates_only_that_field() {
        let mut session = FormSession::new(None);
        session.set_field(FormField::Position, "").unwrap();
        assert!(session.field_errors().contains_key("position"));
        assert!(!session.field_errors().contains_key("description"));

        session.set_field(FormField::Position, "SRE").unwrap();
        assert!(!session.field_errors().contains_key("position"));
    }

    #[test]
    fn set_field_reports_unparseable_experience() {
        let mut session = FormSession::new(None);
        session.set_field(FormField::Experience, "abc").unwrap();
        assert_eq!(
            session.field_errors()["experience"],
            vec![MSG_EXPERIENCE_INVALID.to_string()]
        );
    }

    #[test]
    fn reset_happens_only_when_identity_changes() {
        let first = record("doc_1", "Platform Engineer");
        let mut session = FormSession::new(Some(&first));
        session.set_field(FormField::Position, "Edited").unwrap();

        assert!(!session.reset_for(&first));
        assert_eq!(session.values().position, "Edited");

        let second = record("doc_2", "Data Engineer");
        assert!(session.reset_for(&second));
        assert_eq!(session.values().position, "Data Engineer");
        assert_eq!(session.editing(), Some("doc_2"));
    }

    #[test]
    fn begin_submit_rejects_invalid_form() {
        let mut session = FormSession::new(None);
        let rejection = session.begin_submit().unwrap_err();
        assert_matches!(rejection, SubmitRejection::Invalid(errors) if errors.len() == 3);
        assert_eq!(session.state(), FormState::Idle);
    }

    #[test]
    fn submitting_locks_inputs_until_settled() {
        let mut session = FormSession::with_values(valid_form(), None);
        session.begin_submit().unwrap();
        assert_eq!(session.state(), FormState::Submitting);
        assert!(session.is_locked());

        assert_matches!(session.begin_submit(), Err(SubmitRejection::Busy));
        assert_matches!(
            session.set_field(FormField::Position, "x"),
            Err(CoreError::Conflict(_))
        );

        session.settle(false);
        assert_eq!(session.state(), FormState::Settled { success: false });
        assert!(!session.is_locked());
        assert!(session.begin_submit().is_ok());
    }
}
