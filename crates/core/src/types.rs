use std::collections::BTreeMap;

/// Document keys are opaque strings assigned by the store.
pub type InterviewId = String;

/// User identifiers come from the identity provider's `sub` claim.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Field name (wire form, e.g. `techStack`) to its validation messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;
