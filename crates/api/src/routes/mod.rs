pub mod health;
pub mod interviews;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /interviews                      list, create
/// /interviews/new/form             empty authoring form
/// /interviews/{id}                 get, update
/// /interviews/{id}/form            pre-populated authoring form
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/interviews", interviews::router())
}
