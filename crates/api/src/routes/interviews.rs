//! Route definitions for mock interviews.
//!
//! Mounted at `/interviews` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::interviews;
use crate::state::AppState;

/// Interview routes.
///
/// ```text
/// POST   /                  -> create_interview
/// GET    /                  -> list_interviews
/// GET    /new/form          -> new_form
/// GET    /{id}              -> get_interview
/// PUT    /{id}              -> update_interview
/// GET    /{id}/form         -> edit_form
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(interviews::create_interview).get(interviews::list_interviews),
        )
        .route("/new/form", get(interviews::new_form))
        .route(
            "/{id}",
            get(interviews::get_interview).put(interviews::update_interview),
        )
        .route("/{id}/form", get(interviews::edit_form))
}
