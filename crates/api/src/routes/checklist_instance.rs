//! Route definitions for the `/checklist-instances` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::checklist_instance;
use crate::state::AppState;

/// Routes mounted at `/checklist-instances`.
///
/// ```text
/// GET    /                              -> list_instances
/// POST   /                              -> create_instance
/// GET    /{id}                          -> get_instance
/// GET    /{id}/violations               -> get_violations
/// PATCH  /{id}/responses/{item_id}      -> update_response
/// POST   /{id}/finalize                 -> finalize
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(checklist_instance::list_instances).post(checklist_instance::create_instance),
        )
        .route("/{id}", get(checklist_instance::get_instance))
        .route("/{id}/violations", get(checklist_instance::get_violations))
        .route(
            "/{id}/responses/{item_id}",
            patch(checklist_instance::update_response),
        )
        .route("/{id}/finalize", post(checklist_instance::finalize))
}
