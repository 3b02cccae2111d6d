//! Route definitions for the `/checklist-models` resource.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::checklist_model;
use crate::state::AppState;

/// Routes mounted at `/checklist-models`.
///
/// ```text
/// GET    /                          -> list_models
/// POST   /                          -> create_model
/// GET    /{id}                      -> get_model
/// DELETE /{id}                      -> deactivate_model
/// PUT    /{id}/items                -> revise_items
/// DELETE /{id}/items/{item_id}      -> deactivate_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(checklist_model::list_models).post(checklist_model::create_model),
        )
        .route(
            "/{id}",
            get(checklist_model::get_model).delete(checklist_model::deactivate_model),
        )
        .route("/{id}/items", put(checklist_model::revise_items))
        .route(
            "/{id}/items/{item_id}",
            delete(checklist_model::deactivate_item),
        )
}
