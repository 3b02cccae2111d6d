//! Route definitions for the `/remediations` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::remediation;
use crate::state::AppState;

/// Routes mounted at `/remediations`.
///
/// ```text
/// GET    /open                      -> list_open
/// GET    /overdue                   -> list_overdue
/// PATCH  /{id}                      -> update_resolution
/// GET    /{id}/history              -> history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/open", get(remediation::list_open))
        .route("/overdue", get(remediation::list_overdue))
        .route("/{id}", patch(remediation::update_resolution))
        .route("/{id}/history", get(remediation::history))
}
