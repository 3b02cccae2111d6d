//! Route definitions for the `/documents` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::document;
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// GET    /?employeeId=              -> list_documents
/// POST   /                          -> create_document
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(document::list_documents).post(document::create_document),
    )
}
