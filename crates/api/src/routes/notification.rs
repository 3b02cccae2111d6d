//! `/notifications`: the per-user inbox fed by finalization and the
//! expiry scan.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /?unreadOnly=&kind=   -> list_notifications
/// GET    /unread-count         -> unread_count
/// POST   /read-all             -> mark_all_read
/// POST   /{id}/read            -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list_notifications))
        .route("/unread-count", get(notification::unread_count))
        .route("/read-all", post(notification::mark_all_read))
        .route("/{id}/read", post(notification::mark_read))
}
