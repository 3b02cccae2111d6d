pub mod checklist_instance;
pub mod checklist_model;
pub mod document;
pub mod health;
pub mod notification;
pub mod remediation;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /checklist-models                                 list, create (create: admin)
/// /checklist-models/{id}                            get, deactivate (admin)
/// /checklist-models/{id}/items                      revise items (PUT, admin)
/// /checklist-models/{id}/items/{item_id}            deactivate item (admin)
///
/// /checklist-instances                              list, materialize
/// /checklist-instances/{id}                         detail
/// /checklist-instances/{id}/violations              pending violations
/// /checklist-instances/{id}/responses/{item_id}     update response (PATCH)
/// /checklist-instances/{id}/finalize                finalize (POST)
///
/// /remediations/open                                open for a party
/// /remediations/overdue                             overdue as of a date
/// /remediations/{id}                                update resolution (PATCH)
/// /remediations/{id}/history                        status history
///
/// /sites/{site_id}/remediations                     open remediations at a site
/// /subjects/{subject_id}/checklist-stats            crane logbook statistics
///
/// /documents                                        list, register
///
/// /notifications                                    list
/// /notifications/read-all                           mark all read (POST)
/// /notifications/unread-count                       unread count
/// /notifications/{id}/read                          mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/checklist-models", checklist_model::router())
        .nest("/checklist-instances", checklist_instance::router())
        .nest("/remediations", remediation::router())
        .route(
            "/sites/{site_id}/remediations",
            get(handlers::remediation::list_open_by_site),
        )
        .route(
            "/subjects/{subject_id}/checklist-stats",
            get(handlers::checklist_instance::subject_stats),
        )
        .nest("/documents", document::router())
        .nest("/notifications", notification::router())
}
