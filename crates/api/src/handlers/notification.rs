//! The caller's notification inbox: document expiry notices, remediation
//! assignments and overdue reminders. Every query is scoped to the
//! authenticated user.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use grua_core::error::CoreError;
use grua_core::expiry::NOTIFICATION_KINDS;
use grua_core::types::DbId;
use grua_db::models::notification::InboxFilter;
use grua_db::repositories::NotificationRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// `GET /notifications?unreadOnly=&kind=&limit=&offset=`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    /// One of the notification kinds, e.g. `remediation_overdue`.
    pub kind: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkedRead {
    pub marked_read: u64,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 100;

/// `?kind=` on `POST /notifications/read-all`.
#[derive(Debug, Deserialize)]
pub struct KindQuery {
    pub kind: Option<String>,
}

/// Reject kinds the engine never produces.
fn checked_kind(kind: Option<String>) -> AppResult<Option<String>> {
    match kind {
        Some(kind) if !NOTIFICATION_KINDS.contains(&kind.as_str()) => {
            Err(AppError::BadRequest(format!(
                "Unknown notification kind '{kind}'. Must be one of: {}",
                NOTIFICATION_KINDS.join(", ")
            )))
        }
        other => Ok(other),
    }
}

/// GET /api/v1/notifications
///
/// The caller's inbox, newest first. An unknown `kind` is a 400.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = InboxFilter {
        unread_only: params.unread_only,
        kind: checked_kind(params.kind)?,
    };
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let notifications =
        NotificationRepo::list_for_user(&state.pool, auth.user_id, &filter, limit, offset).await?;

    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// POST /api/v1/notifications/{id}/read
///
/// Returns 204, or 404 if the notification does not belong to the caller.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let found = NotificationRepo::mark_read(&state.pool, notification_id, auth.user_id).await?;

    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
///
/// With `?kind=` only that kind is cleared, e.g. dismissing every
/// overdue reminder at once.
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<KindQuery>,
) -> AppResult<impl IntoResponse> {
    let kind = checked_kind(params.kind)?;
    let marked_read =
        NotificationRepo::mark_all_read(&state.pool, auth.user_id, kind.as_deref()).await?;
    tracing::debug!(user_id = auth.user_id, marked_read, "Notifications marked read");
    Ok(Json(DataResponse {
        data: MarkedRead { marked_read },
    }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}
