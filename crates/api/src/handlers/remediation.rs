//! Handlers for the `/remediations` resource.
//!
//! Remediations stay editable after their checklist is finalized.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use futures::TryStreamExt;
use grua_core::error::CoreError;
use grua_core::types::{Date, DbId};
use grua_db::models::remediation::UpdateResolution;
use grua_db::repositories::RemediationRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /remediations/open`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenQuery {
    /// Defaults to the authenticated caller.
    pub responsible_party_id: Option<DbId>,
}

/// Query parameters for `GET /remediations/overdue`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueQuery {
    /// Defaults to today (UTC).
    pub as_of: Option<Date>,
}

/// PATCH /api/v1/remediations/{id}
///
/// Move a remediation through its resolution lifecycle. The caller is
/// recorded as the actor.
pub async fn update_resolution(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateResolution>,
) -> AppResult<impl IntoResponse> {
    let remediation =
        RemediationRepo::update_resolution(&state.pool, id, input.resolution_status, auth.user_id)
            .await?;

    Ok(Json(DataResponse { data: remediation }))
}

/// GET /api/v1/remediations/{id}/history
pub async fn history(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if RemediationRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Remediation",
            id,
        }));
    }

    let events = RemediationRepo::history(&state.pool, id).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/remediations/open?responsiblePartyId=
///
/// Open remediations for a party, earliest due first.
pub async fn list_open(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<OpenQuery>,
) -> AppResult<impl IntoResponse> {
    let party = params.responsible_party_id.unwrap_or(auth.user_id);
    let tasks: Vec<_> = RemediationRepo::stream_open_by_responsible(&state.pool, party)
        .try_collect()
        .await?;

    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/remediations/overdue?asOf=
pub async fn list_overdue(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<OverdueQuery>,
) -> AppResult<impl IntoResponse> {
    let as_of = params.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let tasks: Vec<_> = RemediationRepo::stream_overdue(&state.pool, as_of)
        .try_collect()
        .await?;

    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/sites/{site_id}/remediations
///
/// Open non-conformances raised at a site.
pub async fn list_open_by_site(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tasks = RemediationRepo::list_open_by_site(&state.pool, site_id).await?;
    Ok(Json(DataResponse { data: tasks }))
}
