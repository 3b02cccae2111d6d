//! Handlers for the `/checklist-instances` resource and subject statistics.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use grua_core::error::CoreError;
use grua_core::types::{Date, DbId};
use grua_db::models::checklist_instance::{
    CreateChecklistInstance, InstanceFilter, MaterializeInstance, UpdateResponse,
};
use grua_db::repositories::ChecklistInstanceRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /checklist-instances`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceListQuery {
    pub subject_id: Option<DbId>,
    pub site_id: Option<DbId>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub finalized_only: Option<bool>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Query parameters for `GET /subjects/{id}/checklist-stats`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    /// Reference date for the "recent" window. Defaults to today (UTC).
    pub as_of: Option<Date>,
}

fn instance_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ChecklistInstance",
        id,
    })
}

/// POST /api/v1/checklist-instances
///
/// Materialize a draft from a model. The responsible party defaults to the
/// caller. Returns 201 with the instance and its unset responses.
pub async fn create_instance(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateChecklistInstance>,
) -> AppResult<impl IntoResponse> {
    let materialize = MaterializeInstance {
        model_id: input.model_id,
        subject_id: input.subject_id,
        site_id: input.site_id,
        inspection_date: input.date,
        responsible_party_id: input.responsible_party_id.unwrap_or(auth.user_id),
    };

    let draft = ChecklistInstanceRepo::materialize(&state.pool, &materialize).await?;

    tracing::info!(
        instance_id = draft.instance.id,
        model_id = draft.instance.model_id,
        subject_id = draft.instance.subject_id,
        inspection_date = %draft.instance.inspection_date,
        user_id = auth.user_id,
        "Checklist instance created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: draft })))
}

/// GET /api/v1/checklist-instances
///
/// Filtered, paginated listing. Returns `{ data, total }`.
pub async fn list_instances(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<InstanceListQuery>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = PageParams {
        page: params.page,
        page_size: params.page_size,
    }
    .limit_offset();

    let filter = InstanceFilter {
        subject_id: params.subject_id,
        site_id: params.site_id,
        date_from: params.date_from,
        date_to: params.date_to,
        finalized_only: params.finalized_only.unwrap_or(false),
    };

    let page = ChecklistInstanceRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(page))
}

/// GET /api/v1/checklist-instances/{id}
///
/// Instance detail with responses ordered by item ordinal.
pub async fn get_instance(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = ChecklistInstanceRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| instance_not_found(id))?;

    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/v1/checklist-instances/{id}/violations
///
/// What would block finalization right now. Empty when ready to submit.
pub async fn get_violations(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let violations = ChecklistInstanceRepo::violations(&state.pool, id)
        .await?
        .ok_or_else(|| instance_not_found(id))?;

    Ok(Json(DataResponse { data: violations }))
}

/// PATCH /api/v1/checklist-instances/{id}/responses/{item_id}
///
/// Record a status, note and optional remediation on a draft.
pub async fn update_response(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateResponse>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let response = ChecklistInstanceRepo::update_response(&state.pool, id, item_id, &input).await?;

    tracing::debug!(
        instance_id = id,
        item_id,
        status = ?response.status,
        has_remediation = response.remediation.is_some(),
        user_id = auth.user_id,
        "Checklist response updated",
    );

    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/checklist-instances/{id}/finalize
///
/// Submit a draft. Returns 400 with every violation if it is not ready.
pub async fn finalize(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let instance = match ChecklistInstanceRepo::finalize(&state.pool, id).await {
        Ok(instance) => instance,
        Err(err) => {
            if let Some(CoreError::Violations(violations)) = err.as_core() {
                tracing::info!(
                    instance_id = id,
                    violations = violations.len(),
                    user_id = auth.user_id,
                    "Checklist finalization refused",
                );
            }
            return Err(err.into());
        }
    };

    tracing::info!(instance_id = id, user_id = auth.user_id, "Checklist finalized");
    Ok(Json(DataResponse { data: instance }))
}

/// GET /api/v1/subjects/{subject_id}/checklist-stats
///
/// Inspection logbook statistics for one crane.
pub async fn subject_stats(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(subject_id): Path<DbId>,
    Query(params): Query<StatsQuery>,
) -> AppResult<impl IntoResponse> {
    let as_of = params.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let stats = ChecklistInstanceRepo::subject_stats(&state.pool, subject_id, as_of).await?;
    Ok(Json(DataResponse { data: stats }))
}
