//! Handlers for the `/checklist-models` resource.
//!
//! Reads are open to any authenticated user; mutations require
//! [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use futures::TryStreamExt;
use grua_core::checklist::{validate_item_definitions, validate_model_name};
use grua_core::error::CoreError;
use grua_core::types::DbId;
use grua_db::models::checklist_model::{
    item_definitions, CreateChecklistModel, ReviseChecklistItems,
};
use grua_db::repositories::ChecklistModelRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /checklist-models`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelListQuery {
    pub site_id: DbId,
    /// When `false`, inactive and superseded models are included. Defaults to `true`.
    pub active: Option<bool>,
}

/// POST /api/v1/checklist-models
///
/// Create a model with its items. Returns 201.
pub async fn create_model(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateChecklistModel>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_model_name(&input.name)?;
    validate_item_definitions(&item_definitions(&input.items))?;

    let model = ChecklistModelRepo::create(&state.pool, &input).await?;

    tracing::info!(
        model_id = model.model.id,
        site_id = model.model.site_id,
        items = model.items.len(),
        user_id = admin.user_id,
        "Checklist model created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: model })))
}

/// GET /api/v1/checklist-models?siteId=&active=
///
/// List a site's models ordered by name.
pub async fn list_models(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ModelListQuery>,
) -> AppResult<impl IntoResponse> {
    let models = if params.active.unwrap_or(true) {
        ChecklistModelRepo::stream_active_for_site(&state.pool, params.site_id)
            .try_collect::<Vec<_>>()
            .await?
    } else {
        ChecklistModelRepo::list_all_for_site(&state.pool, params.site_id).await?
    };

    Ok(Json(DataResponse { data: models }))
}

/// GET /api/v1/checklist-models/{id}
///
/// Get a model with all of its items ordered by ordinal.
pub async fn get_model(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let model = ChecklistModelRepo::find_with_items(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ChecklistModel",
            id,
        }))?;

    Ok(Json(DataResponse { data: model }))
}

/// PUT /api/v1/checklist-models/{id}/items
///
/// Replace the item set. If instances already reference the model a new
/// version is created and returned instead.
pub async fn revise_items(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviseChecklistItems>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_item_definitions(&item_definitions(&input.items))?;

    let revision = ChecklistModelRepo::revise(&state.pool, id, &input.items).await?;

    tracing::info!(
        model_id = id,
        new_model_id = revision.model.model.id,
        new_version = revision.new_version,
        user_id = admin.user_id,
        "Checklist model items revised",
    );

    Ok(Json(DataResponse { data: revision }))
}

/// DELETE /api/v1/checklist-models/{id}
///
/// Deactivate a model. Existing instances are unaffected. Returns 204.
pub async fn deactivate_model(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ChecklistModelRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ChecklistModel",
            id,
        }));
    }

    tracing::info!(model_id = id, user_id = admin.user_id, "Checklist model deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/checklist-models/{id}/items/{item_id}
///
/// Deactivate one item so future instances omit it. Returns 204.
pub async fn deactivate_item(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if !ChecklistModelRepo::deactivate_item(&state.pool, id, item_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ChecklistItem",
            id: item_id,
        }));
    }

    tracing::info!(
        model_id = id,
        item_id,
        user_id = admin.user_id,
        "Checklist item deactivated",
    );
    Ok(StatusCode::NO_CONTENT)
}
