//! Handlers for the `/documents` resource (employee certificates and
//! admission documents tracked for expiry).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use grua_core::expiry::validate_document_kind;
use grua_core::types::DbId;
use grua_db::models::document::CreateDocument;
use grua_db::repositories::DocumentRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /documents`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    pub employee_id: DbId,
}

/// POST /api/v1/documents
pub async fn create_document(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDocument>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_document_kind(&input.kind)?;

    let document = DocumentRepo::create(&state.pool, &input).await?;

    tracing::info!(
        document_id = document.id,
        employee_id = document.employee_id,
        user_id = auth.user_id,
        "Document registered",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /api/v1/documents?employeeId=
pub async fn list_documents(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DocumentQuery>,
) -> AppResult<impl IntoResponse> {
    let documents = DocumentRepo::list_for_employee(&state.pool, params.employee_id).await?;
    Ok(Json(DataResponse { data: documents }))
}
