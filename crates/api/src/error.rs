use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use grua_core::error::CoreError;
use grua_db::LifecycleError;
use serde_json::json;

/// Error returned by every handler.
///
/// Renders as `{"error": <message>, "code": <CODE>}`; finalization refusals
/// add a `violations` array so the client can highlight each offending row.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Core(core) => AppError::Core(core),
            LifecycleError::Database(db) => AppError::Database(db),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

/// Message shown for anything that must not leak internals.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

type ErrorParts = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => core_error_parts(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({ "error": message, "code": code });
        if let AppError::Core(CoreError::Violations(violations)) = &self {
            body["violations"] = json!(violations);
        }

        (status, Json(body)).into_response()
    }
}

fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

fn core_error_parts(err: &CoreError) -> ErrorParts {
    let (status, code) = match err {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        CoreError::Validation(_) | CoreError::Violations(_) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        }
        CoreError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
        CoreError::AlreadyFinalized(_) => (StatusCode::CONFLICT, "ALREADY_FINALIZED"),
        CoreError::InvalidTransition(_) => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
        CoreError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        CoreError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            return internal();
        }
    };

    let message = match err {
        CoreError::Validation(msg)
        | CoreError::Conflict(msg)
        | CoreError::AlreadyFinalized(msg)
        | CoreError::InvalidTransition(msg)
        | CoreError::Unauthorized(msg)
        | CoreError::Forbidden(msg) => msg.clone(),
        other => other.to_string(),
    };

    (status, code, message)
}

/// Map sqlx failures: missing rows are 404, `uq_*` unique violations are
/// 409, the rest is a logged and sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err)
            if db_err.is_unique_violation()
                && db_err.constraint().is_some_and(|c| c.starts_with("uq_")) =>
        {
            let constraint = db_err.constraint().unwrap_or_default();
            (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
