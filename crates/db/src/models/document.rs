//! Employee documents tracked for expiry.

use grua_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use validator::Validate;

/// A row from the `inspected_documents` table.
#[derive(Debug, Clone, FromRow, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InspectedDocument {
    pub id: DbId,
    pub employee_id: DbId,
    pub kind: String,
    pub name: String,
    pub valid_until: Option<Date>,
    pub created_at: Timestamp,
}

/// DTO for registering a document.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocument {
    pub employee_id: DbId,
    pub kind: String,
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    pub valid_until: Option<Date>,
}
