//! Non-conformance remediation models.

use grua_core::remediation::ResolutionStatus;
use grua_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;

/// A row from the `remediations` table.
#[derive(Debug, Clone, FromRow, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Remediation {
    pub id: DbId,
    pub response_id: DbId,
    pub action_plan: String,
    pub responsible_party_id: Option<DbId>,
    pub due_date: Option<Date>,
    #[sqlx(try_from = "String")]
    pub resolution_status: ResolutionStatus,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An open remediation with the context needed by tracking views.
#[derive(Debug, Clone, FromRow, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RemediationTask {
    pub id: DbId,
    pub response_id: DbId,
    pub action_plan: String,
    pub responsible_party_id: Option<DbId>,
    pub due_date: Option<Date>,
    #[sqlx(try_from = "String")]
    pub resolution_status: ResolutionStatus,
    pub instance_id: DbId,
    pub subject_id: DbId,
    pub site_id: DbId,
    pub inspection_date: Date,
    pub item_id: DbId,
    pub item_description: String,
    pub note: Option<String>,
}

/// A row from the `remediation_events` table.
#[derive(Debug, Clone, FromRow, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RemediationEvent {
    pub id: DbId,
    pub remediation_id: DbId,
    #[sqlx(try_from = "String")]
    pub from_status: ResolutionStatus,
    #[sqlx(try_from = "String")]
    pub to_status: ResolutionStatus,
    pub actor_id: DbId,
    pub created_at: Timestamp,
}

/// Request body for `PATCH /remediations/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResolution {
    pub resolution_status: ResolutionStatus,
}
