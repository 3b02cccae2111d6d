//! Checklist instance, item response and query models.

use grua_core::checklist::{ResponseCheck, ResponseStatus};
use grua_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use validator::Validate;

use crate::models::remediation::Remediation;

/// A row from the `checklist_instances` table.
#[derive(Debug, Clone, FromRow, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChecklistInstance {
    pub id: DbId,
    pub model_id: DbId,
    pub subject_id: DbId,
    pub site_id: DbId,
    pub inspection_date: Date,
    pub responsible_party_id: DbId,
    pub is_finalized: bool,
    pub finalized_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /checklist-instances`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChecklistInstance {
    pub model_id: DbId,
    pub subject_id: DbId,
    pub site_id: DbId,
    pub date: Date,
    /// Defaults to the authenticated caller when omitted.
    pub responsible_party_id: Option<DbId>,
}

/// Repository input for materialization, with the responsible party resolved.
#[derive(Debug, Clone)]
pub struct MaterializeInstance {
    pub model_id: DbId,
    pub subject_id: DbId,
    pub site_id: DbId,
    pub inspection_date: Date,
    pub responsible_party_id: DbId,
}

/// A materialized draft: the instance plus its response skeleton.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MaterializedInstance {
    #[serde(flatten)]
    pub instance: ChecklistInstance,
    pub responses: Vec<ItemResponse>,
}

/// A row from the `item_responses` table.
#[derive(Debug, Clone, FromRow, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemResponse {
    pub id: DbId,
    pub instance_id: DbId,
    pub item_id: DbId,
    #[sqlx(try_from = "Option<String>")]
    pub status: ResponseStatus,
    pub note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Remediation fields supplied while editing a draft response.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemediationInput {
    #[validate(length(max = 10000, message = "Action plan must not exceed 10000 characters"))]
    pub action_plan: String,
    pub responsible_party_id: Option<DbId>,
    pub due_date: Option<Date>,
}

/// Request body for `PATCH /checklist-instances/{id}/responses/{item_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub status: ResponseStatus,
    #[validate(length(max = 10000, message = "Note must not exceed 10000 characters"))]
    pub note: Option<String>,
    #[validate(nested)]
    pub remediation: Option<RemediationInput>,
}

/// A response joined with its item definition, used for detail views.
#[derive(Debug, Clone, FromRow)]
pub struct ResponseItemRow {
    pub id: DbId,
    pub item_id: DbId,
    pub ordinal: i32,
    pub category: String,
    pub description: String,
    pub is_mandatory: bool,
    pub allows_attachment: bool,
    #[sqlx(try_from = "Option<String>")]
    pub status: ResponseStatus,
    pub note: Option<String>,
    pub updated_at: Timestamp,
}

/// One response in the instance detail view.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ResponseDetail {
    pub id: DbId,
    pub item_id: DbId,
    pub ordinal: i32,
    pub category: String,
    pub description: String,
    pub is_mandatory: bool,
    pub allows_attachment: bool,
    pub status: ResponseStatus,
    pub note: Option<String>,
    pub updated_at: Timestamp,
    pub remediation: Option<Remediation>,
}

impl ResponseDetail {
    pub fn from_parts(row: ResponseItemRow, remediation: Option<Remediation>) -> Self {
        Self {
            id: row.id,
            item_id: row.item_id,
            ordinal: row.ordinal,
            category: row.category,
            description: row.description,
            is_mandatory: row.is_mandatory,
            allows_attachment: row.allows_attachment,
            status: row.status,
            note: row.note,
            updated_at: row.updated_at,
            remediation,
        }
    }
}

/// Full instance with nested responses and remediations.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChecklistInstanceDetail {
    #[serde(flatten)]
    pub instance: ChecklistInstance,
    pub model_name: String,
    pub model_version: i32,
    pub responses: Vec<ResponseDetail>,
}

/// The columns the submission rules need, one row per response.
#[derive(Debug, Clone, FromRow)]
pub struct ResponseCheckRow {
    pub item_id: DbId,
    pub ordinal: i32,
    pub is_mandatory: bool,
    #[sqlx(try_from = "Option<String>")]
    pub status: ResponseStatus,
    /// `None` when no remediation row exists.
    pub action_plan: Option<String>,
}

impl ResponseCheckRow {
    pub fn as_check(&self) -> ResponseCheck<'_> {
        ResponseCheck {
            item_id: self.item_id,
            ordinal: self.ordinal,
            is_mandatory: self.is_mandatory,
            status: self.status,
            action_plan: self.action_plan.as_deref(),
        }
    }
}

/// Filters for the instance listing. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct InstanceFilter {
    pub subject_id: Option<DbId>,
    pub site_id: Option<DbId>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub finalized_only: bool,
}

/// One row of the instance listing.
#[derive(Debug, Clone, FromRow, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InstanceSummary {
    pub id: DbId,
    pub model_id: DbId,
    pub model_name: String,
    pub subject_id: DbId,
    pub site_id: DbId,
    pub inspection_date: Date,
    pub responsible_party_id: DbId,
    pub is_finalized: bool,
    pub finalized_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub total_items: i64,
    pub unset_count: i64,
    pub non_conforming_count: i64,
}

/// A page of instance summaries plus the total matching count.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InstancePage {
    pub data: Vec<InstanceSummary>,
    pub total: i64,
}

/// Crane logbook statistics for one subject.
#[derive(Debug, Clone, FromRow, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubjectStats {
    pub subject_id: DbId,
    pub total_instances: i64,
    pub finalized_instances: i64,
    pub draft_instances: i64,
    pub non_conforming_responses: i64,
    pub open_remediations: i64,
    pub first_inspection: Option<Date>,
    pub last_inspection: Option<Date>,
    pub recent_instances: i64,
}
