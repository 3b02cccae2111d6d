//! Checklist model (template) and item models.

use grua_core::checklist::ItemDefinition;
use grua_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use validator::Validate;

/// A row from the `checklist_models` table.
#[derive(Debug, Clone, FromRow, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChecklistModel {
    pub id: DbId,
    pub site_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub version: i32,
    pub previous_version_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `checklist_items` table.
#[derive(Debug, Clone, FromRow, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChecklistItem {
    pub id: DbId,
    pub model_id: DbId,
    pub ordinal: i32,
    pub category: String,
    pub description: String,
    pub is_mandatory: bool,
    pub allows_attachment: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// A model together with its items, ordered by ordinal.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChecklistModelWithItems {
    #[serde(flatten)]
    pub model: ChecklistModel,
    pub items: Vec<ChecklistItem>,
}

/// One item in a create/revise request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateChecklistItem {
    #[validate(range(min = 1, message = "Ordinal must be a positive integer"))]
    pub ordinal: i32,
    #[validate(length(min = 1, max = 1000, message = "Category must be 1-1000 characters"))]
    pub category: String,
    #[validate(length(min = 1, max = 1000, message = "Description must be 1-1000 characters"))]
    pub description: String,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub allows_attachment: bool,
}

/// DTO for creating a checklist model with its items.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateChecklistModel {
    pub site_id: DbId,
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "At least one item is required"), nested)]
    pub items: Vec<CreateChecklistItem>,
}

/// DTO for replacing the item set of a model.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviseChecklistItems {
    #[validate(length(min = 1, message = "At least one item is required"), nested)]
    pub items: Vec<CreateChecklistItem>,
}

/// Borrow the parts of each item that the core rules check.
pub fn item_definitions(items: &[CreateChecklistItem]) -> Vec<ItemDefinition<'_>> {
    items
        .iter()
        .map(|i| ItemDefinition {
            ordinal: i.ordinal,
            category: &i.category,
            description: &i.description,
        })
        .collect()
}

/// Outcome of a model revision.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ModelRevision {
    /// The model now carrying the new item set.
    pub model: ChecklistModelWithItems,
    /// `true` when a new version row was created because the old one was
    /// already referenced by instances.
    pub new_version: bool,
}
