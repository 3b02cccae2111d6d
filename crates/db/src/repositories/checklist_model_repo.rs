//! Repository for the `checklist_models` and `checklist_items` tables.

use futures::stream::BoxStream;
use grua_core::error::CoreError;
use grua_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::LifecycleError;
use crate::models::checklist_model::{
    ChecklistItem, ChecklistModel, ChecklistModelWithItems, CreateChecklistItem,
    CreateChecklistModel, ModelRevision,
};

/// Column list for `checklist_models` queries.
const MODEL_COLUMNS: &str = "id, site_id, name, description, is_active, version, \
    previous_version_id, created_at, updated_at";

/// Column list for `checklist_items` queries.
const ITEM_COLUMNS: &str = "id, model_id, ordinal, category, description, is_mandatory, \
    allows_attachment, is_active, created_at";

/// Provides CRUD and versioning operations for checklist models.
pub struct ChecklistModelRepo;

impl ChecklistModelRepo {
    /// Create a model and all of its items in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateChecklistModel,
    ) -> Result<ChecklistModelWithItems, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO checklist_models (site_id, name, description) \
             VALUES ($1, $2, $3) \
             RETURNING {MODEL_COLUMNS}"
        );
        let model = sqlx::query_as::<_, ChecklistModel>(&query)
            .bind(input.site_id)
            .bind(input.name.trim())
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        let items = Self::insert_items(&mut tx, model.id, &input.items).await?;

        tx.commit().await?;
        Ok(ChecklistModelWithItems { model, items })
    }

    /// Find a model by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ChecklistModel>, sqlx::Error> {
        let query = format!("SELECT {MODEL_COLUMNS} FROM checklist_models WHERE id = $1");
        sqlx::query_as::<_, ChecklistModel>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a model with every item it has ever had, active or not.
    pub async fn find_with_items(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ChecklistModelWithItems>, sqlx::Error> {
        let Some(model) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let items = Self::list_items(pool, id, false).await?;
        Ok(Some(ChecklistModelWithItems { model, items }))
    }

    /// List a model's items ordered by ordinal.
    pub async fn list_items(
        pool: &PgPool,
        model_id: DbId,
        active_only: bool,
    ) -> Result<Vec<ChecklistItem>, sqlx::Error> {
        let filter = if active_only {
            "AND is_active = true"
        } else {
            ""
        };
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM checklist_items \
             WHERE model_id = $1 {filter} \
             ORDER BY ordinal ASC"
        );
        sqlx::query_as::<_, ChecklistItem>(&query)
            .bind(model_id)
            .fetch_all(pool)
            .await
    }

    /// Stream the active models of a site, ordered by name.
    ///
    /// The stream reads from a server-side cursor; each call starts a fresh
    /// query, so models deactivated in between are not yielded again.
    pub fn stream_active_for_site(
        pool: &PgPool,
        site_id: DbId,
    ) -> BoxStream<'_, Result<ChecklistModel, sqlx::Error>> {
        sqlx::query_as::<_, ChecklistModel>(
            "SELECT id, site_id, name, description, is_active, version, \
                    previous_version_id, created_at, updated_at \
             FROM checklist_models \
             WHERE site_id = $1 AND is_active = true \
             ORDER BY name ASC, id ASC",
        )
        .bind(site_id)
        .fetch(pool)
    }

    /// List every model of a site, including inactive and superseded versions.
    pub async fn list_all_for_site(
        pool: &PgPool,
        site_id: DbId,
    ) -> Result<Vec<ChecklistModel>, sqlx::Error> {
        let query = format!(
            "SELECT {MODEL_COLUMNS} FROM checklist_models \
             WHERE site_id = $1 \
             ORDER BY name ASC, version DESC, id ASC"
        );
        sqlx::query_as::<_, ChecklistModel>(&query)
            .bind(site_id)
            .fetch_all(pool)
            .await
    }

    /// Deactivate a model. Idempotent.
    ///
    /// Returns `false` if no model with this ID exists. Existing instances
    /// are unaffected.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE checklist_models SET is_active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate one item so future instances omit it. Idempotent.
    ///
    /// Returns `false` if the item does not exist on this model.
    pub async fn deactivate_item(
        pool: &PgPool,
        model_id: DbId,
        item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE checklist_items SET is_active = false WHERE id = $1 AND model_id = $2",
        )
        .bind(item_id)
        .bind(model_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE checklist_models SET updated_at = NOW() WHERE id = $1")
            .bind(model_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Replace the item set of a model.
    ///
    /// An unreferenced model is edited in place. Once any instance refers to
    /// the model its items are frozen: a new version row is created carrying
    /// the new items, linked back via `previous_version_id`, and the old
    /// version is deactivated. Existing instances keep pointing at the old
    /// version and its items.
    pub async fn revise(
        pool: &PgPool,
        model_id: DbId,
        items: &[CreateChecklistItem],
    ) -> Result<ModelRevision, LifecycleError> {
        let mut tx = pool.begin().await?;

        // Blocks concurrent materialization (which takes FOR SHARE) until
        // the revision commits.
        let query =
            format!("SELECT {MODEL_COLUMNS} FROM checklist_models WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, ChecklistModel>(&query)
            .bind(model_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ChecklistModel",
                id: model_id,
            })?;

        if !current.is_active {
            return Err(CoreError::Validation(format!(
                "Checklist model {model_id} is inactive and cannot be revised"
            ))
            .into());
        }

        let revision = if Self::is_referenced(&mut tx, model_id).await? {
            let query = format!(
                "INSERT INTO checklist_models \
                     (site_id, name, description, version, previous_version_id) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING {MODEL_COLUMNS}"
            );
            let next = sqlx::query_as::<_, ChecklistModel>(&query)
                .bind(current.site_id)
                .bind(&current.name)
                .bind(&current.description)
                .bind(current.version + 1)
                .bind(current.id)
                .fetch_one(&mut *tx)
                .await?;

            sqlx::query(
                "UPDATE checklist_models SET is_active = false, updated_at = NOW() WHERE id = $1",
            )
            .bind(current.id)
            .execute(&mut *tx)
            .await?;

            let items = Self::insert_items(&mut tx, next.id, items).await?;
            tracing::info!(
                previous_id = current.id,
                model_id = next.id,
                version = next.version,
                "Checklist model revised as new version",
            );
            ModelRevision {
                model: ChecklistModelWithItems { model: next, items },
                new_version: true,
            }
        } else {
            sqlx::query("DELETE FROM checklist_items WHERE model_id = $1")
                .bind(model_id)
                .execute(&mut *tx)
                .await?;

            let items = Self::insert_items(&mut tx, model_id, items).await?;

            let query = format!(
                "UPDATE checklist_models SET updated_at = NOW() WHERE id = $1 \
                 RETURNING {MODEL_COLUMNS}"
            );
            let model = sqlx::query_as::<_, ChecklistModel>(&query)
                .bind(model_id)
                .fetch_one(&mut *tx)
                .await?;
            ModelRevision {
                model: ChecklistModelWithItems { model, items },
                new_version: false,
            }
        };

        tx.commit().await?;
        Ok(revision)
    }

    /// Whether any checklist instance has been materialized from this model.
    async fn is_referenced(conn: &mut PgConnection, model_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM checklist_instances WHERE model_id = $1)",
        )
        .bind(model_id)
        .fetch_one(conn)
        .await
    }

    async fn insert_items(
        conn: &mut PgConnection,
        model_id: DbId,
        items: &[CreateChecklistItem],
    ) -> Result<Vec<ChecklistItem>, sqlx::Error> {
        let query = format!(
            "INSERT INTO checklist_items \
                 (model_id, ordinal, category, description, is_mandatory, allows_attachment) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ITEM_COLUMNS}"
        );

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, ChecklistItem>(&query)
                .bind(model_id)
                .bind(item.ordinal)
                .bind(item.category.trim())
                .bind(item.description.trim())
                .bind(item.mandatory)
                .bind(item.allows_attachment)
                .fetch_one(&mut *conn)
                .await?;
            created.push(row);
        }
        created.sort_by_key(|i| i.ordinal);
        Ok(created)
    }
}
