//! Repository for `checklist_instances` and their `item_responses`.
//!
//! Every mutation of a draft locks the instance row (`FOR UPDATE`) before
//! checking `is_finalized`, so an edit can never interleave with a
//! concurrent finalization of the same instance.

use std::collections::HashMap;

use grua_core::checklist::{
    validate_due_date, validate_remediation_allowed, validate_submission, ResponseStatus,
    Violation,
};
use grua_core::error::CoreError;
use grua_core::expiry::{assigned_dedup_key, NOTIFICATION_REMEDIATION_ASSIGNED, RECENT_WINDOW_DAYS};
use grua_core::types::{Date, DbId};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::error::LifecycleError;
use crate::models::checklist_instance::{
    ChecklistInstance, ChecklistInstanceDetail, InstanceFilter, InstancePage, InstanceSummary,
    ItemResponse, MaterializeInstance, MaterializedInstance, ResponseCheckRow, ResponseDetail,
    ResponseItemRow, SubjectStats, UpdateResponse,
};
use crate::models::checklist_model::ChecklistModel;
use crate::models::notification::NewNotification;
use crate::models::remediation::Remediation;
use crate::repositories::NotificationRepo;

/// Column list for `checklist_instances` queries.
const COLUMNS: &str = "id, model_id, subject_id, site_id, inspection_date, \
    responsible_party_id, is_finalized, finalized_at, created_at, updated_at";

/// Column list for `item_responses` queries, prefixed with `r.`.
const RESPONSE_COLUMNS: &str =
    "r.id, r.instance_id, r.item_id, r.status, r.note, r.created_at, r.updated_at";

/// Column list for `remediations` queries, prefixed with `rem.`.
const REMEDIATION_COLUMNS: &str = "rem.id, rem.response_id, rem.action_plan, \
    rem.responsible_party_id, rem.due_date, rem.resolution_status, rem.resolved_at, \
    rem.created_at, rem.updated_at";

/// Responses joined with their item definitions, prefixed with `r.`/`i.`.
const RESPONSE_ITEM_COLUMNS: &str = "r.id, r.item_id, i.ordinal, i.category, i.description, \
    i.is_mandatory, i.allows_attachment, r.status, r.note, r.updated_at";

/// Shared WHERE clause for the listing and its count.
///
/// `$1` subject, `$2` site, `$3` date from, `$4` date to, `$5` finalized only.
const LIST_FILTER: &str = "($1::BIGINT IS NULL OR ci.subject_id = $1) \
    AND ($2::BIGINT IS NULL OR ci.site_id = $2) \
    AND ($3::DATE IS NULL OR ci.inspection_date >= $3) \
    AND ($4::DATE IS NULL OR ci.inspection_date <= $4) \
    AND (NOT $5 OR ci.is_finalized)";

#[derive(Debug, FromRow)]
struct AssignedRemediation {
    id: DbId,
    responsible_party_id: DbId,
    action_plan: String,
    item_description: String,
}

/// Provides materialization, editing, finalization and queries for
/// checklist instances.
pub struct ChecklistInstanceRepo;

impl ChecklistInstanceRepo {
    /// Create a draft instance from a model, with one unset response per
    /// currently active item.
    ///
    /// Fails with `Conflict` if an instance already exists for the same
    /// model, subject and date.
    pub async fn materialize(
        pool: &PgPool,
        input: &MaterializeInstance,
    ) -> Result<MaterializedInstance, LifecycleError> {
        let mut tx = pool.begin().await?;

        // FOR SHARE keeps a concurrent revision from swapping items out
        // underneath us.
        let model = sqlx::query_as::<_, ChecklistModel>(
            "SELECT id, site_id, name, description, is_active, version, \
                    previous_version_id, created_at, updated_at \
             FROM checklist_models WHERE id = $1 FOR SHARE",
        )
        .bind(input.model_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ChecklistModel",
            id: input.model_id,
        })?;

        if !model.is_active {
            return Err(CoreError::Validation(format!(
                "Checklist model {} is inactive",
                model.id
            ))
            .into());
        }

        if model.site_id != input.site_id {
            return Err(CoreError::Validation(format!(
                "Checklist model {} belongs to site {}, not site {}",
                model.id, model.site_id, input.site_id
            ))
            .into());
        }

        let item_ids: Vec<DbId> = sqlx::query_scalar(
            "SELECT id FROM checklist_items \
             WHERE model_id = $1 AND is_active = true \
             ORDER BY ordinal ASC",
        )
        .bind(model.id)
        .fetch_all(&mut *tx)
        .await?;

        if item_ids.is_empty() {
            return Err(CoreError::Validation(format!(
                "Checklist model {} has no active items",
                model.id
            ))
            .into());
        }

        let query = format!(
            "INSERT INTO checklist_instances \
                 (model_id, subject_id, site_id, inspection_date, responsible_party_id) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_checklist_instances_model_subject_date DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let instance = sqlx::query_as::<_, ChecklistInstance>(&query)
            .bind(model.id)
            .bind(input.subject_id)
            .bind(input.site_id)
            .bind(input.inspection_date)
            .bind(input.responsible_party_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                CoreError::Conflict(format!(
                    "A checklist from model {} already exists for subject {} on {}",
                    model.id, input.subject_id, input.inspection_date
                ))
            })?;

        sqlx::query(
            "INSERT INTO item_responses (instance_id, item_id) \
             SELECT $1, item_id FROM UNNEST($2::BIGINT[]) AS item_id",
        )
        .bind(instance.id)
        .bind(&item_ids)
        .execute(&mut *tx)
        .await?;

        let responses = Self::load_responses(&mut tx, instance.id).await?;

        tx.commit().await?;

        tracing::debug!(
            instance_id = instance.id,
            model_id = model.id,
            responses = responses.len(),
            "Checklist instance materialized",
        );

        Ok(MaterializedInstance {
            instance,
            responses,
        })
    }

    /// Find an instance by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ChecklistInstance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM checklist_instances WHERE id = $1");
        sqlx::query_as::<_, ChecklistInstance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List instances matching `filter`, newest inspection first, together
    /// with the total number of matches.
    pub async fn list(
        pool: &PgPool,
        filter: &InstanceFilter,
        limit: i64,
        offset: i64,
    ) -> Result<InstancePage, sqlx::Error> {
        let query = format!(
            "SELECT ci.id, ci.model_id, m.name AS model_name, ci.subject_id, ci.site_id, \
                    ci.inspection_date, ci.responsible_party_id, ci.is_finalized, \
                    ci.finalized_at, ci.created_at, \
                    COUNT(r.id) AS total_items, \
                    COUNT(r.id) FILTER (WHERE r.status IS NULL) AS unset_count, \
                    COUNT(r.id) FILTER (WHERE r.status = 'non_conforming') AS non_conforming_count \
             FROM checklist_instances ci \
             JOIN checklist_models m ON m.id = ci.model_id \
             LEFT JOIN item_responses r ON r.instance_id = ci.id \
             WHERE {LIST_FILTER} \
             GROUP BY ci.id, m.name \
             ORDER BY ci.inspection_date DESC, ci.created_at DESC, ci.id DESC \
             LIMIT $6 OFFSET $7"
        );
        let data = sqlx::query_as::<_, InstanceSummary>(&query)
            .bind(filter.subject_id)
            .bind(filter.site_id)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .bind(filter.finalized_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query =
            format!("SELECT COUNT(*) FROM checklist_instances ci WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(filter.subject_id)
            .bind(filter.site_id)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .bind(filter.finalized_only)
            .fetch_one(pool)
            .await?;

        Ok(InstancePage { data, total })
    }

    /// Load an instance with its responses (ordered by item ordinal) and
    /// each response's remediation.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ChecklistInstanceDetail>, sqlx::Error> {
        let Some(instance) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let (model_name, model_version): (String, i32) =
            sqlx::query_as("SELECT name, version FROM checklist_models WHERE id = $1")
                .bind(instance.model_id)
                .fetch_one(pool)
                .await?;

        let query = format!(
            "SELECT {RESPONSE_ITEM_COLUMNS} \
             FROM item_responses r \
             JOIN checklist_items i ON i.id = r.item_id \
             WHERE r.instance_id = $1 \
             ORDER BY i.ordinal ASC"
        );
        let rows = sqlx::query_as::<_, ResponseItemRow>(&query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        let query = format!(
            "SELECT {REMEDIATION_COLUMNS} \
             FROM remediations rem \
             JOIN item_responses r ON r.id = rem.response_id \
             WHERE r.instance_id = $1"
        );
        let remediations = sqlx::query_as::<_, Remediation>(&query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        let mut by_response: HashMap<DbId, Remediation> = remediations
            .into_iter()
            .map(|rem| (rem.response_id, rem))
            .collect();

        let responses = rows
            .into_iter()
            .map(|row| {
                let remediation = by_response.remove(&row.id);
                ResponseDetail::from_parts(row, remediation)
            })
            .collect();

        Ok(Some(ChecklistInstanceDetail {
            instance,
            model_name,
            model_version,
            responses,
        }))
    }

    /// Evaluate the submission rules against the instance's current state
    /// without changing it. Returns `None` if the instance does not exist.
    pub async fn violations(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Vec<Violation>>, sqlx::Error> {
        if Self::find_by_id(pool, id).await?.is_none() {
            return Ok(None);
        }
        let checks = Self::load_checks(&mut *pool.acquire().await?, id).await?;
        let checks: Vec<_> = checks.iter().map(ResponseCheckRow::as_check).collect();
        Ok(Some(validate_submission(&checks)))
    }

    /// Set the status, note and remediation of one response on a draft.
    ///
    /// A remediation is only accepted alongside `non_conforming`; moving a
    /// response to any other status removes its remediation. When the
    /// remediation's responsible party is omitted it defaults to the
    /// instance's responsible party. A `None` note keeps the stored note.
    pub async fn update_response(
        pool: &PgPool,
        instance_id: DbId,
        item_id: DbId,
        input: &UpdateResponse,
    ) -> Result<ResponseDetail, LifecycleError> {
        validate_remediation_allowed(input.status, input.remediation.is_some())?;

        let mut tx = pool.begin().await?;
        let instance = Self::lock_draft(&mut tx, instance_id).await?;

        if let Some(remediation) = &input.remediation {
            validate_due_date(remediation.due_date, instance.inspection_date)?;
        }

        let response_id: DbId = sqlx::query_scalar(
            "UPDATE item_responses \
             SET status = $3, note = COALESCE($4, note), updated_at = NOW() \
             WHERE instance_id = $1 AND item_id = $2 \
             RETURNING id",
        )
        .bind(instance_id)
        .bind(item_id)
        .bind(input.status.as_db())
        .bind(&input.note)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ItemResponse",
            id: item_id,
        })?;

        match (&input.remediation, input.status) {
            (Some(remediation), _) => {
                sqlx::query(
                    "INSERT INTO remediations \
                         (response_id, action_plan, responsible_party_id, due_date) \
                     VALUES ($1, $2, $3, $4) \
                     ON CONFLICT ON CONSTRAINT uq_remediations_response DO UPDATE SET \
                         action_plan = EXCLUDED.action_plan, \
                         responsible_party_id = EXCLUDED.responsible_party_id, \
                         due_date = EXCLUDED.due_date, \
                         updated_at = NOW()",
                )
                .bind(response_id)
                .bind(remediation.action_plan.trim())
                .bind(
                    remediation
                        .responsible_party_id
                        .unwrap_or(instance.responsible_party_id),
                )
                .bind(remediation.due_date)
                .execute(&mut *tx)
                .await?;
            }
            (None, ResponseStatus::NonConforming) => {}
            (None, _) => {
                sqlx::query("DELETE FROM remediations WHERE response_id = $1")
                    .bind(response_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        sqlx::query("UPDATE checklist_instances SET updated_at = NOW() WHERE id = $1")
            .bind(instance_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {RESPONSE_ITEM_COLUMNS} \
             FROM item_responses r \
             JOIN checklist_items i ON i.id = r.item_id \
             WHERE r.id = $1"
        );
        let row = sqlx::query_as::<_, ResponseItemRow>(&query)
            .bind(response_id)
            .fetch_one(&mut *tx)
            .await?;

        let query =
            format!("SELECT {REMEDIATION_COLUMNS} FROM remediations rem WHERE rem.response_id = $1");
        let remediation = sqlx::query_as::<_, Remediation>(&query)
            .bind(response_id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ResponseDetail::from_parts(row, remediation))
    }

    /// Finalize a draft.
    ///
    /// Runs the submission rules under the instance lock and refuses with
    /// every violation if any remain. On success the instance becomes
    /// read-only and each remediation's responsible party is queued an
    /// assignment notification in the same transaction.
    pub async fn finalize(
        pool: &PgPool,
        instance_id: DbId,
    ) -> Result<ChecklistInstance, LifecycleError> {
        let mut tx = pool.begin().await?;
        Self::lock_draft(&mut tx, instance_id).await?;

        let checks = Self::load_checks(&mut tx, instance_id).await?;
        let checks: Vec<_> = checks.iter().map(ResponseCheckRow::as_check).collect();
        let violations = validate_submission(&checks);
        if !violations.is_empty() {
            return Err(CoreError::Violations(violations).into());
        }

        let query = format!(
            "UPDATE checklist_instances \
             SET is_finalized = true, finalized_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND is_finalized = false \
             RETURNING {COLUMNS}"
        );
        let instance = sqlx::query_as::<_, ChecklistInstance>(&query)
            .bind(instance_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                CoreError::AlreadyFinalized(format!(
                    "Checklist instance {instance_id} is already finalized"
                ))
            })?;

        let assigned = sqlx::query_as::<_, AssignedRemediation>(
            "SELECT rem.id, rem.responsible_party_id, rem.action_plan, \
                    i.description AS item_description \
             FROM remediations rem \
             JOIN item_responses r ON r.id = rem.response_id \
             JOIN checklist_items i ON i.id = r.item_id \
             WHERE r.instance_id = $1 AND rem.responsible_party_id IS NOT NULL \
             ORDER BY i.ordinal ASC",
        )
        .bind(instance_id)
        .fetch_all(&mut *tx)
        .await?;

        for rem in &assigned {
            let notification = NewNotification {
                user_id: rem.responsible_party_id,
                kind: NOTIFICATION_REMEDIATION_ASSIGNED,
                title: format!("Non-conformance assigned: {}", rem.item_description),
                message: format!(
                    "Inspection of {} found a non-conformance. Action plan: {}",
                    instance.inspection_date, rem.action_plan
                ),
                dedup_key: Some(assigned_dedup_key(rem.id)),
            };
            NotificationRepo::insert_deduped(&mut *tx, &notification).await?;
        }

        tx.commit().await?;

        tracing::info!(
            instance_id,
            remediations = assigned.len(),
            "Checklist instance finalized",
        );

        Ok(instance)
    }

    /// Crane logbook statistics for one subject as of `as_of`.
    pub async fn subject_stats(
        pool: &PgPool,
        subject_id: DbId,
        as_of: Date,
    ) -> Result<SubjectStats, sqlx::Error> {
        sqlx::query_as(
            "SELECT $1::BIGINT AS subject_id, \
                    COUNT(*) AS total_instances, \
                    COUNT(*) FILTER (WHERE ci.is_finalized) AS finalized_instances, \
                    COUNT(*) FILTER (WHERE NOT ci.is_finalized) AS draft_instances, \
                    (SELECT COUNT(*) FROM item_responses r \
                       JOIN checklist_instances c ON c.id = r.instance_id \
                      WHERE c.subject_id = $1 AND r.status = 'non_conforming') \
                        AS non_conforming_responses, \
                    (SELECT COUNT(*) FROM remediations rem \
                       JOIN item_responses r ON r.id = rem.response_id \
                       JOIN checklist_instances c ON c.id = r.instance_id \
                      WHERE c.subject_id = $1 \
                        AND rem.resolution_status IN ('pending', 'in_progress')) \
                        AS open_remediations, \
                    MIN(ci.inspection_date) AS first_inspection, \
                    MAX(ci.inspection_date) AS last_inspection, \
                    COUNT(*) FILTER (WHERE ci.inspection_date > $2::DATE - $3::INT \
                                       AND ci.inspection_date <= $2::DATE) \
                        AS recent_instances \
             FROM checklist_instances ci \
             WHERE ci.subject_id = $1",
        )
        .bind(subject_id)
        .bind(as_of)
        .bind(RECENT_WINDOW_DAYS as i32)
        .fetch_one(pool)
        .await
    }

    /// Lock an instance row and ensure it is still a draft.
    async fn lock_draft(
        conn: &mut PgConnection,
        instance_id: DbId,
    ) -> Result<ChecklistInstance, LifecycleError> {
        let query = format!("SELECT {COLUMNS} FROM checklist_instances WHERE id = $1 FOR UPDATE");
        let instance = sqlx::query_as::<_, ChecklistInstance>(&query)
            .bind(instance_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ChecklistInstance",
                id: instance_id,
            })?;

        if instance.is_finalized {
            return Err(CoreError::AlreadyFinalized(format!(
                "Checklist instance {instance_id} is finalized and read-only"
            ))
            .into());
        }
        Ok(instance)
    }

    async fn load_responses(
        conn: &mut PgConnection,
        instance_id: DbId,
    ) -> Result<Vec<ItemResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} \
             FROM item_responses r \
             JOIN checklist_items i ON i.id = r.item_id \
             WHERE r.instance_id = $1 \
             ORDER BY i.ordinal ASC"
        );
        sqlx::query_as::<_, ItemResponse>(&query)
            .bind(instance_id)
            .fetch_all(conn)
            .await
    }

    async fn load_checks(
        conn: &mut PgConnection,
        instance_id: DbId,
    ) -> Result<Vec<ResponseCheckRow>, sqlx::Error> {
        sqlx::query_as::<_, ResponseCheckRow>(
            "SELECT i.id AS item_id, i.ordinal, i.is_mandatory, r.status, rem.action_plan \
             FROM item_responses r \
             JOIN checklist_items i ON i.id = r.item_id \
             LEFT JOIN remediations rem ON rem.response_id = r.id \
             WHERE r.instance_id = $1 \
             ORDER BY i.ordinal ASC",
        )
        .bind(instance_id)
        .fetch_all(conn)
        .await
    }
}
