//! Repository for `remediations` and their `remediation_events` history.

use futures::stream::BoxStream;
use grua_core::error::CoreError;
use grua_core::remediation::{
    check_transition, validate_action_plan_for, ResolutionStatus, Transition,
};
use grua_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::error::LifecycleError;
use crate::models::remediation::{Remediation, RemediationEvent, RemediationTask};

/// Column list for `remediations` queries.
const COLUMNS: &str = "id, response_id, action_plan, responsible_party_id, due_date, \
    resolution_status, resolved_at, created_at, updated_at";

/// Build an open-task query: the joined task columns, a literal WHERE
/// suffix, and the due-date ordering. Expands to a `&'static str` so the
/// result can back a lazy stream.
macro_rules! open_task_query {
    ($filter:literal) => {
        concat!(
            "SELECT rem.id, rem.response_id, rem.action_plan, rem.responsible_party_id, \
                    rem.due_date, rem.resolution_status, \
                    ci.id AS instance_id, ci.subject_id, ci.site_id, ci.inspection_date, \
                    i.id AS item_id, i.description AS item_description, r.note \
             FROM remediations rem \
             JOIN item_responses r ON r.id = rem.response_id \
             JOIN checklist_items i ON i.id = r.item_id \
             JOIN checklist_instances ci ON ci.id = r.instance_id \
             WHERE rem.resolution_status IN ('pending', 'in_progress') AND ",
            $filter,
            " ORDER BY rem.due_date ASC NULLS LAST, rem.id ASC"
        )
    };
}

/// Provides the resolution lifecycle and tracking views for remediations.
pub struct RemediationRepo;

impl RemediationRepo {
    /// Find a remediation by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Remediation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM remediations WHERE id = $1");
        sqlx::query_as::<_, Remediation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move a remediation to `target`, recording the change in its history.
    ///
    /// Requesting the current status is accepted and changes nothing.
    /// `resolved_at` is stamped when the remediation becomes `resolved`.
    /// Starting or resolving requires a non-blank action plan.
    /// Allowed whether or not the parent checklist is finalized.
    pub async fn update_resolution(
        pool: &PgPool,
        id: DbId,
        target: ResolutionStatus,
        actor_id: DbId,
    ) -> Result<Remediation, LifecycleError> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM remediations WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Remediation>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Remediation",
                id,
            })?;

        if check_transition(current.resolution_status, target)? == Transition::Unchanged {
            tx.commit().await?;
            return Ok(current);
        }
        validate_action_plan_for(target, &current.action_plan)?;

        let query = format!(
            "UPDATE remediations \
             SET resolution_status = $2, \
                 resolved_at = CASE WHEN $2 = 'resolved' THEN NOW() ELSE resolved_at END, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Remediation>(&query)
            .bind(id)
            .bind(target.as_str())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO remediation_events (remediation_id, from_status, to_status, actor_id) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(current.resolution_status.as_str())
        .bind(target.as_str())
        .bind(actor_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            remediation_id = id,
            from = current.resolution_status.as_str(),
            to = target.as_str(),
            actor_id,
            "Remediation status changed",
        );

        Ok(updated)
    }

    /// Stream open remediations assigned to a party, earliest due first.
    pub fn stream_open_by_responsible(
        pool: &PgPool,
        responsible_party_id: DbId,
    ) -> BoxStream<'_, Result<RemediationTask, sqlx::Error>> {
        sqlx::query_as::<_, RemediationTask>(open_task_query!("rem.responsible_party_id = $1"))
            .bind(responsible_party_id)
            .fetch(pool)
    }

    /// Stream open remediations whose due date is strictly before `as_of`.
    pub fn stream_overdue(
        pool: &PgPool,
        as_of: Date,
    ) -> BoxStream<'_, Result<RemediationTask, sqlx::Error>> {
        sqlx::query_as::<_, RemediationTask>(open_task_query!(
            "rem.due_date IS NOT NULL AND rem.due_date < $1"
        ))
        .bind(as_of)
        .fetch(pool)
    }

    /// List open remediations raised at a site.
    pub async fn list_open_by_site(
        pool: &PgPool,
        site_id: DbId,
    ) -> Result<Vec<RemediationTask>, sqlx::Error> {
        sqlx::query_as::<_, RemediationTask>(open_task_query!("ci.site_id = $1"))
            .bind(site_id)
            .fetch_all(pool)
            .await
    }

    /// Status history of a remediation, oldest first.
    pub async fn history(
        pool: &PgPool,
        remediation_id: DbId,
    ) -> Result<Vec<RemediationEvent>, sqlx::Error> {
        sqlx::query_as::<_, RemediationEvent>(
            "SELECT id, remediation_id, from_status, to_status, actor_id, created_at \
             FROM remediation_events \
             WHERE remediation_id = $1 \
             ORDER BY created_at ASC, id ASC",
        )
        .bind(remediation_id)
        .fetch_all(pool)
        .await
    }
}
