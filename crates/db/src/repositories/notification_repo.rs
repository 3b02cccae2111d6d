//! Repository for the `notifications` table.

use grua_core::types::DbId;
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use crate::models::notification::{InboxFilter, NewNotification, Notification};

const COLUMNS: &str = "id, user_id, kind, title, message, is_read, read_at, created_at";

/// Queues notifications and serves the per-user inbox.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Queue a notification unless one with the same `dedup_key` exists.
    /// Returns whether a row was inserted.
    ///
    /// Takes any executor so finalization can queue assignment notices in
    /// its own transaction.
    pub async fn insert_deduped<'e>(
        executor: impl PgExecutor<'e>,
        input: &NewNotification,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO notifications (user_id, kind, title, message, dedup_key) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_notifications_dedup_key DO NOTHING",
        )
        .bind(input.user_id)
        .bind(input.kind)
        .bind(&input.title)
        .bind(&input.message)
        .bind(&input.dedup_key)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a user's notifications, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &InboxFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 \
               AND (NOT $2 OR is_read = false) \
               AND ($3::TEXT IS NULL OR kind = $3) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(filter.unread_only)
            .bind(&filter.kind)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark one of the user's notifications read. `false` when the id is
    /// unknown or belongs to someone else. Re-reading keeps the first
    /// `read_at`.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark every unread notification of the user read, optionally only
    /// those of one `kind`. Returns how many changed.
    pub async fn mark_all_read(
        pool: &PgPool,
        user_id: DbId,
        kind: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE user_id = $1 AND is_read = false \
               AND ($2::TEXT IS NULL OR kind = $2)",
        )
        .bind(user_id)
        .bind(kind)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
