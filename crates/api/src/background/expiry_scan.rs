//! Periodic scan for expiring documents and overdue remediations.
//!
//! Spawns a background task that queues notifications for employee
//! documents nearing (or past) their validity date and for open
//! remediations past their due date. Every notification carries a per-day
//! dedup key, so running the scan repeatedly, or on several server
//! instances at once, queues each notice at most once per day.

use std::time::Duration;

use chrono::Utc;
use futures::TryStreamExt;
use grua_core::expiry::{
    classify_expiry, document_dedup_key, document_message, overdue_dedup_key,
    NOTIFICATION_REMEDIATION_OVERDUE,
};
use grua_core::types::Date;
use grua_db::models::notification::NewNotification;
use grua_db::repositories::{DocumentRepo, NotificationRepo, RemediationRepo};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::config::ExpiryScanConfig;

/// Counts from one scan pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Documents inside the lookahead window or already expired.
    pub documents_flagged: usize,
    /// Open remediations past their due date with a responsible party.
    pub remediations_flagged: usize,
    /// Notifications actually inserted (the rest were deduplicated).
    pub notifications_queued: usize,
}

/// Run one scan pass as of `today`.
pub async fn scan_once(
    pool: &PgPool,
    today: Date,
    lookahead_days: i64,
) -> Result<ScanOutcome, sqlx::Error> {
    let mut outcome = ScanOutcome::default();

    let horizon = today + chrono::Duration::days(lookahead_days);
    let mut documents = DocumentRepo::stream_expiring_before(pool, horizon);
    while let Some(doc) = documents.try_next().await? {
        let Some(valid_until) = doc.valid_until else {
            continue;
        };
        let Some(state) = classify_expiry(valid_until, today, lookahead_days) else {
            continue;
        };
        outcome.documents_flagged += 1;

        let (title, message) = document_message(&doc.name, valid_until, state);
        let notification = NewNotification {
            user_id: doc.employee_id,
            kind: state.notification_kind(),
            title,
            message,
            dedup_key: Some(document_dedup_key(doc.id, today)),
        };
        if NotificationRepo::insert_deduped(pool, &notification).await? {
            outcome.notifications_queued += 1;
        }
    }
    drop(documents);

    let mut overdue = RemediationRepo::stream_overdue(pool, today);
    while let Some(task) = overdue.try_next().await? {
        let (Some(user_id), Some(due_date)) = (task.responsible_party_id, task.due_date) else {
            continue;
        };
        outcome.remediations_flagged += 1;

        let notification = NewNotification {
            user_id,
            kind: NOTIFICATION_REMEDIATION_OVERDUE,
            title: format!("Overdue: {}", task.item_description),
            message: format!(
                "The remediation raised on {} was due {}. Action plan: {}",
                task.inspection_date, due_date, task.action_plan
            ),
            dedup_key: Some(overdue_dedup_key(task.id, today)),
        };
        if NotificationRepo::insert_deduped(pool, &notification).await? {
            outcome.notifications_queued += 1;
        }
    }

    Ok(outcome)
}

/// Scan every `config.interval_secs` (first pass immediately) until
/// `cancel` fires. Failed passes are logged and retried on the next tick.
pub async fn run(pool: PgPool, config: ExpiryScanConfig, cancel: CancellationToken) {
    let ExpiryScanConfig {
        lookahead_days,
        interval_secs,
    } = config;

    tracing::info!(lookahead_days, interval_secs, "Expiry scan job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Expiry scan job stopping");
                break;
            }
            _ = interval.tick() => {
                let today = Utc::now().date_naive();
                match scan_once(&pool, today, lookahead_days).await {
                    Ok(outcome) if outcome.notifications_queued > 0 => {
                        tracing::info!(
                            documents = outcome.documents_flagged,
                            remediations = outcome.remediations_flagged,
                            queued = outcome.notifications_queued,
                            "Expiry scan: notifications queued"
                        );
                    }
                    Ok(_) => {
                        tracing::debug!("Expiry scan: nothing new to notify");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Expiry scan failed");
                    }
                }
            }
        }
    }
}
