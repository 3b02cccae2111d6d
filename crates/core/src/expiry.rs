//! Document-expiry and overdue-remediation notification rules.
//!
//! The scan job calls these with an explicit `today`; nothing here reads the
//! clock. Dedup keys are stable per subject per day so repeated scans (from
//! any number of server instances) insert at most one notification each.

use crate::types::{Date, DbId};

/// Default number of days ahead of expiry at which a document is flagged.
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 30;

/// Window used by the crane logbook statistics ("recent" inspections).
pub const RECENT_WINDOW_DAYS: i64 = 30;

pub const NOTIFICATION_DOCUMENT_EXPIRING: &str = "document_expiring";
pub const NOTIFICATION_DOCUMENT_EXPIRED: &str = "document_expired";
pub const NOTIFICATION_REMEDIATION_ASSIGNED: &str = "remediation_assigned";
pub const NOTIFICATION_REMEDIATION_OVERDUE: &str = "remediation_overdue";

/// Every kind the engine queues; the inbox filter accepts only these.
pub const NOTIFICATION_KINDS: &[&str] = &[
    NOTIFICATION_DOCUMENT_EXPIRING,
    NOTIFICATION_DOCUMENT_EXPIRED,
    NOTIFICATION_REMEDIATION_ASSIGNED,
    NOTIFICATION_REMEDIATION_OVERDUE,
];

pub const DOCUMENT_KIND_CERTIFICATE: &str = "certificate";
pub const DOCUMENT_KIND_ADMISSION: &str = "admission_document";

/// All valid document kinds.
pub const VALID_DOCUMENT_KINDS: &[&str] = &[DOCUMENT_KIND_CERTIFICATE, DOCUMENT_KIND_ADMISSION];

/// Where a document stands relative to its validity date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryState {
    /// Still valid; expires in `days_remaining` days (0 = today).
    Expiring { days_remaining: i64 },
    /// Already past its validity date by `days_overdue` days.
    Expired { days_overdue: i64 },
}

impl ExpiryState {
    pub fn notification_kind(self) -> &'static str {
        match self {
            ExpiryState::Expiring { .. } => NOTIFICATION_DOCUMENT_EXPIRING,
            ExpiryState::Expired { .. } => NOTIFICATION_DOCUMENT_EXPIRED,
        }
    }
}

/// Classify a document. Returns `None` when it is outside the lookahead
/// window and needs no notification.
pub fn classify_expiry(valid_until: Date, today: Date, lookahead_days: i64) -> Option<ExpiryState> {
    let days = (valid_until - today).num_days();
    if days < 0 {
        Some(ExpiryState::Expired { days_overdue: -days })
    } else if days <= lookahead_days {
        Some(ExpiryState::Expiring {
            days_remaining: days,
        })
    } else {
        None
    }
}

/// Title and message for a document notification.
pub fn document_message(name: &str, valid_until: Date, state: ExpiryState) -> (String, String) {
    match state {
        ExpiryState::Expiring { days_remaining: 0 } => (
            format!("{name} expires today"),
            format!("{name} is valid until {valid_until}. Renew it today."),
        ),
        ExpiryState::Expiring { days_remaining } => (
            format!("{name} expires in {days_remaining} day(s)"),
            format!("{name} is valid until {valid_until}."),
        ),
        ExpiryState::Expired { days_overdue } => (
            format!("{name} has expired"),
            format!("{name} expired on {valid_until} ({days_overdue} day(s) ago)."),
        ),
    }
}

pub fn document_dedup_key(document_id: DbId, today: Date) -> String {
    format!("document_expiry:{document_id}:{today}")
}

pub fn overdue_dedup_key(remediation_id: DbId, today: Date) -> String {
    format!("remediation_overdue:{remediation_id}:{today}")
}

/// Assignment notifications fire once per remediation, ever.
pub fn assigned_dedup_key(remediation_id: DbId) -> String {
    format!("remediation_assigned:{remediation_id}")
}

pub fn validate_document_kind(kind: &str) -> Result<(), crate::error::CoreError> {
    if VALID_DOCUMENT_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(crate::error::CoreError::Validation(format!(
            "Invalid document kind '{kind}'. Must be one of: {}",
            VALID_DOCUMENT_KINDS.join(", ")
        )))
    }
}
