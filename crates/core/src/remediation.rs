//! Resolution lifecycle for non-conformance remediations.
//!
//! ```text
//! pending ──► in_progress ──► resolved
//!    │             │
//!    ├─────────────┼──────────► resolved
//!    └─────────────┴──────────► cancelled
//! ```
//!
//! `resolved` and `cancelled` are terminal. Remediations stay editable through
//! this lifecycle after the parent checklist is finalized.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ResolutionStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
    Cancelled,
}

impl ResolutionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionStatus::Pending => "pending",
            ResolutionStatus::InProgress => "in_progress",
            ResolutionStatus::Resolved => "resolved",
            ResolutionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "pending" => Ok(ResolutionStatus::Pending),
            "in_progress" => Ok(ResolutionStatus::InProgress),
            "resolved" => Ok(ResolutionStatus::Resolved),
            "cancelled" => Ok(ResolutionStatus::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Invalid resolution status '{other}'. Must be one of: \
                 pending, in_progress, resolved, cancelled"
            ))),
        }
    }

    /// Still requires action.
    pub fn is_open(self) -> bool {
        matches!(self, ResolutionStatus::Pending | ResolutionStatus::InProgress)
    }
}

impl TryFrom<String> for ResolutionStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ResolutionStatus::parse(&value)
    }
}

/// What an accepted status change requires of storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Target equals current status; nothing to write.
    Unchanged,
    /// Persist the new status and record an event.
    Apply,
}

/// Decide whether `from -> to` is allowed.
pub fn check_transition(
    from: ResolutionStatus,
    to: ResolutionStatus,
) -> Result<Transition, CoreError> {
    use ResolutionStatus::*;

    if from == to {
        return Ok(Transition::Unchanged);
    }

    if !from.is_open() {
        let state = if from == Resolved {
            "is already resolved"
        } else {
            "was cancelled"
        };
        return Err(CoreError::InvalidTransition(format!(
            "Remediation {state} and cannot move to {}",
            to.as_str()
        )));
    }

    if to == Pending {
        return Err(CoreError::InvalidTransition(format!(
            "Cannot move remediation from {} back to pending",
            from.as_str()
        )));
    }

    Ok(Transition::Apply)
}

/// Work cannot start on, or be signed off for, a remediation with no action
/// plan. Cancelling stays allowed.
pub fn validate_action_plan_for(
    target: ResolutionStatus,
    action_plan: &str,
) -> Result<(), CoreError> {
    let needs_plan = matches!(
        target,
        ResolutionStatus::InProgress | ResolutionStatus::Resolved
    );
    if needs_plan && action_plan.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "An action plan is required before moving a remediation to {}",
            target.as_str()
        )));
    }
    Ok(())
}
