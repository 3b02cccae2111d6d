//! Checklist response statuses and the submission rules.
//!
//! A checklist instance may only be finalized when every mandatory item has
//! a status and every non-conforming item carries a remediation with a
//! non-blank action plan. [`validate_submission`] reports *all* problems at
//! once so the UI can highlight every failing row in a single pass.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::types::{Date, DbId};

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length of a model name.
pub const MAX_MODEL_NAME_LENGTH: usize = 200;

/// Maximum length of an item description or category label.
pub const MAX_ITEM_TEXT_LENGTH: usize = 1_000;

/* --------------------------------------------------------------------------
Response status
-------------------------------------------------------------------------- */

/// Outcome recorded for one checklist item.
///
/// `Unset` is stored as SQL `NULL`; the other variants map to the values
/// allowed by the `item_responses.status` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ResponseStatus {
    #[default]
    Unset,
    Ok,
    NonConforming,
    NotApplicable,
}

impl ResponseStatus {
    /// Column value for this status (`None` for `Unset`).
    pub fn as_db(self) -> Option<&'static str> {
        match self {
            ResponseStatus::Unset => None,
            ResponseStatus::Ok => Some("ok"),
            ResponseStatus::NonConforming => Some("non_conforming"),
            ResponseStatus::NotApplicable => Some("not_applicable"),
        }
    }

    /// Parse a column value back into a status.
    pub fn from_db(value: Option<&str>) -> Result<Self, CoreError> {
        match value {
            None => Ok(ResponseStatus::Unset),
            Some("ok") => Ok(ResponseStatus::Ok),
            Some("non_conforming") => Ok(ResponseStatus::NonConforming),
            Some("not_applicable") => Ok(ResponseStatus::NotApplicable),
            Some(other) => Err(CoreError::Internal(format!(
                "Unknown response status '{other}' in storage"
            ))),
        }
    }
}

impl TryFrom<Option<String>> for ResponseStatus {
    type Error = CoreError;

    fn try_from(value: Option<String>) -> Result<Self, Self::Error> {
        ResponseStatus::from_db(value.as_deref())
    }
}

/* --------------------------------------------------------------------------
Violations
-------------------------------------------------------------------------- */

/// Why a response blocks finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ViolationReason {
    /// A mandatory item was left unset.
    Incomplete,
    /// A non-conforming item has no remediation or a blank action plan.
    MissingRemediation,
}

/// One failing row reported by [`validate_submission`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Violation {
    pub item_id: DbId,
    pub ordinal: i32,
    pub reason: ViolationReason,
}

/// The facts about one response that the submission rules look at.
#[derive(Debug, Clone, Copy)]
pub struct ResponseCheck<'a> {
    pub item_id: DbId,
    pub ordinal: i32,
    pub is_mandatory: bool,
    pub status: ResponseStatus,
    /// `None` when the response has no remediation record.
    pub action_plan: Option<&'a str>,
}

/// Check every response of an instance and return all violations, ordered
/// by item ordinal. An empty result means the instance may be finalized.
///
/// `NotApplicable` satisfies the mandatory flag.
pub fn validate_submission(responses: &[ResponseCheck<'_>]) -> Vec<Violation> {
    let mut violations: Vec<Violation> = responses
        .iter()
        .filter_map(|r| {
            let reason = match r.status {
                ResponseStatus::Unset if r.is_mandatory => ViolationReason::Incomplete,
                ResponseStatus::NonConforming
                    if r.action_plan.map_or(true, |plan| plan.trim().is_empty()) =>
                {
                    ViolationReason::MissingRemediation
                }
                _ => return None,
            };
            Some(Violation {
                item_id: r.item_id,
                ordinal: r.ordinal,
                reason,
            })
        })
        .collect();

    violations.sort_by_key(|v| (v.ordinal, v.item_id));
    violations
}

/* --------------------------------------------------------------------------
Model definition rules
-------------------------------------------------------------------------- */

/// The parts of an item definition checked before a model is persisted.
#[derive(Debug, Clone, Copy)]
pub struct ItemDefinition<'a> {
    pub ordinal: i32,
    pub category: &'a str,
    pub description: &'a str,
}

/// Validate a model name.
pub fn validate_model_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Model name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_MODEL_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Model name exceeds maximum length of {MAX_MODEL_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate the item set of a model: at least one item, positive and
/// unique ordinals, non-blank text.
pub fn validate_item_definitions(items: &[ItemDefinition<'_>]) -> Result<(), CoreError> {
    if items.is_empty() {
        return Err(CoreError::Validation(
            "A checklist model needs at least one item".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.ordinal < 1 {
            return Err(CoreError::Validation(format!(
                "Item ordinal {} must be a positive integer",
                item.ordinal
            )));
        }
        if !seen.insert(item.ordinal) {
            return Err(CoreError::Validation(format!(
                "Duplicate item ordinal {}",
                item.ordinal
            )));
        }
        if item.description.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Item {} must have a description",
                item.ordinal
            )));
        }
        if item.category.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Item {} must have a category",
                item.ordinal
            )));
        }
        if item.description.len() > MAX_ITEM_TEXT_LENGTH
            || item.category.len() > MAX_ITEM_TEXT_LENGTH
        {
            return Err(CoreError::Validation(format!(
                "Item {} text exceeds maximum length of {MAX_ITEM_TEXT_LENGTH} characters",
                item.ordinal
            )));
        }
    }

    Ok(())
}

/* --------------------------------------------------------------------------
Response editing rules
-------------------------------------------------------------------------- */

/// A remediation may only accompany a non-conforming status.
pub fn validate_remediation_allowed(
    status: ResponseStatus,
    has_remediation: bool,
) -> Result<(), CoreError> {
    if has_remediation && status != ResponseStatus::NonConforming {
        return Err(CoreError::Validation(
            "A remediation can only be attached to a non_conforming response".to_string(),
        ));
    }
    Ok(())
}

/// A remediation due date, when present, cannot precede the inspection date.
pub fn validate_due_date(due_date: Option<Date>, inspection_date: Date) -> Result<(), CoreError> {
    match due_date {
        Some(due) if due < inspection_date => Err(CoreError::Validation(format!(
            "Remediation due date {due} is before the inspection date {inspection_date}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(
        item_id: DbId,
        ordinal: i32,
        is_mandatory: bool,
        status: ResponseStatus,
        action_plan: Option<&str>,
    ) -> ResponseCheck<'_> {
        ResponseCheck {
            item_id,
            ordinal,
            is_mandatory,
            status,
            action_plan,
        }
    }

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    // -- ResponseStatus ------------------------------------------------------

    #[test]
    fn status_db_mapping_is_consistent() {
        for status in [
            ResponseStatus::Unset,
            ResponseStatus::Ok,
            ResponseStatus::NonConforming,
            ResponseStatus::NotApplicable,
        ] {
            assert_eq!(ResponseStatus::from_db(status.as_db()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_db_status_is_internal_error() {
        let err = ResponseStatus::from_db(Some("broken")).unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&ResponseStatus::NonConforming).unwrap();
        assert_eq!(json, "\"non_conforming\"");
    }

    // -- validate_submission -------------------------------------------------

    #[test]
    fn empty_instance_has_no_violations() {
        assert!(validate_submission(&[]).is_empty());
    }

    #[test]
    fn unset_mandatory_item_is_incomplete() {
        let v = validate_submission(&[check(10, 1, true, ResponseStatus::Unset, None)]);
        assert_eq!(
            v,
            vec![Violation {
                item_id: 10,
                ordinal: 1,
                reason: ViolationReason::Incomplete
            }]
        );
    }

    #[test]
    fn unset_optional_item_is_fine() {
        let v = validate_submission(&[check(10, 1, false, ResponseStatus::Unset, None)]);
        assert!(v.is_empty());
    }

    #[test]
    fn not_applicable_satisfies_mandatory() {
        let v = validate_submission(&[check(10, 1, true, ResponseStatus::NotApplicable, None)]);
        assert!(v.is_empty());
    }

    #[test]
    fn non_conforming_without_remediation_is_reported() {
        let v = validate_submission(&[check(
            3,
            3,
            true,
            ResponseStatus::NonConforming,
            None,
        )]);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].reason, ViolationReason::MissingRemediation);
    }

    #[test]
    fn blank_action_plan_counts_as_missing() {
        let v = validate_submission(&[check(
            3,
            3,
            false,
            ResponseStatus::NonConforming,
            Some("   "),
        )]);
        assert_eq!(v[0].reason, ViolationReason::MissingRemediation);
    }

    #[test]
    fn non_conforming_with_plan_passes() {
        let v = validate_submission(&[check(
            3,
            3,
            true,
            ResponseStatus::NonConforming,
            Some("Replace limiter"),
        )]);
        assert!(v.is_empty());
    }

    #[test]
    fn reports_every_violation_in_ordinal_order() {
        let v = validate_submission(&[
            check(30, 3, true, ResponseStatus::NonConforming, None),
            check(10, 1, true, ResponseStatus::Unset, None),
            check(20, 2, false, ResponseStatus::Ok, None),
        ]);
        let ordinals: Vec<i32> = v.iter().map(|x| x.ordinal).collect();
        assert_eq!(ordinals, vec![1, 3]);
        assert_eq!(v[0].reason, ViolationReason::Incomplete);
        assert_eq!(v[1].reason, ViolationReason::MissingRemediation);
    }

    #[test]
    fn daily_safety_check_scenario() {
        // Brake test ok, paint n/a, load limiter non-conforming.
        let before = validate_submission(&[
            check(1, 1, true, ResponseStatus::Ok, None),
            check(2, 2, false, ResponseStatus::NotApplicable, None),
            check(3, 3, true, ResponseStatus::NonConforming, None),
        ]);
        assert_eq!(
            before,
            vec![Violation {
                item_id: 3,
                ordinal: 3,
                reason: ViolationReason::MissingRemediation
            }]
        );

        let after = validate_submission(&[
            check(1, 1, true, ResponseStatus::Ok, None),
            check(2, 2, false, ResponseStatus::NotApplicable, None),
            check(3, 3, true, ResponseStatus::NonConforming, Some("Replace limiter")),
        ]);
        assert!(after.is_empty());
    }

    #[test]
    fn violation_serializes_camel_case() {
        let json = serde_json::to_value(Violation {
            item_id: 3,
            ordinal: 3,
            reason: ViolationReason::MissingRemediation,
        })
        .unwrap();
        assert_eq!(json["itemId"], 3);
        assert_eq!(json["reason"], "missing_remediation");
    }

    // -- model definitions ---------------------------------------------------

    fn item(ordinal: i32, description: &str) -> ItemDefinition<'_> {
        ItemDefinition {
            ordinal,
            category: "Safety",
            description,
        }
    }

    #[test]
    fn model_name_must_not_be_blank() {
        assert!(validate_model_name("  ").is_err());
        assert!(validate_model_name("Daily Safety Check").is_ok());
    }

    #[test]
    fn model_name_length_is_capped() {
        let long = "x".repeat(MAX_MODEL_NAME_LENGTH + 1);
        assert!(validate_model_name(&long).is_err());
    }

    #[test]
    fn items_must_not_be_empty() {
        assert!(validate_item_definitions(&[]).is_err());
    }

    #[test]
    fn duplicate_ordinals_are_rejected() {
        let err = validate_item_definitions(&[item(1, "Brake test"), item(1, "Paint")])
            .unwrap_err();
        match err {
            CoreError::Validation(msg) => assert!(msg.contains("Duplicate item ordinal 1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn gaps_in_ordinals_are_allowed() {
        assert!(validate_item_definitions(&[item(1, "Brake test"), item(5, "Paint")]).is_ok());
    }

    #[test]
    fn non_positive_ordinal_is_rejected() {
        assert!(validate_item_definitions(&[item(0, "Brake test")]).is_err());
    }

    #[test]
    fn blank_description_is_rejected() {
        assert!(validate_item_definitions(&[item(1, "")]).is_err());
    }

    // -- response editing ----------------------------------------------------

    #[test]
    fn remediation_only_with_non_conforming() {
        assert!(validate_remediation_allowed(ResponseStatus::NonConforming, true).is_ok());
        assert!(validate_remediation_allowed(ResponseStatus::Ok, true).is_err());
        assert!(validate_remediation_allowed(ResponseStatus::Ok, false).is_ok());
    }

    #[test]
    fn due_date_on_inspection_day_is_allowed() {
        assert!(validate_due_date(Some(date("2024-03-01")), date("2024-03-01")).is_ok());
        assert!(validate_due_date(None, date("2024-03-01")).is_ok());
    }

    #[test]
    fn due_date_before_inspection_is_rejected() {
        assert!(validate_due_date(Some(date("2024-02-28")), date("2024-03-01")).is_err());
    }
}
