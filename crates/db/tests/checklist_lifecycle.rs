//! Integration tests for the checklist lifecycle.
//!
//! Exercises the repository layer against a real database:
//! - Model catalog (create, stream active, deactivate, item deactivation)
//! - Revision (in place vs. new version once referenced)
//! - Materialization (one response per active item, duplicate conflict, site check)
//! - Concurrent materialize and finalize races
//! - Draft editing (status, note, remediation attach/detach)
//! - Finalization (violations, read-only afterwards, assignment notifications)
//! - Listing, detail and subject statistics

use assert_matches::assert_matches;
use chrono::NaiveDate;
use futures::TryStreamExt;
use grua_core::checklist::{ResponseStatus, ViolationReason};
use grua_core::error::CoreError;
use grua_db::models::checklist_instance::{
    InstanceFilter, MaterializeInstance, RemediationInput, UpdateResponse,
};
use grua_db::models::checklist_model::{CreateChecklistItem, CreateChecklistModel};
use grua_db::models::notification::InboxFilter;
use grua_db::repositories::{ChecklistInstanceRepo, ChecklistModelRepo, NotificationRepo};
use grua_db::LifecycleError;
use sqlx::PgPool;

const SITE: i64 = 10;
const CRANE: i64 = 501;
const INSPECTOR: i64 = 7;
const FOREMAN: i64 = 8;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn item(ordinal: i32, description: &str, mandatory: bool) -> CreateChecklistItem {
    CreateChecklistItem {
        ordinal,
        category: "Structure".to_string(),
        description: description.to_string(),
        mandatory,
        allows_attachment: false,
    }
}

/// "Daily Safety Check": three items, the first two mandatory.
fn daily_safety_check() -> CreateChecklistModel {
    CreateChecklistModel {
        site_id: SITE,
        name: "Daily Safety Check".to_string(),
        description: None,
        items: vec![
            item(1, "Brakes", true),
            item(2, "Limit switches", true),
            item(3, "Cabin cleanliness", false),
        ],
    }
}

fn materialize_input(model_id: i64, day: &str) -> MaterializeInstance {
    MaterializeInstance {
        model_id,
        subject_id: CRANE,
        site_id: SITE,
        inspection_date: date(day),
        responsible_party_id: INSPECTOR,
    }
}

fn set(status: ResponseStatus) -> UpdateResponse {
    UpdateResponse {
        status,
        note: None,
        remediation: None,
    }
}

fn non_conforming(plan: &str, responsible: Option<i64>) -> UpdateResponse {
    UpdateResponse {
        status: ResponseStatus::NonConforming,
        note: Some("Worn pads".to_string()),
        remediation: Some(RemediationInput {
            action_plan: plan.to_string(),
            responsible_party_id: responsible,
            due_date: None,
        }),
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_stream_active_models(pool: PgPool) {
    let created = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    assert_eq!(created.items.len(), 3);
    assert_eq!(created.model.version, 1);
    assert!(created.model.is_active);

    let mut other = daily_safety_check();
    other.name = "Annual Inspection".to_string();
    let other = ChecklistModelRepo::create(&pool, &other).await.unwrap();

    let active: Vec<_> = ChecklistModelRepo::stream_active_for_site(&pool, SITE)
        .try_collect()
        .await
        .unwrap();
    let names: Vec<_> = active.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Annual Inspection", "Daily Safety Check"]);

    assert!(ChecklistModelRepo::deactivate(&pool, other.model.id).await.unwrap());
    // Idempotent.
    assert!(ChecklistModelRepo::deactivate(&pool, other.model.id).await.unwrap());
    assert!(!ChecklistModelRepo::deactivate(&pool, 999_999).await.unwrap());

    // Restarting the sequence reflects the deactivation.
    let active: Vec<_> = ChecklistModelRepo::stream_active_for_site(&pool, SITE)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, created.model.id);

    let all = ChecklistModelRepo::list_all_for_site(&pool, SITE).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_item_ordinal_is_rejected(pool: PgPool) {
    let mut input = daily_safety_check();
    input.items.push(item(2, "Duplicate", false));

    let err = ChecklistModelRepo::create(&pool, &input).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_checklist_items_model_ordinal"));

    // Nothing was persisted.
    let all = ChecklistModelRepo::list_all_for_site(&pool, SITE).await.unwrap();
    assert!(all.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deactivated_item_is_omitted_from_new_instances(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    let cabin = model.items[2].id;

    assert!(ChecklistModelRepo::deactivate_item(&pool, model.model.id, cabin)
        .await
        .unwrap());
    assert!(!ChecklistModelRepo::deactivate_item(&pool, model.model.id, 999_999)
        .await
        .unwrap());

    let draft = ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-03-01"))
        .await
        .unwrap();
    assert_eq!(draft.responses.len(), 2);
    assert!(draft.responses.iter().all(|r| r.item_id != cabin));

    // The model still reports the inactive item.
    let full = ChecklistModelRepo::find_with_items(&pool, model.model.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(full.items.len(), 3);
    assert!(!full.items[2].is_active);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revise_unreferenced_model_in_place(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();

    let revision = ChecklistModelRepo::revise(&pool, model.model.id, &[item(1, "Hook", true)])
        .await
        .unwrap();
    assert!(!revision.new_version);
    assert_eq!(revision.model.model.id, model.model.id);
    assert_eq!(revision.model.items.len(), 1);
    assert_eq!(revision.model.items[0].description, "Hook");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revise_referenced_model_creates_new_version(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    let draft = ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-03-01"))
        .await
        .unwrap();

    let revision = ChecklistModelRepo::revise(&pool, model.model.id, &[item(1, "Hook", true)])
        .await
        .unwrap();
    assert!(revision.new_version);
    assert_ne!(revision.model.model.id, model.model.id);
    assert_eq!(revision.model.model.version, 2);
    assert_eq!(revision.model.model.previous_version_id, Some(model.model.id));

    let old = ChecklistModelRepo::find_by_id(&pool, model.model.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!old.is_active);

    // The existing instance keeps the original three items.
    let detail = ChecklistInstanceRepo::find_detail(&pool, draft.instance.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.responses.len(), 3);
    assert_eq!(detail.model_version, 1);

    // Revising the superseded version is refused.
    let err = ChecklistModelRepo::revise(&pool, model.model.id, &[item(1, "Hook", true)])
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Materialization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_materialize_creates_unset_responses_in_order(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();

    let draft = ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-03-01"))
        .await
        .unwrap();

    assert!(!draft.instance.is_finalized);
    assert!(draft.instance.finalized_at.is_none());
    assert_eq!(draft.responses.len(), 3);
    assert!(draft.responses.iter().all(|r| r.status == ResponseStatus::Unset));
    let item_ids: Vec<_> = draft.responses.iter().map(|r| r.item_id).collect();
    let expected: Vec<_> = model.items.iter().map(|i| i.id).collect();
    assert_eq!(item_ids, expected);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_materialize_duplicate_is_conflict(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    let input = materialize_input(model.model.id, "2024-03-01");

    ChecklistInstanceRepo::materialize(&pool, &input).await.unwrap();
    let err = ChecklistInstanceRepo::materialize(&pool, &input)
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Conflict(_)));

    // A different day is fine.
    ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-03-02"))
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_materialize_unknown_or_inactive_model(pool: PgPool) {
    let err = ChecklistInstanceRepo::materialize(&pool, &materialize_input(999_999, "2024-03-01"))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        LifecycleError::Core(CoreError::NotFound { entity: "ChecklistModel", .. })
    );

    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    ChecklistModelRepo::deactivate(&pool, model.model.id).await.unwrap();
    let err = ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-03-01"))
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_materialize_for_another_site_is_rejected(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    let input = MaterializeInstance {
        site_id: SITE + 1,
        ..materialize_input(model.model.id, "2024-03-01")
    };

    let err = ChecklistInstanceRepo::materialize(&pool, &input)
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Validation(_)));

    let page = ChecklistInstanceRepo::list(&pool, &InstanceFilter::default(), 50, 0)
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

// ---------------------------------------------------------------------------
// Concurrent writers
// ---------------------------------------------------------------------------

async fn response_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM item_responses")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_materialize_creates_one_instance(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    let input = materialize_input(model.model.id, "2024-03-01");

    let (a, b) = tokio::join!(
        ChecklistInstanceRepo::materialize(&pool, &input),
        ChecklistInstanceRepo::materialize(&pool, &input),
    );

    let (created, refused) = match (a, b) {
        (Ok(created), Err(refused)) | (Err(refused), Ok(created)) => (created, refused),
        (a, b) => panic!("expected exactly one success, got {a:?} and {b:?}"),
    };
    assert_matches!(refused, LifecycleError::Core(CoreError::Conflict(_)));
    assert_eq!(created.responses.len(), 3);
    assert_eq!(response_rows(&pool).await, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_finalize_succeeds_once(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    let draft = ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-03-01"))
        .await
        .unwrap();
    let id = draft.instance.id;
    for item in &model.items[..2] {
        ChecklistInstanceRepo::update_response(&pool, id, item.id, &set(ResponseStatus::Ok))
            .await
            .unwrap();
    }

    let (a, b) = tokio::join!(
        ChecklistInstanceRepo::finalize(&pool, id),
        ChecklistInstanceRepo::finalize(&pool, id),
    );

    let (finalized, refused) = match (a, b) {
        (Ok(finalized), Err(refused)) | (Err(refused), Ok(finalized)) => (finalized, refused),
        (a, b) => panic!("expected exactly one success, got {a:?} and {b:?}"),
    };
    assert_matches!(refused, LifecycleError::Core(CoreError::AlreadyFinalized(_)));

    let stored = ChecklistInstanceRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(stored.is_finalized);
    assert_eq!(stored.finalized_at, finalized.finalized_at);
}

// ---------------------------------------------------------------------------
// Editing and finalization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_daily_safety_check_scenario(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    let (brakes, limits) = (model.items[0].id, model.items[1].id);
    let draft = ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-03-01"))
        .await
        .unwrap();
    let id = draft.instance.id;

    // Brakes non-conforming without a remediation, limits unset.
    ChecklistInstanceRepo::update_response(
        &pool,
        id,
        brakes,
        &UpdateResponse {
            status: ResponseStatus::NonConforming,
            note: Some("Worn pads".to_string()),
            remediation: None,
        },
    )
    .await
    .unwrap();

    let err = ChecklistInstanceRepo::finalize(&pool, id).await.unwrap_err();
    let violations = assert_matches!(err, LifecycleError::Core(CoreError::Violations(v)) => v);
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].item_id, brakes);
    assert_eq!(violations[0].reason, ViolationReason::MissingRemediation);
    assert_eq!(violations[1].item_id, limits);
    assert_eq!(violations[1].reason, ViolationReason::Incomplete);

    // The refused finalization changed nothing.
    let instance = ChecklistInstanceRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(!instance.is_finalized);

    let preview = ChecklistInstanceRepo::violations(&pool, id).await.unwrap().unwrap();
    assert_eq!(preview, violations);

    // Fix both.
    ChecklistInstanceRepo::update_response(&pool, id, brakes, &non_conforming("Replace pads", Some(FOREMAN)))
        .await
        .unwrap();
    ChecklistInstanceRepo::update_response(&pool, id, limits, &set(ResponseStatus::Ok))
        .await
        .unwrap();

    let finalized = ChecklistInstanceRepo::finalize(&pool, id).await.unwrap();
    assert!(finalized.is_finalized);
    assert!(finalized.finalized_at.is_some());

    // The foreman was told about the assignment exactly once.
    let inbox = NotificationRepo::list_for_user(&pool, FOREMAN, &InboxFilter::default(), 50, 0)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, "remediation_assigned");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_not_applicable_satisfies_mandatory(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    let draft = ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-03-01"))
        .await
        .unwrap();
    let id = draft.instance.id;

    for item in &model.items[..2] {
        ChecklistInstanceRepo::update_response(&pool, id, item.id, &set(ResponseStatus::NotApplicable))
            .await
            .unwrap();
    }

    // Optional item left unset.
    ChecklistInstanceRepo::finalize(&pool, id).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_finalized_instance_is_read_only(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    let draft = ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-03-01"))
        .await
        .unwrap();
    let id = draft.instance.id;
    for item in &model.items[..2] {
        ChecklistInstanceRepo::update_response(&pool, id, item.id, &set(ResponseStatus::Ok))
            .await
            .unwrap();
    }
    let first = ChecklistInstanceRepo::finalize(&pool, id).await.unwrap();

    let err = ChecklistInstanceRepo::update_response(&pool, id, model.items[2].id, &set(ResponseStatus::Ok))
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::AlreadyFinalized(_)));

    let err = ChecklistInstanceRepo::finalize(&pool, id).await.unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::AlreadyFinalized(_)));

    // finalized_at was not moved by the second attempt.
    let after = ChecklistInstanceRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(after.finalized_at, first.finalized_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_remediation_requires_non_conforming_and_is_detached(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    let brakes = model.items[0].id;
    let draft = ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-03-01"))
        .await
        .unwrap();
    let id = draft.instance.id;

    let mut bad = non_conforming("Replace pads", None);
    bad.status = ResponseStatus::Ok;
    let err = ChecklistInstanceRepo::update_response(&pool, id, brakes, &bad)
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Validation(_)));

    let detail = ChecklistInstanceRepo::update_response(&pool, id, brakes, &non_conforming("Replace pads", None))
        .await
        .unwrap();
    let remediation = detail.remediation.expect("remediation attached");
    // Defaults to the instance's responsible party.
    assert_eq!(remediation.responsible_party_id, Some(INSPECTOR));
    assert_eq!(detail.note.as_deref(), Some("Worn pads"));

    // Moving back to ok drops the remediation but keeps the note.
    let detail = ChecklistInstanceRepo::update_response(&pool, id, brakes, &set(ResponseStatus::Ok))
        .await
        .unwrap();
    assert!(detail.remediation.is_none());
    assert_eq!(detail.note.as_deref(), Some("Worn pads"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_due_date_before_inspection_is_rejected(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    let draft = ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-03-01"))
        .await
        .unwrap();

    let mut input = non_conforming("Replace pads", None);
    if let Some(rem) = input.remediation.as_mut() {
        rem.due_date = Some(date("2024-02-28"));
    }
    let err = ChecklistInstanceRepo::update_response(&pool, draft.instance.id, model.items[0].id, &input)
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_unknown_response(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    let draft = ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-03-01"))
        .await
        .unwrap();

    let err = ChecklistInstanceRepo::update_response(&pool, draft.instance.id, 999_999, &set(ResponseStatus::Ok))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        LifecycleError::Core(CoreError::NotFound { entity: "ItemResponse", .. })
    );

    let err = ChecklistInstanceRepo::update_response(&pool, 999_999, model.items[0].id, &set(ResponseStatus::Ok))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        LifecycleError::Core(CoreError::NotFound { entity: "ChecklistInstance", .. })
    );
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_orders_and_counts(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    for day in ["2024-03-01", "2024-03-03", "2024-03-02"] {
        ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, day))
            .await
            .unwrap();
    }

    let page = ChecklistInstanceRepo::list(&pool, &InstanceFilter::default(), 2, 0)
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].inspection_date, date("2024-03-03"));
    assert_eq!(page.data[1].inspection_date, date("2024-03-02"));
    assert_eq!(page.data[0].total_items, 3);
    assert_eq!(page.data[0].unset_count, 3);
    assert_eq!(page.data[0].model_name, "Daily Safety Check");

    let filter = InstanceFilter {
        date_from: Some(date("2024-03-02")),
        ..Default::default()
    };
    let page = ChecklistInstanceRepo::list(&pool, &filter, 20, 0).await.unwrap();
    assert_eq!(page.total, 2);

    let filter = InstanceFilter {
        finalized_only: true,
        ..Default::default()
    };
    let page = ChecklistInstanceRepo::list(&pool, &filter, 20, 0).await.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.data.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_subject_stats(pool: PgPool) {
    let model = ChecklistModelRepo::create(&pool, &daily_safety_check())
        .await
        .unwrap();
    let old = ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-01-01"))
        .await
        .unwrap();
    let recent = ChecklistInstanceRepo::materialize(&pool, &materialize_input(model.model.id, "2024-03-01"))
        .await
        .unwrap();

    ChecklistInstanceRepo::update_response(&pool, recent.instance.id, model.items[0].id, &non_conforming("Fix", None))
        .await
        .unwrap();
    for item in &model.items[..2] {
        ChecklistInstanceRepo::update_response(&pool, old.instance.id, item.id, &set(ResponseStatus::Ok))
            .await
            .unwrap();
    }
    ChecklistInstanceRepo::finalize(&pool, old.instance.id).await.unwrap();

    let stats = ChecklistInstanceRepo::subject_stats(&pool, CRANE, date("2024-03-10"))
        .await
        .unwrap();
    assert_eq!(stats.subject_id, CRANE);
    assert_eq!(stats.total_instances, 2);
    assert_eq!(stats.finalized_instances, 1);
    assert_eq!(stats.draft_instances, 1);
    assert_eq!(stats.non_conforming_responses, 1);
    assert_eq!(stats.open_remediations, 1);
    assert_eq!(stats.first_inspection, Some(date("2024-01-01")));
    assert_eq!(stats.last_inspection, Some(date("2024-03-01")));
    assert_eq!(stats.recent_instances, 1);

    let empty = ChecklistInstanceRepo::subject_stats(&pool, 999, date("2024-03-10"))
        .await
        .unwrap();
    assert_eq!(empty.total_instances, 0);
    assert_eq!(empty.first_inspection, None);
}
