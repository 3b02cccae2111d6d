//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Listing methods documented as
//! streams return a lazy `BoxStream` over a database cursor; calling them
//! again re-runs the query against current state.

pub mod checklist_instance_repo;
pub mod checklist_model_repo;
pub mod document_repo;
pub mod notification_repo;
pub mod remediation_repo;

pub use checklist_instance_repo::ChecklistInstanceRepo;
pub use checklist_model_repo::ChecklistModelRepo;
pub use document_repo::DocumentRepo;
pub use notification_repo::NotificationRepo;
pub use remediation_repo::RemediationRepo;
