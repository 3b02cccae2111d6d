//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` structs matching database rows
//! - `Deserialize` DTOs for request bodies and repository inputs

pub mod checklist_instance;
pub mod checklist_model;
pub mod document;
pub mod notification;
pub mod remediation;
