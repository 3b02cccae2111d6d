//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the corresponding repository in `grua_db` and map
//! errors via [`AppError`](crate::error::AppError).

pub mod checklist_instance;
pub mod checklist_model;
pub mod document;
pub mod notification;
pub mod remediation;
