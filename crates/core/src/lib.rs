//! Domain logic for the crane checklist engine.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and
//! `api` crates call into these functions so the lifecycle rules live in
//! exactly one place.

pub mod checklist;
pub mod error;
pub mod expiry;
pub mod pagination;
pub mod remediation;
pub mod roles;
pub mod types;
