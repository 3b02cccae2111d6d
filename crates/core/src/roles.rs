//! Well-known role name constants.
//!
//! These must match the `role` claim issued by the identity service. Any
//! authenticated role may run checklists; only admins manage the catalog.

pub const ROLE_ADMIN: &str = "admin";
