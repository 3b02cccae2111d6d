//! Request extractors for authentication ([`auth::AuthUser`]) and role
//! checks ([`rbac::RequireAdmin`]).

pub mod auth;
pub mod rbac;
