//! HTTP surface of the crane checklist engine.
//!
//! [`app::build_app`] assembles the router; the binary adds configuration,
//! the database pool and the background expiry scan around it.

pub mod app;
pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
