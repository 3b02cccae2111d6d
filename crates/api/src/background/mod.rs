//! Jobs spawned from `main` next to the HTTP server. Each runs until its
//! `CancellationToken` fires during graceful shutdown.

pub mod expiry_scan;
