use std::sync::Arc;

use crate::config::ServerConfig;

/// Handler state: the Postgres pool every repository call goes through,
/// and the loaded configuration (the auth extractor reads `config.jwt`).
#[derive(Clone)]
pub struct AppState {
    pub pool: grua_db::DbPool,
    pub config: Arc<ServerConfig>,
}
