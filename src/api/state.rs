use std::sync::Arc;

use crate::conf::ServerConfig;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}
