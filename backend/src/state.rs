use crate::config::ServerConfig;
use crate::engine::BadgeEngine;

/// Shared application state, handed to every handler as `web::Data`.
pub struct AppState {
    pub engine: BadgeEngine,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            engine: BadgeEngine::from_config(&config),
            config,
        }
    }

    pub fn with_engine(engine: BadgeEngine, config: ServerConfig) -> Self {
        Self { engine, config }
    }
}
