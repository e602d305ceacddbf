//! Server configuration, read from the environment at startup.

use std::env;

use tracing::{info, warn};

/// Default port the server listens on when none is configured.
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// TCP port the HTTP/WebSocket listener binds to.
    pub port: u16,
}

impl AppConfig {
    /// Load the configuration from `PORT` (or `SERVER_PORT`), falling back to
    /// the built-in default when unset or unparsable.
    pub fn from_env() -> Self {
        let port = match env::var("PORT").or_else(|_| env::var("SERVER_PORT")) {
            Ok(raw) => match raw.parse::<u16>() {
                Ok(port) => port,
                Err(err) => {
                    warn!(value = %raw, error = %err, "invalid port in environment; using default");
                    DEFAULT_PORT
                }
            },
            Err(_) => DEFAULT_PORT,
        };
        info!(port, "loaded server configuration");
        Self { port }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}
