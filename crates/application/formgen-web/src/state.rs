//! Application state shared by every handler

use formgen_config::{Config, ConfigError};
use formgen_requester::{OpenAiClient, SchemaRequester};
use formgen_session::SessionStore;
use std::sync::Arc;
use std::time::Instant;

pub struct AppState {
    pub requester: SchemaRequester,
    pub sessions: SessionStore,
    started_at: Instant,
}

impl AppState {
    pub fn new(requester: SchemaRequester, sessions: SessionStore) -> Self {
        Self {
            requester,
            sessions,
            started_at: Instant::now(),
        }
    }

    /// Wire the OpenAI client and session store from config.
    /// Fails when the API key is not in the environment.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let client = OpenAiClient::from_config(&config.completion)?;
        Ok(Self::new(
            SchemaRequester::new(Arc::new(client)),
            SessionStore::new(config.server.session_ttl_secs),
        ))
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
