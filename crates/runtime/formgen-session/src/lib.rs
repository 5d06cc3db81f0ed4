//! # formgen sessions
//!
//! Each visitor owns one [`SessionState`]. The [`SessionStore`] keys them by
//! an opaque id carried in a cookie and prunes records nobody has touched
//! within the configured TTL.

pub mod state;

pub use state::SessionState;

use chrono::{DateTime, Utc};
use formgen_core::{Error, Result, UiDescription};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One visitor's session
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: String,
    pub state: SessionState,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    /// Successful generations in this session
    pub generations: u32,
}

impl SessionRecord {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            state: SessionState::initial(),
            created_at: now,
            last_activity: now,
            generations: 0,
        }
    }

    fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared map of live sessions. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
    ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: chrono::Duration::seconds(ttl_secs.min(i64::MAX as u64) as i64),
        }
    }

    /// Return the session for `id`, creating a fresh one when the id is
    /// missing or unknown. Yields the id actually in use.
    pub async fn open(&self, id: Option<&str>) -> (String, SessionState) {
        let mut sessions = self.sessions.write().await;
        if let Some(record) = id.and_then(|id| sessions.get_mut(id)) {
            record.touch();
            return (record.id.clone(), record.state.clone());
        }

        let record = SessionRecord::new();
        let opened = (record.id.clone(), record.state.clone());
        tracing::debug!(session = %record.id, "session created");
        sessions.insert(record.id.clone(), record);
        opened
    }

    pub async fn state(&self, id: &str) -> Option<SessionState> {
        self.sessions.read().await.get(id).map(|r| r.state.clone())
    }

    pub async fn get(&self, id: &str) -> Option<SessionRecord> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Move the session into Loading.
    ///
    /// Fails with `GenerationInProgress` if a generation is already running;
    /// the state is left as it was. Unknown ids get a fresh session first.
    pub async fn begin_generation(&self, id: &str) -> Result<SessionState> {
        let mut sessions = self.sessions.write().await;
        let record = sessions.entry(id.to_string()).or_insert_with(|| SessionRecord {
            id: id.to_string(),
            ..SessionRecord::new()
        });
        record.touch();
        let next = record.state.submit()?;
        record.state = next.clone();
        Ok(next)
    }

    /// Like [`begin_generation`](Self::begin_generation), but the returned
    /// guard settles the session as failed if it is dropped unfinished.
    pub async fn begin_guarded(&self, id: &str) -> Result<GenerationGuard> {
        self.begin_generation(id).await?;
        Ok(GenerationGuard {
            store: self.clone(),
            id: Some(id.to_string()),
        })
    }

    /// Settle the in-flight generation and return the resulting state
    pub async fn finish_generation(
        &self,
        id: &str,
        outcome: Result<UiDescription>,
    ) -> SessionState {
        let mut sessions = self.sessions.write().await;
        let record = sessions.entry(id.to_string()).or_insert_with(|| SessionRecord {
            id: id.to_string(),
            ..SessionRecord::new()
        });
        record.touch();
        if outcome.is_ok() {
            record.generations += 1;
        }
        let current = std::mem::take(&mut record.state);
        record.state = current.settle(outcome);
        tracing::debug!(session = %id, state = record.state.label(), "generation settled");
        record.state.clone()
    }

    /// Drop sessions idle for longer than the TTL. Returns how many went.
    pub async fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let ttl = self.ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, r| now.signed_duration_since(r.last_activity) < ttl);
        before - sessions.len()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(3600)
    }
}

/// A session held in Loading.
///
/// Dropping it without [`finish`](Self::finish), e.g. when the request
/// future is cancelled, settles the session with a transport error so the
/// visitor can submit again.
pub struct GenerationGuard {
    store: SessionStore,
    id: Option<String>,
}

impl GenerationGuard {
    pub async fn finish(mut self, outcome: Result<UiDescription>) -> SessionState {
        let id = self.id.clone().unwrap_or_default();
        let settled = self.store.finish_generation(&id, outcome).await;
        self.id = None;
        settled
    }
}

impl Drop for GenerationGuard {
    fn drop(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        let store = self.store.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(session = %id, "generation abandoned");
                handle.spawn(async move {
                    let abandoned = Err(Error::Transport("generation abandoned".to_string()));
                    store.finish_generation(&id, abandoned).await;
                });
            }
            Err(_) => tracing::warn!(session = %id, "generation abandoned outside a runtime"),
        }
    }
}
