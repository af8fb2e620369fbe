// Session management for concurrent HTTP clients

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use uuid::Uuid;

use crate::engine::{EngineConfig, SupportEngine};

/// Per-session state
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Unique session identifier
    pub id: String,
    /// This session's chat engine, with its history and factor state
    pub engine: SupportEngine,
    /// Last activity timestamp
    pub last_activity: DateTime<Utc>,
    /// Session creation time
    pub created_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            engine: SupportEngine::new(config),
            last_activity: Utc::now(),
            created_at: Utc::now(),
        }
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Check if session has expired
    pub fn is_expired(&self, timeout_minutes: u64) -> bool {
        let elapsed = Utc::now().signed_duration_since(self.last_activity);
        elapsed.num_minutes() >= timeout_minutes as i64
    }
}

/// Concurrent session manager using DashMap
pub struct SessionManager {
    sessions: Arc<DashMap<String, SessionState>>,
    /// Engine configuration new sessions are built from
    engine_config: EngineConfig,
    max_sessions: usize,
    timeout_minutes: u64,
}

impl SessionManager {
    pub fn new(engine_config: EngineConfig, max_sessions: usize, timeout_minutes: u64) -> Self {
        let manager = Self {
            sessions: Arc::new(DashMap::new()),
            engine_config,
            max_sessions,
            timeout_minutes,
        };

        manager.start_cleanup_task();
        manager
    }

    /// Get or create a session, returning its id. A provided but unknown
    /// id gets a fresh session rather than an error.
    pub fn get_or_create(&self, session_id: Option<&str>) -> anyhow::Result<String> {
        if let Some(id) = session_id {
            if let Some(mut session) = self.sessions.get_mut(id) {
                session.touch();
                return Ok(session.id.clone());
            }
        }

        if self.sessions.len() >= self.max_sessions {
            anyhow::bail!(
                "Maximum session limit reached ({}/{})",
                self.sessions.len(),
                self.max_sessions
            );
        }

        let session = SessionState::new(self.engine_config.clone());
        let id = session.id.clone();
        self.sessions.insert(id.clone(), session);

        tracing::info!(session_id = %id, "Created new session");
        Ok(id)
    }

    /// Look up a read-only snapshot of an existing session.
    pub fn get(&self, session_id: &str) -> Option<SessionState> {
        self.sessions.get(session_id).map(|s| s.value().clone())
    }

    /// Mutate a session in place under the map guard, so concurrent
    /// requests for the same session cannot lose each other's turns.
    /// Engine calls are synchronous and fast; holding the shard lock for
    /// their duration is fine.
    pub fn with_session<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut SessionState) -> R,
    ) -> Option<R> {
        self.sessions.get_mut(session_id).map(|mut entry| {
            entry.touch();
            f(entry.value_mut())
        })
    }

    /// Delete a session
    pub fn delete(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Get active session count
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Start background cleanup task
    fn start_cleanup_task(&self) {
        let sessions = Arc::clone(&self.sessions);
        let timeout_minutes = self.timeout_minutes;

        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(60));

            loop {
                interval.tick().await;

                let expired: Vec<String> = sessions
                    .iter()
                    .filter(|entry| entry.value().is_expired(timeout_minutes))
                    .map(|entry| entry.key().clone())
                    .collect();

                let mut removed = 0;
                for session_id in expired {
                    if sessions.remove(&session_id).is_some() {
                        removed += 1;
                        tracing::debug!(session_id = %session_id, "Removed expired session");
                    }
                }

                if removed > 0 {
                    tracing::info!(
                        removed,
                        active = sessions.len(),
                        "Cleaned up expired sessions"
                    );
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_creation() {
        let manager = SessionManager::new(EngineConfig::support(), 10, 30);

        let id1 = manager.get_or_create(None).unwrap();
        assert_eq!(manager.active_count(), 1);

        let id2 = manager.get_or_create(None).unwrap();
        assert_eq!(manager.active_count(), 2);

        assert_ne!(id1, id2);
    }

    #[tokio::test]
    async fn test_session_retrieval() {
        let manager = SessionManager::new(EngineConfig::support(), 10, 30);

        let id1 = manager.get_or_create(None).unwrap();
        let id2 = manager.get_or_create(Some(&id1)).unwrap();

        assert_eq!(id1, id2);
        assert_eq!(manager.active_count(), 1);
    }

    #[tokio::test]
    async fn test_session_limit() {
        let manager = SessionManager::new(EngineConfig::support(), 2, 30);

        manager.get_or_create(None).unwrap();
        manager.get_or_create(None).unwrap();

        let result = manager.get_or_create(None);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Maximum session limit"));
    }

    #[tokio::test]
    async fn test_engine_state_mutates_in_place() {
        let manager = SessionManager::new(EngineConfig::support(), 10, 30);

        let id = manager.get_or_create(None).unwrap();
        manager
            .with_session(&id, |s| s.engine.get_response("I feel sad today"))
            .unwrap();

        let stored = manager.get(&id).unwrap();
        assert_eq!(stored.engine.history().len(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_turns_are_not_lost() {
        let manager = SessionManager::new(EngineConfig::support(), 10, 30);
        let id = manager.get_or_create(None).unwrap();

        // A second handler holding a snapshot of the session must not be
        // able to overwrite a turn applied through the manager.
        let snapshot = manager.get(&id).unwrap();
        manager
            .with_session(&id, |s| s.engine.get_response("I feel sad"))
            .unwrap();
        manager
            .with_session(&id, |s| s.engine.get_response("still sad"))
            .unwrap();

        assert_eq!(snapshot.engine.history().len(), 0);
        assert_eq!(manager.get(&id).unwrap().engine.history().len(), 2);
    }

    #[tokio::test]
    async fn test_with_session_unknown_id() {
        let manager = SessionManager::new(EngineConfig::support(), 10, 30);
        assert!(manager.with_session("nonexistent", |_| ()).is_none());
    }

    #[tokio::test]
    async fn test_session_deletion() {
        let manager = SessionManager::new(EngineConfig::support(), 10, 30);

        let id = manager.get_or_create(None).unwrap();

        assert!(manager.delete(&id));
        assert_eq!(manager.active_count(), 0);
        assert!(!manager.delete(&id));
    }
}
