//! In-memory registry of active respondent sessions
//!
//! Each session is an independent entry keyed by an opaque handle; mutating
//! one session can never observe or corrupt another's state. Nothing here
//! is persisted: abandoning a session simply leaves an entry that is
//! dropped with the process, and no partial answers reach the store.

use crate::session::RespondentSession;
use std::collections::HashMap;
use std::sync::Arc;
use tattfq_common::{Error, Result};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Shared handle → session map
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<Uuid, RespondentSession>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh session, returning its handle
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.write().await.insert(id, RespondentSession::new());
        id
    }

    /// Run a closure against one session's state
    pub async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut RespondentSession) -> Result<T>,
    ) -> Result<T> {
        let mut sessions = self.inner.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Unknown survey session: {}", id)))?;
        f(session)
    }

    /// Finalize a session's submission; see
    /// [`RespondentSession::confirm_submit`] for the failure contract
    pub async fn confirm_submit(
        &self,
        id: Uuid,
        store: &tattfq_common::db::ResponseStore,
    ) -> Result<crate::session::SubmitOutcome> {
        let mut sessions = self.inner.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Unknown survey session: {}", id)))?;
        session.confirm_submit(store).await
    }

    /// Number of live sessions (for diagnostics)
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SurveyStep;

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let manager = SessionManager::new();
        let a = manager.create().await;
        let b = manager.create().await;

        manager
            .with_session(a, |s| {
                s.record_rating(tattfq_common::db::RatingKind::Performance, "DSI1", 6)
            })
            .await
            .unwrap();
        manager.with_session(b, |s| Ok(s.reset())).await.unwrap();

        let a_rating = manager
            .with_session(a, |s| {
                Ok(s.ratings(tattfq_common::db::RatingKind::Performance)
                    .get("DSI1"))
            })
            .await
            .unwrap();
        assert_eq!(a_rating, Some(6));

        let a_step = manager.with_session(a, |s| Ok(s.step())).await.unwrap();
        assert_eq!(a_step, SurveyStep::Profile);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let manager = SessionManager::new();
        let result = manager
            .with_session(Uuid::new_v4(), |s| Ok(s.step()))
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_distinct_sessions_get_distinct_codes() {
        let manager = SessionManager::new();
        let a = manager.create().await;
        let b = manager.create().await;
        let code_a = manager
            .with_session(a, |s| Ok(s.respondent_code().to_string()))
            .await
            .unwrap();
        let code_b = manager
            .with_session(b, |s| Ok(s.respondent_code().to_string()))
            .await
            .unwrap();
        assert_ne!(code_a, code_b);
    }
}
